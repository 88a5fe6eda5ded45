//! # Genome
//!
//! A genome is an ordered sequence of genes drawn from the caller's alphabet,
//! with a length that is always a whole number of chromosomes. Genomes are
//! immutable once constructed and compare by value; operators build new
//! genomes rather than editing in place.

use std::fmt;

/// One symbol from the configured alphabet.
pub type Gene = char;

/// A full candidate solution string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genome {
    genes: Vec<Gene>,
}

impl Genome {
    pub fn new(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// The gene sequence.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Number of whole chromosomes at the given chromosome size.
    pub fn chromosome_count(&self, genes_per_chromosome: usize) -> usize {
        self.genes.len() / genes_per_chromosome
    }

    /// Returns a copy of this genome with one chromosome appended. Used by
    /// the hill-climbing grow step.
    pub fn with_appended(&self, chromosome: &[Gene]) -> Genome {
        let mut genes = Vec::with_capacity(self.genes.len() + chromosome.len());
        genes.extend_from_slice(&self.genes);
        genes.extend_from_slice(chromosome);
        Genome { genes }
    }
}

impl From<&str> for Genome {
    fn from(s: &str) -> Self {
        Genome {
            genes: s.chars().collect(),
        }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gene in &self.genes {
            write!(f, "{}", gene)?;
        }
        Ok(())
    }
}
