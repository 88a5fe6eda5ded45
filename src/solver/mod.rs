//! # Solver
//!
//! The public entry point for running a search. A [`Solver`] is configured
//! once through [`SolverOptions`] and can then run any number of searches.
//! [`Solver::search`] explores genomes of a fixed length; the caller supplies
//! the fitness function, a display callback that receives every new best
//! genome as it is found, the gene alphabet, and the genome shape.
//! [`Solver::search_by_hill_climbing`] instead starts from a single
//! chromosome and lets the genome grow toward a known best possible fitness.
//!
//! Both entry points always return the best genome found. Degenerate inputs
//! panic; everything that can fail at runtime is handled internally and at
//! worst costs search progress, never the result.
//!
//! ## Example
//!
//! ```rust
//! use evosearch::{Genome, Solver, SolverOptions};
//!
//! let options = SolverOptions::builder()
//!     .max_seconds_without_improvement(1.0)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! let solver = Solver::new(options);
//!
//! // Reward genomes for every '1' they carry.
//! let count_ones = |genome: &Genome| {
//!     genome.genes().iter().filter(|gene| **gene == '1').count() as i64
//! };
//! let best = solver.search(count_ones, |_best: &Genome| {}, "01", 4, 1);
//! assert_eq!(best.to_string(), "1111");
//! ```

use std::collections::HashSet;

use crate::fitness::Comparer;
use crate::genome::{Gene, Genome};
use crate::strategy::{DIRECT_ROSTER, HILL_CLIMB_ROSTER};

mod engine;
pub mod options;

pub use options::{SolverOptions, SolverOptionsBuilder};

use engine::SearchPlan;

/// A configured search runner. Construction is cheap; all threads and
/// channels live only for the duration of one search call.
#[derive(Debug, Clone)]
pub struct Solver {
    options: SolverOptions,
}

impl Solver {
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    /// Searches genomes of exactly `chromosome_count * genes_per_chromosome`
    /// genes for the best fitness the improvement budget allows, and returns
    /// the best genome found.
    ///
    /// `fitness` is called from worker threads and must be safe to share;
    /// `display` runs on the calling thread and receives each genome that
    /// improves on the best found so far.
    ///
    /// # Panics
    ///
    /// Panics when `gene_set` holds fewer than 2 distinct symbols, when
    /// `chromosome_count` or `genes_per_chromosome` is zero, or when the
    /// configured initial genome uses symbols outside `gene_set` or does not
    /// have exactly `chromosome_count * genes_per_chromosome` genes.
    pub fn search<F, D>(
        &self,
        fitness: F,
        mut display: D,
        gene_set: &str,
        chromosome_count: usize,
        genes_per_chromosome: usize,
    ) -> Genome
    where
        F: Fn(&Genome) -> i64 + Sync,
        D: FnMut(&Genome),
    {
        assert!(chromosome_count > 0, "chromosome_count must be at least 1");
        assert!(
            genes_per_chromosome > 0,
            "genes_per_chromosome must be at least 1"
        );
        let genes = checked_gene_set(gene_set);
        let initial = checked_initial(&self.options, &genes, genes_per_chromosome);
        if let Some(genome) = &initial {
            assert!(
                genome.len() == chromosome_count * genes_per_chromosome,
                "initial genome must have exactly chromosome_count * genes_per_chromosome genes"
            );
        }
        let plan = SearchPlan {
            gene_set: &genes,
            genes_per_chromosome,
            start_chromosomes: chromosome_count,
            max_chromosomes: chromosome_count,
            roster: &DIRECT_ROSTER,
            comparer: Comparer::direct(self.options.get_lower_fitness_is_better()),
            hill_climbing: false,
            initial,
        };
        engine::run(&self.options, plan, &fitness, &mut display)
    }

    /// Starts from a single chromosome and alternates fixed-length search
    /// rounds with growing every pool member by one chromosome, until the
    /// best possible fitness is reached, the genome hits
    /// `max_chromosome_count` chromosomes, or growth stops paying off.
    /// Returns the best genome found.
    ///
    /// Fitness functions used here should reward both closeness to
    /// `best_possible_fitness` and shorter genomes, since two candidates at
    /// the same distance are broken in favor of fewer genes.
    ///
    /// # Panics
    ///
    /// Panics when `gene_set` holds fewer than 2 distinct symbols, when
    /// `max_chromosome_count` or `genes_per_chromosome` is zero, or when the
    /// configured initial genome uses symbols outside `gene_set`, is not a
    /// whole number of chromosomes, or is already longer than
    /// `max_chromosome_count` allows.
    pub fn search_by_hill_climbing<F, D>(
        &self,
        fitness: F,
        mut display: D,
        gene_set: &str,
        max_chromosome_count: usize,
        genes_per_chromosome: usize,
        best_possible_fitness: i64,
    ) -> Genome
    where
        F: Fn(&Genome) -> i64 + Sync,
        D: FnMut(&Genome),
    {
        assert!(
            max_chromosome_count > 0,
            "max_chromosome_count must be at least 1"
        );
        assert!(
            genes_per_chromosome > 0,
            "genes_per_chromosome must be at least 1"
        );
        let genes = checked_gene_set(gene_set);
        let initial = checked_initial(&self.options, &genes, genes_per_chromosome);
        let start_chromosomes = match &initial {
            Some(genome) => {
                let count = genome.chromosome_count(genes_per_chromosome);
                assert!(
                    count <= max_chromosome_count,
                    "initial genome is longer than max_chromosome_count allows"
                );
                count
            }
            None => 1,
        };
        let plan = SearchPlan {
            gene_set: &genes,
            genes_per_chromosome,
            start_chromosomes,
            max_chromosomes: max_chromosome_count,
            roster: &HILL_CLIMB_ROSTER,
            comparer: Comparer::hill_climbing(
                self.options.get_lower_fitness_is_better(),
                best_possible_fitness,
            ),
            hill_climbing: true,
            initial,
        };
        engine::run(&self.options, plan, &fitness, &mut display)
    }
}

fn checked_gene_set(gene_set: &str) -> Vec<Gene> {
    let genes: Vec<Gene> = gene_set.chars().collect();
    let distinct: HashSet<Gene> = genes.iter().copied().collect();
    assert!(
        distinct.len() >= 2,
        "gene set must contain at least 2 distinct symbols"
    );
    genes
}

fn checked_initial(
    options: &SolverOptions,
    gene_set: &[Gene],
    genes_per_chromosome: usize,
) -> Option<Genome> {
    let text = options.get_initial_genome()?;
    let genome = Genome::from(text);
    assert!(
        !genome.is_empty() && genome.len() % genes_per_chromosome == 0,
        "initial genome must be a positive whole number of chromosomes"
    );
    for gene in genome.genes() {
        assert!(
            gene_set.contains(gene),
            "initial genome uses the symbol {:?} which is not in the gene set",
            gene
        );
    }
    Some(genome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> Solver {
        Solver::new(
            SolverOptions::builder()
                .max_seconds_without_improvement(0.5)
                .seed(seed)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_search_honors_initial_genome() {
        let options = SolverOptions::builder()
            .max_seconds_without_improvement(0.5)
            .seed(3)
            .initial_genome("0000")
            .build()
            .unwrap();
        let solver = Solver::new(options);
        let count_ones = |genome: &Genome| {
            genome.genes().iter().filter(|gene| **gene == '1').count() as i64
        };
        let best = solver.search(count_ones, |_: &Genome| {}, "01", 4, 1);
        assert_eq!(best, Genome::from("1111"));
    }

    #[test]
    #[should_panic(expected = "at least 2 distinct symbols")]
    fn test_search_rejects_degenerate_gene_set() {
        let solver = seeded(1);
        solver.search(|_: &Genome| 0, |_: &Genome| {}, "aaaa", 2, 1);
    }

    #[test]
    #[should_panic(expected = "chromosome_count must be at least 1")]
    fn test_search_rejects_zero_chromosomes() {
        let solver = seeded(1);
        solver.search(|_: &Genome| 0, |_: &Genome| {}, "01", 0, 1);
    }

    #[test]
    #[should_panic(expected = "whole number of chromosomes")]
    fn test_search_rejects_misaligned_initial_genome() {
        let options = SolverOptions::builder()
            .seed(1)
            .initial_genome("010")
            .build()
            .unwrap();
        let solver = Solver::new(options);
        solver.search(|_: &Genome| 0, |_: &Genome| {}, "01", 2, 2);
    }

    #[test]
    #[should_panic(expected = "not in the gene set")]
    fn test_search_rejects_foreign_symbols_in_initial_genome() {
        let options = SolverOptions::builder()
            .seed(1)
            .initial_genome("01x1")
            .build()
            .unwrap();
        let solver = Solver::new(options);
        solver.search(|_: &Genome| 0, |_: &Genome| {}, "01", 4, 1);
    }
}
