//! The ten candidate-generating operators.
//!
//! Every operator works in gene units, keeps chromosome alignment where the
//! operator is structural, and recovers from degenerate shapes (genomes too
//! short for the operator) by delegating to `mutate` instead of failing, so
//! a worker always produces a child for every parent sample it consumes.

use crossbeam_channel::{Receiver, RecvError};
use rand::{rngs::StdRng, Rng};

use super::{ParentSample, StrategyKind};
use crate::error::Result;
use crate::genome::{Gene, Genome};
use crate::producer::Chromosome;

/// Longest run of genes a single flutter touches.
const FLUTTER_RUN_LIMIT: usize = 4;

/// Alphabet-index nudges applied by flutter; zero is excluded.
const FLUTTER_STEPS: [i64; 4] = [-2, -1, 1, 2];

/// Everything one worker needs to run its operator: a private RNG, the
/// alphabet, genome shape parameters and its slices of the material streams.
pub(crate) struct OperatorCtx<'a> {
    pub kind: StrategyKind,
    pub rng: StdRng,
    pub gene_set: &'a [Gene],
    pub genes_per_chromosome: usize,
    /// Upper bound on chromosome count; `add` falls back to `mutate` at the
    /// bound. Fixed-length searches pass the exact chromosome count.
    pub max_chromosomes: usize,
    pub genes: Receiver<Gene>,
    pub chromosomes: Option<Receiver<Chromosome>>,
}

impl OperatorCtx<'_> {
    /// Produces one child genome from the sampled parents. Fails only when a
    /// material stream has disconnected, which happens during shutdown.
    pub fn generate(&mut self, sample: &ParentSample) -> Result<Genome> {
        match self.kind {
            StrategyKind::Crossover => self.crossover(sample),
            StrategyKind::Mutate => self.mutate(sample),
            StrategyKind::Swap => self.swap(sample),
            StrategyKind::Reverse => self.reverse(sample),
            StrategyKind::Shift => self.shift(sample),
            StrategyKind::Flutter => self.flutter(sample),
            StrategyKind::Restart => self.restart(sample),
            StrategyKind::Add => self.add(sample),
            StrategyKind::Remove => self.remove(sample),
            StrategyKind::Replace => self.replace(sample),
            // Attribution-only labels never run as workers.
            StrategyKind::Initial | StrategyKind::Climb => self.mutate(sample),
        }
    }

    fn next_chromosome(&self) -> Result<Chromosome> {
        match &self.chromosomes {
            Some(feed) => Ok(feed.recv()?),
            None => Err(RecvError.into()),
        }
    }

    /// Replaces one random gene with a different gene drawn from the stream.
    /// Keeps drawing until the replacement differs, which terminates for any
    /// gene set with at least two distinct symbols.
    fn mutate(&mut self, sample: &ParentSample) -> Result<Genome> {
        let parent = sample.chosen().genome.genes();
        let index = self.rng.gen_range(0..parent.len());
        let current = parent[index];
        let mut replacement = self.genes.recv()?;
        while replacement == current {
            replacement = self.genes.recv()?;
        }
        let mut child = parent.to_vec();
        child[index] = replacement;
        Ok(Genome::new(child))
    }

    /// Splices a chromosome-aligned run of the champion into the sampled
    /// parent at an aligned offset, preserving total length.
    fn crossover(&mut self, sample: &ParentSample) -> Result<Genome> {
        let gpc = self.genes_per_chromosome;
        let a = sample.parent.genome.genes();
        let b = sample.best.genome.genes();
        if a.len() < 2 * gpc || b.len() < 2 * gpc {
            return self.mutate(sample);
        }
        let source_start = self.rng.gen_range(0..(b.len() - 1) / gpc) * gpc;
        let destination_start = self.rng.gen_range(0..(a.len() - 1) / gpc) * gpc;
        let max_len = (a.len() - destination_start).min(b.len() - source_start);
        let length = (1 + self.rng.gen_range(0..max_len / gpc - 1)) * gpc;
        let mut child = Vec::with_capacity(a.len());
        child.extend_from_slice(&a[..destination_start]);
        child.extend_from_slice(&b[source_start..source_start + length]);
        if child.len() < a.len() {
            child.extend_from_slice(&a[child.len()..]);
        }
        Ok(Genome::new(child))
    }

    /// Exchanges two distinct gene positions.
    fn swap(&mut self, sample: &ParentSample) -> Result<Genome> {
        let parent = sample.chosen().genome.genes();
        if parent.len() < 2 {
            return self.mutate(sample);
        }
        let index_a = self.rng.gen_range(0..parent.len());
        let mut index_b = self.rng.gen_range(0..parent.len());
        while index_b == index_a {
            index_b = self.rng.gen_range(0..parent.len());
        }
        let mut child = parent.to_vec();
        child.swap(index_a, index_b);
        Ok(Genome::new(child))
    }

    /// Reverses the chromosome ordering within a random aligned run.
    fn reverse(&mut self, sample: &ParentSample) -> Result<Genome> {
        let gpc = self.genes_per_chromosome;
        let parent = sample.chosen().genome.genes();
        let chromosomes = parent.len() / gpc;
        if chromosomes < 2 {
            return self.mutate(sample);
        }
        let point_a = self.rng.gen_range(0..chromosomes) * gpc;
        let mut point_b = self.rng.gen_range(0..chromosomes) * gpc;
        while point_b == point_a {
            point_b = self.rng.gen_range(0..chromosomes) * gpc;
        }
        let (lo, hi) = if point_a < point_b {
            (point_a, point_b)
        } else {
            (point_b, point_a)
        };
        let mut child = Vec::with_capacity(parent.len());
        child.extend_from_slice(&parent[..lo]);
        for chunk in parent[lo..hi].chunks(gpc).rev() {
            child.extend_from_slice(chunk);
        }
        child.extend_from_slice(&parent[hi..]);
        Ok(Genome::new(child))
    }

    /// Rotates a random chromosome-aligned run left or right by one
    /// chromosome position.
    fn shift(&mut self, sample: &ParentSample) -> Result<Genome> {
        let gpc = self.genes_per_chromosome;
        let parent = sample.chosen().genome.genes();
        let chromosomes = parent.len() / gpc;
        if chromosomes < 2 {
            return self.mutate(sample);
        }
        let shift_right = self.rng.gen_range(0..2) == 1;
        let segment_start = self.rng.gen_range(0..chromosomes - 1);
        let segment_count = 1 + self.rng.gen_range(0..chromosomes - segment_start);
        let start = segment_start * gpc;
        let end = (segment_start + segment_count) * gpc;
        let mut child = Vec::with_capacity(parent.len());
        child.extend_from_slice(&parent[..start]);
        if shift_right {
            child.extend_from_slice(&parent[end - gpc..end]);
            child.extend_from_slice(&parent[start..end - gpc]);
        } else {
            child.extend_from_slice(&parent[start + gpc..end]);
            child.extend_from_slice(&parent[start..start + gpc]);
        }
        child.extend_from_slice(&parent[end..]);
        Ok(Genome::new(child))
    }

    /// Nudges a short run of genes by one or two positions within the
    /// alphabet ordering, wrapping at the ends. Fine-grained local search.
    fn flutter(&mut self, sample: &ParentSample) -> Result<Genome> {
        let parent = sample.chosen().genome.genes();
        let run = self.rng.gen_range(1..=FLUTTER_RUN_LIMIT.min(parent.len()));
        let start = self.rng.gen_range(0..=parent.len() - run);
        let width = self.gene_set.len() as i64;
        let mut child = parent.to_vec();
        for gene in &mut child[start..start + run] {
            // Genomes only ever carry gene-set symbols.
            let position = self
                .gene_set
                .iter()
                .position(|g| *g == *gene)
                .unwrap_or(0) as i64;
            let step = FLUTTER_STEPS[self.rng.gen_range(0..FLUTTER_STEPS.len())];
            *gene = self.gene_set[(position + step).rem_euclid(width) as usize];
        }
        Ok(Genome::new(child))
    }

    /// Discards the parent entirely and assembles a fresh genome of the same
    /// chromosome count from the chromosome stream.
    fn restart(&mut self, sample: &ParentSample) -> Result<Genome> {
        if self.chromosomes.is_none() {
            return self.mutate(sample);
        }
        let parent_len = sample.chosen().genome.len();
        let count = parent_len / self.genes_per_chromosome;
        let mut child = Vec::with_capacity(parent_len);
        for _ in 0..count {
            child.extend(self.next_chromosome()?);
        }
        Ok(Genome::new(child))
    }

    /// Inserts one fresh chromosome at a random aligned offset.
    fn add(&mut self, sample: &ParentSample) -> Result<Genome> {
        if self.chromosomes.is_none() {
            return self.mutate(sample);
        }
        let gpc = self.genes_per_chromosome;
        let parent = sample.chosen().genome.genes();
        let count = parent.len() / gpc;
        if count >= self.max_chromosomes {
            return self.mutate(sample);
        }
        let insert_at = self.rng.gen_range(0..=count) * gpc;
        let chromosome = self.next_chromosome()?;
        let mut child = Vec::with_capacity(parent.len() + gpc);
        child.extend_from_slice(&parent[..insert_at]);
        child.extend(chromosome);
        child.extend_from_slice(&parent[insert_at..]);
        Ok(Genome::new(child))
    }

    /// Deletes one random chromosome.
    fn remove(&mut self, sample: &ParentSample) -> Result<Genome> {
        let gpc = self.genes_per_chromosome;
        let parent = sample.chosen().genome.genes();
        let count = parent.len() / gpc;
        if count < 2 {
            return self.mutate(sample);
        }
        let victim = self.rng.gen_range(0..count) * gpc;
        let mut child = Vec::with_capacity(parent.len() - gpc);
        child.extend_from_slice(&parent[..victim]);
        child.extend_from_slice(&parent[victim + gpc..]);
        Ok(Genome::new(child))
    }

    /// Overwrites one random chromosome with a fresh one.
    fn replace(&mut self, sample: &ParentSample) -> Result<Genome> {
        if self.chromosomes.is_none() {
            return self.mutate(sample);
        }
        let gpc = self.genes_per_chromosome;
        let parent = sample.chosen().genome.genes();
        let count = parent.len() / gpc;
        let target = self.rng.gen_range(0..count) * gpc;
        let chromosome = self.next_chromosome()?;
        let mut child = parent.to_vec();
        child[target..target + gpc].copy_from_slice(&chromosome);
        Ok(Genome::new(child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;
    use crossbeam_channel::unbounded;
    use rand::SeedableRng;

    fn preload_genes(symbols: &str) -> Receiver<Gene> {
        let (tx, rx) = unbounded();
        for gene in symbols.chars() {
            tx.send(gene).unwrap();
        }
        rx
    }

    fn preload_chromosomes(chromosomes: &[&str]) -> Receiver<Chromosome> {
        let (tx, rx) = unbounded();
        for chromosome in chromosomes {
            tx.send(chromosome.chars().collect()).unwrap();
        }
        rx
    }

    fn ctx<'a>(
        kind: StrategyKind,
        gene_set: &'a [Gene],
        genes_per_chromosome: usize,
        max_chromosomes: usize,
        genes: Receiver<Gene>,
        chromosomes: Option<Receiver<Chromosome>>,
    ) -> OperatorCtx<'a> {
        OperatorCtx {
            kind,
            rng: StdRng::seed_from_u64(11),
            gene_set,
            genes_per_chromosome,
            max_chromosomes,
            genes,
            chromosomes,
        }
    }

    fn sample(parent: &str, best: &str) -> ParentSample {
        ParentSample {
            parent: Candidate::seed(Genome::from(parent), 0),
            best: Candidate::seed(Genome::from(best), 0),
            use_best: false,
        }
    }

    fn diff_count(a: &Genome, b: &Genome) -> usize {
        a.genes()
            .iter()
            .zip(b.genes())
            .filter(|(x, y)| x != y)
            .count()
    }

    fn chunks(genome: &Genome, gpc: usize) -> Vec<String> {
        genome
            .genes()
            .chunks(gpc)
            .map(|c| c.iter().collect())
            .collect()
    }

    #[test]
    fn test_mutate_changes_exactly_one_gene() {
        let set: Vec<Gene> = "0123456789".chars().collect();
        let mut ctx = ctx(StrategyKind::Mutate, &set, 1, 4, preload_genes("9999"), None);
        let sample = sample("0123", "0123");
        let child = ctx.generate(&sample).unwrap();
        assert_eq!(child.len(), 4);
        assert_eq!(diff_count(&child, &sample.parent.genome), 1);
        assert!(child.genes().contains(&'9'));
    }

    #[test]
    fn test_mutate_skips_matching_replacement() {
        let set: Vec<Gene> = "07".chars().collect();
        let mut ctx = ctx(StrategyKind::Mutate, &set, 1, 1, preload_genes("007"), None);
        let child = ctx.generate(&sample("0", "0")).unwrap();
        assert_eq!(child, Genome::from("7"));
    }

    #[test]
    fn test_crossover_preserves_length_and_material() {
        let set: Vec<Gene> = "0123".chars().collect();
        let mut ctx = ctx(StrategyKind::Crossover, &set, 1, 4, preload_genes(""), None);
        let child = ctx.generate(&sample("0011", "2233")).unwrap();
        assert_eq!(child.len(), 4);
        assert!(child.genes().iter().all(|g| "0123".contains(*g)));
    }

    #[test]
    fn test_crossover_single_chromosome_falls_back_to_mutate() {
        let set: Vec<Gene> = "0123456789".chars().collect();
        let mut ctx = ctx(StrategyKind::Crossover, &set, 2, 4, preload_genes("99"), None);
        let sample = sample("01", "2345");
        let child = ctx.generate(&sample).unwrap();
        assert_eq!(child.len(), 2);
        assert_eq!(diff_count(&child, &sample.parent.genome), 1);
    }

    #[test]
    fn test_swap_exchanges_two_positions() {
        let set: Vec<Gene> = "0123".chars().collect();
        let mut ctx = ctx(StrategyKind::Swap, &set, 1, 4, preload_genes(""), None);
        let sample = sample("0123", "0123");
        let child = ctx.generate(&sample).unwrap();
        let mut sorted_child: Vec<Gene> = child.genes().to_vec();
        let mut sorted_parent: Vec<Gene> = sample.parent.genome.genes().to_vec();
        sorted_child.sort_unstable();
        sorted_parent.sort_unstable();
        assert_eq!(sorted_child, sorted_parent);
        assert_eq!(diff_count(&child, &sample.parent.genome), 2);
    }

    #[test]
    fn test_reverse_reorders_whole_chromosomes() {
        let set: Vec<Gene> = "012".chars().collect();
        let mut ctx = ctx(StrategyKind::Reverse, &set, 2, 3, preload_genes(""), None);
        let sample = sample("001122", "001122");
        let child = ctx.generate(&sample).unwrap();
        assert_eq!(child.len(), 6);
        let mut child_chunks = chunks(&child, 2);
        let mut parent_chunks = chunks(&sample.parent.genome, 2);
        assert_ne!(child, sample.parent.genome);
        child_chunks.sort();
        parent_chunks.sort();
        assert_eq!(child_chunks, parent_chunks);
    }

    #[test]
    fn test_shift_keeps_chromosome_material() {
        let set: Vec<Gene> = "0123".chars().collect();
        let mut ctx = ctx(StrategyKind::Shift, &set, 2, 4, preload_genes(""), None);
        let sample = sample("00112233", "00112233");
        let child = ctx.generate(&sample).unwrap();
        assert_eq!(child.len(), 8);
        let mut child_chunks = chunks(&child, 2);
        let mut parent_chunks = chunks(&sample.parent.genome, 2);
        child_chunks.sort();
        parent_chunks.sort();
        assert_eq!(child_chunks, parent_chunks);
    }

    #[test]
    fn test_flutter_changes_genes_within_alphabet() {
        let set: Vec<Gene> = "0123456789".chars().collect();
        let mut ctx = ctx(StrategyKind::Flutter, &set, 1, 4, preload_genes(""), None);
        let sample = sample("0509", "0509");
        let child = ctx.generate(&sample).unwrap();
        assert_eq!(child.len(), 4);
        assert_ne!(child, sample.parent.genome);
        assert!(child.genes().iter().all(|g| set.contains(g)));
    }

    #[test]
    fn test_restart_rebuilds_from_chromosome_stream() {
        let set: Vec<Gene> = "0123456789".chars().collect();
        let chromosomes = preload_chromosomes(&["88", "99"]);
        let mut ctx = ctx(
            StrategyKind::Restart,
            &set,
            2,
            2,
            preload_genes(""),
            Some(chromosomes),
        );
        let child = ctx.generate(&sample("0011", "0011")).unwrap();
        assert_eq!(child, Genome::from("8899"));
    }

    #[test]
    fn test_restart_without_stream_falls_back_to_mutate() {
        let set: Vec<Gene> = "0123456789".chars().collect();
        let mut ctx = ctx(StrategyKind::Restart, &set, 2, 2, preload_genes("99"), None);
        let sample = sample("0011", "0011");
        let child = ctx.generate(&sample).unwrap();
        assert_eq!(child.len(), 4);
        assert_eq!(diff_count(&child, &sample.parent.genome), 1);
    }

    #[test]
    fn test_add_inserts_whole_chromosome() {
        let set: Vec<Gene> = "0123456789".chars().collect();
        let chromosomes = preload_chromosomes(&["99"]);
        let mut ctx = ctx(
            StrategyKind::Add,
            &set,
            2,
            8,
            preload_genes(""),
            Some(chromosomes),
        );
        let sample = sample("0011", "0011");
        let child = ctx.generate(&sample).unwrap();
        assert_eq!(child.len(), 6);
        let child_chunks = chunks(&child, 2);
        assert_eq!(child_chunks.iter().filter(|c| *c == "99").count(), 1);
        let rest: Vec<&String> = child_chunks.iter().filter(|c| *c != "99").collect();
        assert_eq!(rest, [&"00".to_string(), &"11".to_string()]);
    }

    #[test]
    fn test_add_at_length_limit_falls_back_to_mutate() {
        let set: Vec<Gene> = "0123456789".chars().collect();
        let chromosomes = preload_chromosomes(&["99"]);
        let mut ctx = ctx(
            StrategyKind::Add,
            &set,
            2,
            2,
            preload_genes("77"),
            Some(chromosomes),
        );
        let sample = sample("0011", "0011");
        let child = ctx.generate(&sample).unwrap();
        assert_eq!(child.len(), 4);
        assert_eq!(diff_count(&child, &sample.parent.genome), 1);
    }

    #[test]
    fn test_remove_drops_one_chromosome() {
        let set: Vec<Gene> = "012".chars().collect();
        let mut ctx = ctx(StrategyKind::Remove, &set, 2, 3, preload_genes(""), None);
        let child = ctx.generate(&sample("001122", "001122")).unwrap();
        assert_eq!(child.len(), 4);
        let child_chunks = chunks(&child, 2);
        let expected = [
            vec!["00".to_string(), "11".to_string()],
            vec!["00".to_string(), "22".to_string()],
            vec!["11".to_string(), "22".to_string()],
        ];
        assert!(expected.contains(&child_chunks));
    }

    #[test]
    fn test_remove_single_chromosome_falls_back_to_mutate() {
        let set: Vec<Gene> = "0123456789".chars().collect();
        let mut ctx = ctx(StrategyKind::Remove, &set, 2, 3, preload_genes("99"), None);
        let sample = sample("00", "00");
        let child = ctx.generate(&sample).unwrap();
        assert_eq!(child.len(), 2);
        assert_eq!(diff_count(&child, &sample.parent.genome), 1);
    }

    #[test]
    fn test_replace_swaps_in_fresh_chromosome() {
        let set: Vec<Gene> = "0123456789".chars().collect();
        let chromosomes = preload_chromosomes(&["99"]);
        let mut ctx = ctx(
            StrategyKind::Replace,
            &set,
            2,
            3,
            preload_genes(""),
            Some(chromosomes),
        );
        let child = ctx.generate(&sample("001122", "001122")).unwrap();
        assert_eq!(child.len(), 6);
        let child_chunks = chunks(&child, 2);
        assert_eq!(child_chunks.iter().filter(|c| *c == "99").count(), 1);
    }

    #[test]
    fn test_swap_single_gene_falls_back_to_mutate() {
        let set: Vec<Gene> = "07".chars().collect();
        let mut ctx = ctx(StrategyKind::Swap, &set, 1, 1, preload_genes("7"), None);
        let child = ctx.generate(&sample("0", "0")).unwrap();
        assert_eq!(child, Genome::from("7"));
    }
}
