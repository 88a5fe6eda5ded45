//! Per-strategy worker loop.
//!
//! A worker turns parent samples into evaluated children, one at a time.
//! Fitness is computed synchronously here so the scheduler only ever handles
//! finished candidates.

use crossbeam_channel::{Receiver, Sender};

use super::ops::OperatorCtx;
use super::ParentSample;
use crate::candidate::Candidate;
use crate::genome::Genome;

/// Runs one strategy worker until a channel it depends on disconnects, then
/// acknowledges on the ack channel. Parent-queue, result-queue and
/// material-stream disconnects all mean the same thing: shutdown has begun.
pub(crate) fn run_worker<F>(
    mut ctx: OperatorCtx<'_>,
    fitness: &F,
    parents: Receiver<ParentSample>,
    results: Sender<Candidate>,
    ack: Sender<&'static str>,
) where
    F: Fn(&Genome) -> i64 + Sync,
{
    while let Ok(sample) = parents.recv() {
        let genome = match ctx.generate(&sample) {
            Ok(genome) => genome,
            Err(_) => break,
        };
        let score = fitness(&genome);
        let parent_genome = sample.chosen().genome.clone();
        let child = Candidate::child(genome, score, ctx.kind, parent_genome);
        if results.send(child).is_err() {
            break;
        }
    }
    let _ = ack.send(ctx.kind.name());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Gene;
    use crate::strategy::StrategyKind;
    use crossbeam_channel::{bounded, unbounded};
    use rand::{rngs::StdRng, SeedableRng};
    use std::time::Duration;

    fn count_threes(genome: &Genome) -> i64 {
        genome.genes().iter().filter(|g| **g == '3').count() as i64
    }

    #[test]
    fn test_worker_evaluates_and_attributes_children() {
        let set: Vec<Gene> = "0123".chars().collect();
        let (gene_tx, gene_rx) = unbounded();
        for gene in "33333333".chars() {
            gene_tx.send(gene).unwrap();
        }
        let (parent_tx, parent_rx) = bounded(2);
        let (result_tx, result_rx) = bounded(1);
        let (ack_tx, ack_rx) = unbounded();
        std::thread::scope(|scope| {
            let ctx = OperatorCtx {
                kind: StrategyKind::Mutate,
                rng: StdRng::seed_from_u64(4),
                gene_set: &set,
                genes_per_chromosome: 1,
                max_chromosomes: 4,
                genes: gene_rx,
                chromosomes: None,
            };
            scope.spawn(move || run_worker(ctx, &count_threes, parent_rx, result_tx, ack_tx));
            let parent = Candidate::seed(Genome::from("0000"), 0);
            parent_tx
                .send(ParentSample {
                    parent: parent.clone(),
                    best: parent.clone(),
                    use_best: false,
                })
                .unwrap();
            let child = result_rx.recv_timeout(Duration::from_secs(2)).unwrap();
            assert_eq!(child.strategy, StrategyKind::Mutate);
            assert_eq!(child.fitness, 1);
            assert!(child.is_child_of(&parent.genome));
            drop(parent_tx);
            assert_eq!(ack_rx.recv_timeout(Duration::from_secs(2)), Ok("mutate"));
        });
    }

    #[test]
    fn test_worker_exits_when_results_are_abandoned() {
        let set: Vec<Gene> = "01".chars().collect();
        let (gene_tx, gene_rx) = unbounded();
        for gene in "10101010".chars() {
            gene_tx.send(gene).unwrap();
        }
        let (parent_tx, parent_rx) = bounded(2);
        let (result_tx, result_rx) = bounded(1);
        let (ack_tx, ack_rx) = unbounded();
        std::thread::scope(|scope| {
            let ctx = OperatorCtx {
                kind: StrategyKind::Swap,
                rng: StdRng::seed_from_u64(4),
                gene_set: &set,
                genes_per_chromosome: 1,
                max_chromosomes: 2,
                genes: gene_rx,
                chromosomes: None,
            };
            scope.spawn(move || run_worker(ctx, &count_threes, parent_rx, result_tx, ack_tx));
            drop(result_rx);
            let parent = Candidate::seed(Genome::from("01"), 0);
            parent_tx
                .send(ParentSample {
                    parent: parent.clone(),
                    best: parent,
                    use_best: false,
                })
                .unwrap();
            assert_eq!(ack_rx.recv_timeout(Duration::from_secs(2)), Ok("swap"));
        });
    }
}
