//! A candidate pairs a genome with its fitness, the strategy that produced
//! it, and a copy of the parent genome it was derived from. The parent link
//! is a value copy, never an owning reference; first-generation candidates
//! carry no parent.

use crate::genome::Genome;
use crate::strategy::StrategyKind;

#[derive(Clone, Debug)]
pub struct Candidate {
    pub genome: Genome,
    pub fitness: i64,
    pub strategy: StrategyKind,
    pub parent: Option<Genome>,
}

impl Candidate {
    /// A first-generation candidate (pool seeding).
    pub fn seed(genome: Genome, fitness: i64) -> Self {
        Self {
            genome,
            fitness,
            strategy: StrategyKind::Initial,
            parent: None,
        }
    }

    pub fn child(genome: Genome, fitness: i64, strategy: StrategyKind, parent: Genome) -> Self {
        Self {
            genome,
            fitness,
            strategy,
            parent: Some(parent),
        }
    }

    /// True when this candidate was derived from the given genome.
    pub fn is_child_of(&self, genome: &Genome) -> bool {
        self.parent.as_ref() == Some(genome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_has_no_parent() {
        let seed = Candidate::seed(Genome::from("01"), 3);
        assert!(seed.parent.is_none());
        assert_eq!(seed.strategy, StrategyKind::Initial);
        assert!(!seed.is_child_of(&Genome::from("01")));
    }

    #[test]
    fn test_child_attribution() {
        let parent = Genome::from("00");
        let child = Candidate::child(Genome::from("01"), 5, StrategyKind::Mutate, parent.clone());
        assert!(child.is_child_of(&parent));
        assert!(!child.is_child_of(&Genome::from("01")));
    }
}
