//! # Strategies
//!
//! A strategy is a named candidate-generating operator, and every roster
//! entry runs as its own worker unit. Workers receive [`ParentSample`]s from
//! the scheduler, apply their operator, evaluate the child synchronously and
//! publish it on a small result queue. The scheduler keeps one
//! [`StrategyHandle`] per worker and biases its attention toward operators
//! with a record of producing improvements.

pub(crate) mod ops;
pub(crate) mod worker;

use crossbeam_channel::{Receiver, Sender};

use crate::candidate::Candidate;

/// Identifies the operator that produced a candidate.
///
/// `Initial` and `Climb` are attribution-only labels: candidates created by
/// pool seeding and by the hill-climbing grow step carry them, but no worker
/// runs under either label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Initial,
    Climb,
    Crossover,
    Mutate,
    Swap,
    Reverse,
    Shift,
    Flutter,
    Restart,
    Add,
    Remove,
    Replace,
}

impl StrategyKind {
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Initial => "initial",
            StrategyKind::Climb => "climb",
            StrategyKind::Crossover => "crossover",
            StrategyKind::Mutate => "mutate",
            StrategyKind::Swap => "swap",
            StrategyKind::Reverse => "reverse",
            StrategyKind::Shift => "shift",
            StrategyKind::Flutter => "flutter",
            StrategyKind::Restart => "restart",
            StrategyKind::Add => "add",
            StrategyKind::Remove => "remove",
            StrategyKind::Replace => "replace",
        }
    }

    /// True when the operator draws whole chromosomes from the producer.
    pub(crate) fn wants_chromosomes(self) -> bool {
        matches!(
            self,
            StrategyKind::Restart | StrategyKind::Add | StrategyKind::Replace
        )
    }
}

/// Roster for fixed-length searches. Every operator here preserves genome
/// length.
pub(crate) const DIRECT_ROSTER: [StrategyKind; 7] = [
    StrategyKind::Crossover,
    StrategyKind::Mutate,
    StrategyKind::Swap,
    StrategyKind::Reverse,
    StrategyKind::Shift,
    StrategyKind::Flutter,
    StrategyKind::Restart,
];

/// Roster for hill-climbing searches. The three length-changing operators
/// only run here, where variable-length genomes are expected.
pub(crate) const HILL_CLIMB_ROSTER: [StrategyKind; 10] = [
    StrategyKind::Crossover,
    StrategyKind::Mutate,
    StrategyKind::Swap,
    StrategyKind::Reverse,
    StrategyKind::Shift,
    StrategyKind::Flutter,
    StrategyKind::Restart,
    StrategyKind::Add,
    StrategyKind::Remove,
    StrategyKind::Replace,
];

pub(crate) const PARENT_QUEUE_CAPACITY: usize = 2;
pub(crate) const RESULT_QUEUE_CAPACITY: usize = 1;

/// One unit of work for a strategy worker: a uniformly drawn pool member, a
/// copy of the reigning champion, and a low-probability flag that points
/// single-parent operators at the champion instead.
#[derive(Clone, Debug)]
pub(crate) struct ParentSample {
    pub parent: Candidate,
    pub best: Candidate,
    pub use_best: bool,
}

impl ParentSample {
    /// The candidate a single-parent operator works from.
    pub fn chosen(&self) -> &Candidate {
        if self.use_best {
            &self.best
        } else {
            &self.parent
        }
    }
}

/// Scheduler-side endpoint of one strategy worker.
pub(crate) struct StrategyHandle {
    pub kind: StrategyKind,
    pub parents: Sender<ParentSample>,
    pub results: Receiver<Candidate>,
    /// Number of pool-best improvements attributed to this strategy.
    pub successes: u64,
}
