//! # Fitness Comparator
//!
//! Candidates are ranked by a pair of predicates, `is_better` and
//! `is_same_or_better`, built once per search from the configuration. The
//! two predicates are deliberately asymmetric and are not each other's
//! negation.
//!
//! **Direct mode** compares raw fitness with `<`/`>` (or the non-strict
//! counterparts) according to the minimize/maximize flag.
//!
//! **Hill-climbing mode** ranks by absolute distance to a declared optimum,
//! because genome length varies across generations and partial solutions
//! must outrank worse partial solutions regardless of raw magnitude. Its
//! special cases, in order:
//!
//! 1. a negative fitness marks an invalid candidate; between two invalid
//!    candidates the newer (left-hand) one wins, which keeps the search
//!    moving instead of stalling on an invalid champion;
//! 2. a valid candidate always beats an invalid one;
//! 3. when both sit exactly on the optimum, `is_same_or_better` prefers the
//!    genome that is no longer than the incumbent's (parsimony);
//! 4. otherwise the smaller distance to the optimum wins, provided the
//!    challenger lies on the reachable side of the optimum;
//! 5. equidistant candidates that are not on the optimum are "no
//!    improvement": `is_better` is false.

use crate::candidate::Candidate;

#[derive(Clone, Copy, Debug)]
enum Mode {
    Direct,
    HillClimbing { optimum: i64 },
}

/// The configured candidate ordering.
#[derive(Clone, Copy, Debug)]
pub struct Comparer {
    lower_is_better: bool,
    mode: Mode,
}

/// Resolves the invalid-fitness special cases. `None` means both candidates
/// are valid and the caller should fall through to the distance rules.
fn invalid_verdict(challenger: i64, incumbent: i64) -> Option<bool> {
    if challenger < 0 {
        // Both invalid: the newer candidate wins. Invalid vs valid: loses.
        return Some(incumbent < 0);
    }
    if incumbent < 0 {
        return Some(true);
    }
    None
}

impl Comparer {
    pub fn direct(lower_is_better: bool) -> Self {
        Self {
            lower_is_better,
            mode: Mode::Direct,
        }
    }

    pub fn hill_climbing(lower_is_better: bool, optimum: i64) -> Self {
        Self {
            lower_is_better,
            mode: Mode::HillClimbing { optimum },
        }
    }

    /// True when `challenger` strictly outranks `incumbent`.
    pub fn is_better(&self, challenger: &Candidate, incumbent: &Candidate) -> bool {
        match self.mode {
            Mode::Direct => {
                if self.lower_is_better {
                    challenger.fitness < incumbent.fitness
                } else {
                    challenger.fitness > incumbent.fitness
                }
            }
            Mode::HillClimbing { optimum } => {
                match invalid_verdict(challenger.fitness, incumbent.fitness) {
                    Some(verdict) => verdict,
                    None => {
                        challenger.fitness.abs_diff(optimum)
                            < incumbent.fitness.abs_diff(optimum)
                            && self.reachable_side(challenger.fitness, optimum)
                    }
                }
            }
        }
    }

    /// True when `challenger` ranks at least as well as `incumbent`.
    pub fn is_same_or_better(&self, challenger: &Candidate, incumbent: &Candidate) -> bool {
        match self.mode {
            Mode::Direct => {
                if self.lower_is_better {
                    challenger.fitness <= incumbent.fitness
                } else {
                    challenger.fitness >= incumbent.fitness
                }
            }
            Mode::HillClimbing { optimum } => {
                match invalid_verdict(challenger.fitness, incumbent.fitness) {
                    Some(verdict) => verdict,
                    None => {
                        if challenger.fitness == optimum && incumbent.fitness == optimum {
                            return challenger.genome.len() <= incumbent.genome.len();
                        }
                        challenger.fitness.abs_diff(optimum)
                            <= incumbent.fitness.abs_diff(optimum)
                            && self.reachable_side(challenger.fitness, optimum)
                    }
                }
            }
        }
    }

    /// True when the candidate sits exactly on the declared optimum. Always
    /// false in direct mode, which has no known optimum.
    pub fn reached_optimum(&self, candidate: &Candidate) -> bool {
        match self.mode {
            Mode::Direct => false,
            Mode::HillClimbing { optimum } => candidate.fitness == optimum,
        }
    }

    // A candidate past the declared optimum never ranks as an improvement;
    // the optimum is the best value the caller says is attainable.
    fn reachable_side(&self, fitness: i64, optimum: i64) -> bool {
        if self.lower_is_better {
            fitness >= optimum
        } else {
            fitness <= optimum
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Genome;
    use crate::strategy::StrategyKind;

    fn candidate(genes: &str, fitness: i64) -> Candidate {
        Candidate {
            genome: Genome::from(genes),
            fitness,
            strategy: StrategyKind::Mutate,
            parent: None,
        }
    }

    #[test]
    fn test_direct_maximize() {
        let cmp = Comparer::direct(false);
        let low = candidate("00", 1);
        let high = candidate("11", 5);
        assert!(cmp.is_better(&high, &low));
        assert!(!cmp.is_better(&low, &high));
        assert!(cmp.is_same_or_better(&high, &low));
        assert!(!cmp.is_same_or_better(&low, &high));
    }

    #[test]
    fn test_direct_minimize() {
        let cmp = Comparer::direct(true);
        let low = candidate("00", 1);
        let high = candidate("11", 5);
        assert!(cmp.is_better(&low, &high));
        assert!(cmp.is_same_or_better(&low, &high));
        assert!(!cmp.is_better(&high, &low));
    }

    #[test]
    fn test_reflexivity_for_valid_candidates() {
        // is_same_or_better(a, a) holds and is_better(a, a) does not, in
        // both modes, for any valid candidate.
        let a = candidate("0101", 7);
        for cmp in [
            Comparer::direct(false),
            Comparer::direct(true),
            Comparer::hill_climbing(true, 0),
            Comparer::hill_climbing(false, 100),
        ] {
            assert!(cmp.is_same_or_better(&a, &a));
            assert!(!cmp.is_better(&a, &a));
        }
        let at_target = candidate("01", 0);
        let cmp = Comparer::hill_climbing(true, 0);
        assert!(cmp.is_same_or_better(&at_target, &at_target));
        assert!(!cmp.is_better(&at_target, &at_target));
    }

    #[test]
    fn test_predicates_are_not_negations() {
        // Equidistant valid candidates: neither is better, both are
        // same-or-better; so is_better(a,b) != !is_same_or_better(b,a).
        let cmp = Comparer::hill_climbing(true, 5);
        let a = candidate("00", 7);
        let b = candidate("11", 7);
        assert!(!cmp.is_better(&a, &b));
        assert!(cmp.is_same_or_better(&b, &a));
    }

    #[test]
    fn test_invalid_pairs_prefer_the_newer() {
        let cmp = Comparer::hill_climbing(true, 0);
        let older = candidate("00", -3);
        let newer = candidate("11", -8);
        // Both invalid: the challenger wins regardless of magnitude.
        assert!(cmp.is_better(&newer, &older));
        assert!(cmp.is_same_or_better(&newer, &older));
    }

    #[test]
    fn test_valid_beats_invalid() {
        let cmp = Comparer::hill_climbing(true, 0);
        let invalid = candidate("00", -1);
        let valid = candidate("11", 40);
        assert!(cmp.is_better(&valid, &invalid));
        assert!(!cmp.is_better(&invalid, &valid));
        assert!(!cmp.is_same_or_better(&invalid, &valid));
    }

    #[test]
    fn test_distance_to_optimum_ranks_valid_candidates() {
        let cmp = Comparer::hill_climbing(true, 0);
        let close = candidate("00", 2);
        let far = candidate("11", 9);
        assert!(cmp.is_better(&close, &far));
        assert!(!cmp.is_better(&far, &close));
    }

    #[test]
    fn test_equidistant_is_no_improvement() {
        let cmp = Comparer::hill_climbing(true, 0);
        let a = candidate("00", 4);
        let b = candidate("11", 4);
        assert!(!cmp.is_better(&a, &b));
        assert!(!cmp.is_better(&b, &a));
    }

    #[test]
    fn test_parsimony_at_the_optimum() {
        let cmp = Comparer::hill_climbing(true, 0);
        let short = candidate("01", 0);
        let long = candidate("0101", 0);
        assert!(cmp.is_same_or_better(&short, &long));
        assert!(!cmp.is_same_or_better(&long, &short));
        // Shorter-at-optimum still is not a *strict* improvement.
        assert!(!cmp.is_better(&short, &long));
    }

    #[test]
    fn test_past_the_optimum_never_improves() {
        // Maximize toward 10: fitness 12 overshoots and cannot outrank 5.
        let cmp = Comparer::hill_climbing(false, 10);
        let overshoot = candidate("00", 12);
        let under = candidate("11", 5);
        assert!(!cmp.is_better(&overshoot, &under));
    }

    #[test]
    fn test_reached_optimum() {
        let hc = Comparer::hill_climbing(true, 3);
        assert!(hc.reached_optimum(&candidate("0", 3)));
        assert!(!hc.reached_optimum(&candidate("0", 2)));
        assert!(!Comparer::direct(false).reached_optimum(&candidate("0", 3)));
    }
}
