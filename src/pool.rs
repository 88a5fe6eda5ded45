//! # Population Pool
//!
//! The bounded, fitness-ranked, de-duplicated population. The pool is owned
//! by the scheduler thread and has no lock; every other thread only ever
//! sends messages to the scheduler.
//!
//! Rank order is restored immediately after every mutation with a
//! single-element insertion sort from the tail, which is O(k) on the
//! near-sorted sequences the engine produces. The seen-genome set outlives evictions:
//! once a genome has been in the pool it is never re-admitted until a
//! promotion resets exploration history. A small set of distinct fitness
//! values decides whether the pool is diverse enough to absorb a candidate
//! that only ties the current worst.

use std::collections::HashSet;

use rand::{rngs::StdRng, Rng};

use crate::candidate::Candidate;
use crate::fitness::Comparer;
use crate::genome::Genome;

/// Hard upper bound on pool capacity, regardless of alphabet or genome size.
pub const MAX_CAPACITY: usize = 500;

// Promotion keeps this many top-ranked members of the old pool.
const PROMOTION_KEEP: usize = 20;

/// Pool capacity for a given alphabet size and total genome length:
/// three times the genome length, raised to the alphabet size, capped at
/// [`MAX_CAPACITY`]. The cap wins over the alphabet floor.
pub fn capacity_for(gene_set_len: usize, total_genes: usize) -> usize {
    (3 * total_genes).max(gene_set_len).min(MAX_CAPACITY)
}

/// Moves `items[index]` toward the front until it no longer outranks its
/// predecessor. Equal-ranked items bubble past each other, so the newest of
/// a fitness class sorts first.
pub(crate) fn sift_up(items: &mut [Candidate], comparer: &Comparer, index: usize) {
    let mut i = index;
    while i > 0 && comparer.is_same_or_better(&items[i], &items[i - 1]) {
        items.swap(i, i - 1);
        i -= 1;
    }
}

#[derive(Debug)]
pub struct Pool {
    items: Vec<Candidate>,
    seen: HashSet<Genome>,
    seen_fitnesses: HashSet<i64>,
    capacity: usize,
    comparer: Comparer,
}

impl Pool {
    pub fn new(capacity: usize, comparer: Comparer) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            seen: HashSet::new(),
            seen_fitnesses: HashSet::new(),
            capacity,
            comparer,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Raises the capacity when the hill-climbing driver grows genomes.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// The best-ranked member.
    pub fn best(&self) -> Option<&Candidate> {
        self.items.first()
    }

    /// The worst-ranked member.
    pub fn worst(&self) -> Option<&Candidate> {
        self.items.last()
    }

    /// A uniformly chosen member.
    pub fn random(&self, rng: &mut StdRng) -> Option<&Candidate> {
        if self.items.is_empty() {
            return None;
        }
        self.items.get(rng.gen_range(0..self.items.len()))
    }

    /// Whether this genome has been in the pool since the last promotion.
    pub fn contains(&self, genome: &Genome) -> bool {
        self.seen.contains(genome)
    }

    /// Number of distinct genomes seen since the last promotion. Feeds the
    /// search-space-exhaustion check.
    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }

    pub fn members(&self) -> &[Candidate] {
        &self.items
    }

    /// Offers a candidate to the pool. Duplicates are rejected. Under
    /// capacity everything else is admitted. At capacity, a candidate that
    /// strictly beats the worst always enters (evicting the worst); one that
    /// ties the worst's fitness enters only while fewer than 4 distinct
    /// fitness values are represented; a same-or-better candidate with a
    /// different fitness (equidistant, hill-climbing mode) also enters.
    /// Returns true when the candidate was absorbed.
    pub fn try_add(&mut self, candidate: Candidate) -> bool {
        if self.seen.contains(&candidate.genome) {
            return false;
        }
        self.admit_seen(candidate)
    }

    /// Marks a genome as explored without admitting it. Rejected candidates
    /// still count toward exhaustion of the search space.
    pub(crate) fn note_seen(&mut self, genome: &Genome) {
        self.seen.insert(genome.clone());
    }

    /// The admission cascade without the duplicate check, for callers that
    /// have already consulted [`Pool::contains`].
    pub(crate) fn admit_seen(&mut self, candidate: Candidate) -> bool {
        if self.items.len() < self.capacity {
            self.insert(candidate);
            return true;
        }
        let admit = match self.items.last() {
            None => true,
            Some(worst) => {
                if self.comparer.is_better(&candidate, worst) {
                    true
                } else if candidate.fitness == worst.fitness {
                    self.seen_fitnesses.len() < 4
                } else {
                    self.comparer.is_same_or_better(&candidate, worst)
                }
            }
        };
        if !admit {
            return false;
        }
        // Evicted members stay in the seen set.
        self.items.pop();
        self.insert(candidate);
        true
    }

    /// Replaces the pool body with a promoted children buffer: the
    /// top-ranked members (at most 20) survive, exploration history resets,
    /// and the promoted items are re-admitted through the ordered-insert
    /// path.
    pub fn truncate_and_promote(&mut self, new_items: Vec<Candidate>) {
        self.items.truncate(PROMOTION_KEEP.min(self.items.len()));
        self.reset_distinct();
        for item in new_items {
            self.try_add(item);
        }
    }

    /// Discards all members and admits a fresh set. Used by the grow step,
    /// which re-derives every member at the new genome length.
    pub(crate) fn rebuild(&mut self, items: Vec<Candidate>) {
        self.items.clear();
        self.seen.clear();
        self.seen_fitnesses.clear();
        for item in items {
            self.try_add(item);
        }
    }

    fn insert(&mut self, candidate: Candidate) {
        self.seen.insert(candidate.genome.clone());
        self.seen_fitnesses.insert(candidate.fitness);
        self.items.push(candidate);
        let tail = self.items.len() - 1;
        sift_up(&mut self.items, &self.comparer, tail);
        debug_assert!(self.is_ranked());
    }

    fn reset_distinct(&mut self) {
        self.seen.clear();
        self.seen_fitnesses.clear();
        for item in &self.items {
            self.seen.insert(item.genome.clone());
            self.seen_fitnesses.insert(item.fitness);
        }
    }

    // The comparator is a preorder, not a total order: some pairs rank in
    // neither direction. Ranked therefore means no later member strictly
    // dominates its predecessor.
    fn is_ranked(&self) -> bool {
        self.items.windows(2).all(|pair| {
            self.comparer.is_same_or_better(&pair[0], &pair[1])
                || !self.comparer.is_same_or_better(&pair[1], &pair[0])
        })
    }
}

/// Accumulates promising-but-not-yet-champion candidates between promotions.
/// Same ranking and de-duplication rules as the pool, capped at the pool's
/// capacity; promoted wholesale once it holds a pool's worth of distinct
/// genomes spread over more than 3 fitness values.
#[derive(Debug)]
pub(crate) struct ChildBuffer {
    items: Vec<Candidate>,
    seen: HashSet<Genome>,
    fitnesses: HashSet<i64>,
    capacity: usize,
}

impl ChildBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            fitnesses: HashSet::new(),
            capacity,
        }
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    /// Clears the buffer and re-seeds it with the reigning champion.
    pub fn reset(&mut self, champion: Candidate, comparer: &Comparer) {
        self.items.clear();
        self.seen.clear();
        self.fitnesses.clear();
        self.absorb(champion, comparer);
    }

    /// Returns true when the candidate was new to the buffer.
    pub fn absorb(&mut self, candidate: Candidate, comparer: &Comparer) -> bool {
        if !self.seen.insert(candidate.genome.clone()) {
            return false;
        }
        self.fitnesses.insert(candidate.fitness);
        if self.items.len() < self.capacity {
            self.items.push(candidate);
        } else if let Some(last) = self.items.last_mut() {
            *last = candidate;
        } else {
            self.items.push(candidate);
        }
        let tail = self.items.len() - 1;
        sift_up(&mut self.items, comparer, tail);
        true
    }

    pub fn ready(&self, pool_capacity: usize) -> bool {
        self.seen.len() >= pool_capacity && self.fitnesses.len() > 3
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Empties the buffer for promotion into the pool.
    pub fn take(&mut self) -> Vec<Candidate> {
        self.seen.clear();
        self.fitnesses.clear();
        std::mem::take(&mut self.items)
    }
}
