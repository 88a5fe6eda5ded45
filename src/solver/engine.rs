//! Concurrent search scheduler.
//!
//! One engine instance owns the candidate pool and drives the strategy
//! workers and the two material producers over bounded channels. Every
//! worker is kept exactly two parent samples ahead of the scheduler, and the
//! scheduler tops a worker's queue back up with one sample per result it
//! consumes. With a fixed queue discipline and one RNG per unit, the gene
//! sequence each unit sees is a pure function of the configured seed, so
//! seeded runs repeat exactly.

use std::collections::HashSet;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded, Receiver, RecvError, RecvTimeoutError, Sender};
use rand::{rngs::StdRng, Rng};
use rayon::prelude::*;
use tracing::{debug, error, info, trace};

use crate::candidate::Candidate;
use crate::error::{Result, SearchError};
use crate::fitness::Comparer;
use crate::genome::{Gene, Genome};
use crate::pool::{capacity_for, ChildBuffer, Pool};
use crate::producer::{
    gene_channel_capacity, run_chromosome_producer, run_gene_producer, Chromosome, Never,
    CHROMOSOME_CHANNEL_CAPACITY, CHROMOSOME_PRODUCER, GENE_PRODUCER,
};
use crate::rng::{gene_substream, unit_rng, worker_stream, SCHEDULER_STREAM};
use crate::solver::options::SolverOptions;
use crate::strategy::ops::OperatorCtx;
use crate::strategy::worker::run_worker;
use crate::strategy::{
    ParentSample, StrategyHandle, StrategyKind, PARENT_QUEUE_CAPACITY, RESULT_QUEUE_CAPACITY,
};

/// One in this many parent samples points single-parent operators at the
/// reigning champion instead of the drawn pool member.
const CHAMPION_BIAS: u64 = 100;

/// Seeded runs trade the wall clock for a counted budget: this many consumed
/// candidates without improvement stand in for one configured second.
const STALL_PER_SECOND: f64 = 10_000.0;

/// How often a wall-clock run rechecks the improvement deadline while
/// waiting for the next result.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Wall-clock runs also promote the children buffer on this interval, so a
/// slow stretch still refreshes the pool before the buffer fills.
const PROMOTION_INTERVAL: Duration = Duration::from_secs(2);

/// How long shutdown waits for the background units to acknowledge
/// cancellation before reporting stragglers.
const ACK_GRACE: Duration = Duration::from_secs(5);

/// Batches at least this large are scored on the rayon pool.
const PARALLEL_THRESHOLD: usize = 256;

/// Why a scheduler round stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Termination {
    /// The champion reached the configured optimum.
    Converged,
    /// The no-improvement budget ran out.
    TimedOut,
    /// Every distinct genome at the current length has been generated.
    ExhaustedSearchSpace,
}

/// Everything one search needs beyond [`SolverOptions`].
pub(crate) struct SearchPlan<'a> {
    pub gene_set: &'a [Gene],
    pub genes_per_chromosome: usize,
    pub start_chromosomes: usize,
    pub max_chromosomes: usize,
    pub roster: &'a [StrategyKind],
    pub comparer: Comparer,
    pub hill_climbing: bool,
    pub initial: Option<Genome>,
}

/// Runs a full search: spawns the producers and one worker per roster entry,
/// seeds the pool, drives scheduler rounds, then tears the units down again.
/// On an internal channel failure the error is logged and the best genome
/// found so far is returned.
pub(crate) fn run<F, D>(
    options: &SolverOptions,
    plan: SearchPlan<'_>,
    fitness: &F,
    display: &mut D,
) -> Genome
where
    F: Fn(&Genome) -> i64 + Sync,
    D: FnMut(&Genome),
{
    let SearchPlan {
        gene_set,
        genes_per_chromosome,
        start_chromosomes,
        max_chromosomes,
        roster,
        comparer,
        hill_climbing,
        initial,
    } = plan;
    let seed = options.get_seed();

    thread::scope(|scope| {
        let (ack_tx, ack_rx) = unbounded();
        let (cancel_tx, cancel_rx) = bounded::<Never>(0);

        // Gene substreams: one per worker, then one per chromosome consumer.
        // Construction order fixes each substream's index, and with it the
        // RNG the producer drives that substream from.
        let mut gene_txs = Vec::new();
        let mut worker_gene_rxs = Vec::new();
        for _ in 0..roster.len() {
            let (tx, rx) = bounded(gene_channel_capacity(genes_per_chromosome));
            gene_txs.push(tx);
            worker_gene_rxs.push(rx);
        }
        let chromosome_workers = roster
            .iter()
            .filter(|kind| kind.wants_chromosomes())
            .count();
        let mut feed_rxs = Vec::new();
        for _ in 0..1 + chromosome_workers {
            let (tx, rx) = bounded(gene_channel_capacity(genes_per_chromosome));
            gene_txs.push(tx);
            feed_rxs.push(rx);
        }
        let gene_rngs: Vec<StdRng> = (0..gene_txs.len())
            .map(|index| unit_rng(seed, gene_substream(index)))
            .collect();

        // Chromosome substream 0 feeds the scheduler itself; the rest feed
        // the workers whose operators consume whole chromosomes.
        let (engine_chromosome_tx, engine_chromosomes) = bounded(CHROMOSOME_CHANNEL_CAPACITY);
        let mut chromosome_txs = vec![engine_chromosome_tx];
        let mut worker_chromosome_rxs = Vec::new();
        for _ in 0..chromosome_workers {
            let (tx, rx) = bounded(CHROMOSOME_CHANNEL_CAPACITY);
            chromosome_txs.push(tx);
            worker_chromosome_rxs.push(rx);
        }

        {
            let cancel = cancel_rx.clone();
            let ack = ack_tx.clone();
            scope.spawn(move || run_gene_producer(gene_set, gene_txs, gene_rngs, cancel, ack));
        }
        {
            let cancel = cancel_rx.clone();
            let ack = ack_tx.clone();
            scope.spawn(move || {
                run_chromosome_producer(feed_rxs, chromosome_txs, genes_per_chromosome, cancel, ack)
            });
        }

        let mut worker_chromosome_rxs = worker_chromosome_rxs.into_iter();
        let mut handles = Vec::with_capacity(roster.len());
        for ((index, kind), genes) in roster.iter().copied().enumerate().zip(worker_gene_rxs) {
            let chromosomes = if kind.wants_chromosomes() {
                worker_chromosome_rxs.next()
            } else {
                None
            };
            let ctx = OperatorCtx {
                kind,
                rng: unit_rng(seed, worker_stream(index)),
                gene_set,
                genes_per_chromosome,
                max_chromosomes,
                genes,
                chromosomes,
            };
            let (parent_tx, parent_rx) = bounded(PARENT_QUEUE_CAPACITY);
            let (result_tx, result_rx) = bounded(RESULT_QUEUE_CAPACITY);
            let ack = ack_tx.clone();
            scope.spawn(move || run_worker(ctx, fitness, parent_rx, result_tx, ack));
            handles.push(StrategyHandle {
                kind,
                parents: parent_tx,
                results: result_rx,
                successes: 0,
            });
        }

        let max_seconds = options.get_max_seconds_without_improvement();
        let capacity = capacity_for(gene_set.len(), start_chromosomes * genes_per_chromosome);
        let mut engine = Engine {
            gene_set,
            genes_per_chromosome,
            current_chromosomes: start_chromosomes,
            max_chromosomes,
            hill_climbing,
            deterministic: seed.is_some(),
            max_seconds,
            max_rounds: options.get_max_rounds_without_improvement(),
            stall_budget: (max_seconds * STALL_PER_SECOND).ceil() as u64,
            print_diagnostics: options.get_print_diagnostics(),
            print_strategy_usage: options.get_print_strategy_usage(),
            comparer,
            rng: unit_rng(seed, SCHEDULER_STREAM),
            pool: Pool::new(capacity, comparer),
            children: ChildBuffer::new(capacity),
            handles,
            chromosomes: engine_chromosomes,
            acks: ack_rx,
            cancel: cancel_tx,
            champion: None,
            seen_at_length: 0,
            improvements: 0,
            champion_children: 0,
            climb_successes: 0,
            stalled: 0,
            last_improvement: Instant::now(),
            last_promotion: Instant::now(),
        };

        if let Err(err) = engine.drive(initial, fitness, display) {
            error!(error = %err, "search ended early on an internal channel failure");
        }
        let best = engine.best_genome();
        engine.shutdown();
        best
    })
}

struct Engine<'a> {
    gene_set: &'a [Gene],
    genes_per_chromosome: usize,
    current_chromosomes: usize,
    max_chromosomes: usize,
    hill_climbing: bool,
    deterministic: bool,
    max_seconds: f64,
    max_rounds: usize,
    stall_budget: u64,
    print_diagnostics: bool,
    print_strategy_usage: bool,
    comparer: Comparer,
    rng: StdRng,
    pool: Pool,
    children: ChildBuffer,
    handles: Vec<StrategyHandle>,
    chromosomes: Receiver<Chromosome>,
    acks: Receiver<&'static str>,
    cancel: Sender<Never>,
    champion: Option<Candidate>,
    /// Distinct genomes of the current length generated since the pool's
    /// seen set was last rebuilt. Drives the exhaustion check.
    seen_at_length: u64,
    improvements: u64,
    champion_children: u64,
    climb_successes: u64,
    stalled: u64,
    last_improvement: Instant,
    last_promotion: Instant,
}

impl Engine<'_> {
    fn drive<F, D>(&mut self, initial: Option<Genome>, fitness: &F, display: &mut D) -> Result<()>
    where
        F: Fn(&Genome) -> i64 + Sync,
        D: FnMut(&Genome),
    {
        self.seed_pool(initial, fitness)?;
        self.prime_workers()?;
        if self.hill_climbing {
            if let Some(champion) = &self.champion {
                display(&champion.genome);
            }
            let mut stale_rounds = 0;
            while !self.converged() {
                let before = self.champion.clone();
                let outcome = self.run_round(display)?;
                if outcome == Termination::Converged {
                    break;
                }
                let improved = match (&self.champion, &before) {
                    (Some(now), Some(was)) => {
                        now.genome != was.genome && self.comparer.is_better(now, was)
                    }
                    (Some(_), None) => true,
                    _ => false,
                };
                if improved {
                    stale_rounds = 0;
                } else {
                    stale_rounds += 1;
                    if stale_rounds >= self.max_rounds {
                        debug!(rounds = stale_rounds, "no improvement for the allowed rounds");
                        break;
                    }
                }
                if self.current_chromosomes >= self.max_chromosomes {
                    debug!(
                        chromosomes = self.current_chromosomes,
                        "genome length limit reached"
                    );
                    break;
                }
                if self.grow(fitness, display)? {
                    stale_rounds = 0;
                }
            }
        } else {
            self.run_round(display)?;
        }
        self.log_strategy_usage();
        Ok(())
    }

    /// Evaluates the starting genome, then fills the pool from the
    /// chromosome stream with twice the pool capacity in attempts.
    fn seed_pool<F>(&mut self, initial: Option<Genome>, fitness: &F) -> Result<()>
    where
        F: Fn(&Genome) -> i64 + Sync,
    {
        let first_genome = match initial {
            Some(genome) => genome,
            None => self.draw_genome()?,
        };
        let first = Candidate::seed(first_genome.clone(), fitness(&first_genome));
        self.pool.try_add(first.clone());
        self.champion = Some(first);

        let attempts = 2 * self.pool.capacity();
        let mut genomes = Vec::with_capacity(attempts);
        for _ in 0..attempts {
            genomes.push(self.draw_genome()?);
        }
        for (genome, score) in score_batch(genomes, fitness) {
            self.pool.try_add(Candidate::seed(genome, score));
        }
        let upgraded = match (self.pool.best(), self.champion.as_ref()) {
            (Some(best), Some(champion)) if self.comparer.is_better(best, champion) => {
                Some(best.clone())
            }
            _ => None,
        };
        if let Some(best) = upgraded {
            self.champion = Some(best);
        }
        if let Some(champion) = self.champion.clone() {
            self.children.reset(champion, &self.comparer);
        }
        self.refresh_seen_at_length();
        debug!(
            pool = self.pool.len(),
            capacity = self.pool.capacity(),
            "pool seeded"
        );
        Ok(())
    }

    /// Queues the fixed number of parent samples every worker starts with.
    fn prime_workers(&mut self) -> Result<()> {
        for _ in 0..PARENT_QUEUE_CAPACITY {
            for index in 0..self.handles.len() {
                self.refill(index)?;
            }
        }
        Ok(())
    }

    fn run_round<D: FnMut(&Genome)>(&mut self, display: &mut D) -> Result<Termination> {
        debug!(
            chromosomes = self.current_chromosomes,
            pool = self.pool.len(),
            "scheduler round started"
        );
        self.last_improvement = Instant::now();
        self.last_promotion = Instant::now();
        self.stalled = 0;
        let outcome = self.round_loop(display);
        self.spill_children();
        let outcome = outcome?;
        debug!(
            outcome = ?outcome,
            improvements = self.improvements,
            "scheduler round finished"
        );
        Ok(outcome)
    }

    fn round_loop<D: FnMut(&Genome)>(&mut self, display: &mut D) -> Result<Termination> {
        loop {
            if self.budget_spent() {
                return Ok(Termination::TimedOut);
            }
            let index = self.pick_strategy();
            let candidate = match self.next_result(index)? {
                Some(candidate) => candidate,
                None => return Ok(Termination::TimedOut),
            };
            self.refill(index)?;
            self.stalled += 1;
            if let Some(outcome) = self.accept(candidate, index, display) {
                return Ok(outcome);
            }
        }
    }

    fn budget_spent(&self) -> bool {
        if self.deterministic {
            self.stalled >= self.stall_budget
        } else {
            self.last_improvement.elapsed().as_secs_f64() >= self.max_seconds
        }
    }

    /// Chooses the next worker queue to consume from. A random success
    /// threshold biases the pick toward strategies that have produced
    /// improvements, while the random scan offset keeps every strategy
    /// reachable.
    fn pick_strategy(&mut self) -> usize {
        let ceiling = self
            .handles
            .iter()
            .map(|handle| handle.successes)
            .max()
            .unwrap_or(0)
            .max(1);
        let threshold = self.rng.gen_range(0..ceiling);
        let offset = self.rng.gen_range(0..self.handles.len());
        for step in 0..self.handles.len() {
            let index = (offset + step) % self.handles.len();
            if self.handles[index].successes >= threshold {
                return index;
            }
        }
        offset
    }

    /// Waits for the chosen worker's next candidate. Seeded runs block;
    /// wall-clock runs poll so the deadline is honored even while every
    /// worker is busy.
    fn next_result(&mut self, index: usize) -> Result<Option<Candidate>> {
        if self.deterministic {
            return Ok(Some(self.handles[index].results.recv()?));
        }
        loop {
            match self.handles[index].results.recv_timeout(POLL_INTERVAL) {
                Ok(candidate) => return Ok(Some(candidate)),
                Err(RecvTimeoutError::Timeout) => {
                    if self.last_improvement.elapsed().as_secs_f64() >= self.max_seconds {
                        return Ok(None);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SearchError::StreamDisconnected(RecvError));
                }
            }
        }
    }

    /// Sends one fresh parent sample to the worker whose result was just
    /// consumed, restoring its two-sample lead. The send may briefly block
    /// while the worker picks up its next sample, but can only deadlock if
    /// the worker is gone, which surfaces as a send error instead.
    fn refill(&mut self, index: usize) -> Result<()> {
        let sample = match self.draw_sample() {
            Some(sample) => sample,
            None => {
                debug_assert!(false, "drawing parents from an unseeded pool");
                return Ok(());
            }
        };
        if self.handles[index].parents.send(sample).is_err() {
            return Err(SearchError::StreamDisconnected(RecvError));
        }
        Ok(())
    }

    fn draw_sample(&mut self) -> Option<ParentSample> {
        let use_best = self.rng.gen_range(0..CHAMPION_BIAS) == 0;
        let parent = self.pool.random(&mut self.rng)?.clone();
        let best = self.champion.clone()?;
        Some(ParentSample {
            parent,
            best,
            use_best,
        })
    }

    /// Decides what a generated candidate becomes: a duplicate (and possibly
    /// the exhaustion trigger), a discard, a pool member, a buffered child,
    /// or the new champion.
    fn accept<D: FnMut(&Genome)>(
        &mut self,
        candidate: Candidate,
        index: usize,
        display: &mut D,
    ) -> Option<Termination> {
        if self.pool.contains(&candidate.genome) {
            if self.space_exhausted() {
                debug!(
                    seen = self.seen_at_length,
                    "every distinct genome at this length has been generated"
                );
                return Some(Termination::ExhaustedSearchSpace);
            }
            return None;
        }
        self.pool.note_seen(&candidate.genome);
        if candidate.genome.len() == self.current_genes() {
            self.seen_at_length += 1;
        }
        let (keep, beats_worst) = match self.pool.worst() {
            Some(worst) => (
                self.comparer.is_same_or_better(&candidate, worst),
                self.comparer.is_better(&candidate, worst),
            ),
            None => (true, true),
        };
        if !keep {
            return None;
        }
        if !beats_worst {
            // Ties the worst. Absorbed by the pool under its diversity rule,
            // never counted as an improvement.
            self.pool.admit_seen(candidate);
            return None;
        }
        if self.print_diagnostics {
            trace!(
                strategy = candidate.strategy.name(),
                fitness = candidate.fitness,
                "child retained"
            );
        }
        self.children.absorb(candidate.clone(), &self.comparer);
        let improves = match &self.champion {
            Some(champion) => self.comparer.is_better(&candidate, champion),
            None => true,
        };
        if improves {
            self.record_improvement(&candidate, Some(index), display);
            if self.converged() {
                return Some(Termination::Converged);
            }
        }
        self.maybe_promote();
        None
    }

    fn record_improvement<D: FnMut(&Genome)>(
        &mut self,
        candidate: &Candidate,
        source: Option<usize>,
        display: &mut D,
    ) {
        self.improvements += 1;
        if let Some(champion) = &self.champion {
            if candidate.is_child_of(&champion.genome) {
                self.champion_children += 1;
            }
        }
        match source {
            Some(index) => self.handles[index].successes += 1,
            None => self.climb_successes += 1,
        }
        if self.print_diagnostics {
            trace!(
                strategy = candidate.strategy.name(),
                fitness = candidate.fitness,
                genome = %candidate.genome,
                "new champion"
            );
        }
        self.champion = Some(candidate.clone());
        self.pool.admit_seen(candidate.clone());
        self.last_improvement = Instant::now();
        self.stalled = 0;
        display(&candidate.genome);
    }

    fn maybe_promote(&mut self) {
        let due = self.children.ready(self.pool.capacity())
            || (!self.deterministic
                && self.children.len() > 1
                && self.last_promotion.elapsed() >= PROMOTION_INTERVAL);
        if !due {
            return;
        }
        debug!(
            children = self.children.len(),
            "promoting the children buffer into the pool"
        );
        let promoted = self.children.take();
        self.pool.truncate_and_promote(promoted);
        if let Some(champion) = self.champion.clone() {
            self.children.reset(champion, &self.comparer);
        }
        self.refresh_seen_at_length();
        self.last_promotion = Instant::now();
    }

    /// Folds whatever the children buffer still holds into the pool at the
    /// end of a round, then re-seeds the buffer with the champion.
    fn spill_children(&mut self) {
        let champion_genome = self.champion.as_ref().map(|champion| champion.genome.clone());
        for child in self.children.take() {
            if Some(&child.genome) != champion_genome.as_ref() {
                self.pool.admit_seen(child);
            }
        }
        if let Some(champion) = self.champion.clone() {
            self.children.reset(champion, &self.comparer);
        }
    }

    /// Appends one fresh chromosome to every pool member, scores the grown
    /// genomes, and rebuilds the pool at the next length. Returns whether a
    /// grown genome beat the champion.
    fn grow<F, D>(&mut self, fitness: &F, display: &mut D) -> Result<bool>
    where
        F: Fn(&Genome) -> i64 + Sync,
        D: FnMut(&Genome),
    {
        self.current_chromosomes += 1;
        let capacity = capacity_for(self.gene_set.len(), self.current_genes());
        debug!(
            chromosomes = self.current_chromosomes,
            capacity, "growing every pool member by one chromosome"
        );
        let mut grown = Vec::with_capacity(self.pool.len());
        let mut parent_genomes = Vec::with_capacity(self.pool.len());
        let mut distinct = HashSet::with_capacity(self.pool.len());
        for member in self.pool.members() {
            let chromosome = self.next_chromosome()?;
            let genome = member.genome.with_appended(&chromosome);
            if distinct.insert(genome.clone()) {
                grown.push(genome);
                parent_genomes.push(member.genome.clone());
            }
        }
        let mut fresh = Vec::with_capacity(grown.len());
        let mut improved = false;
        for ((genome, score), parent) in score_batch(grown, fitness).into_iter().zip(parent_genomes)
        {
            let candidate = Candidate::child(genome, score, StrategyKind::Climb, parent);
            let improves = match &self.champion {
                Some(champion) => {
                    candidate.genome != champion.genome
                        && self.comparer.is_better(&candidate, champion)
                }
                None => true,
            };
            if improves {
                self.record_improvement(&candidate, None, display);
                improved = true;
            }
            fresh.push(candidate);
        }
        self.pool.set_capacity(capacity);
        self.children.set_capacity(capacity);
        self.pool.rebuild(fresh);
        if let Some(champion) = self.champion.clone() {
            self.children.reset(champion, &self.comparer);
        }
        self.refresh_seen_at_length();
        self.last_promotion = Instant::now();
        Ok(improved)
    }

    fn next_chromosome(&self) -> Result<Chromosome> {
        Ok(self.chromosomes.recv()?)
    }

    fn draw_genome(&self) -> Result<Genome> {
        let mut genes = Vec::with_capacity(self.current_genes());
        for _ in 0..self.current_chromosomes {
            genes.extend(self.next_chromosome()?);
        }
        Ok(Genome::new(genes))
    }

    fn current_genes(&self) -> usize {
        self.current_chromosomes * self.genes_per_chromosome
    }

    fn converged(&self) -> bool {
        match &self.champion {
            Some(champion) => self.comparer.reached_optimum(champion),
            None => false,
        }
    }

    fn space_exhausted(&self) -> bool {
        let permutations = (self.gene_set.len() as f64).powf(self.current_genes() as f64);
        self.seen_at_length as f64 >= permutations
    }

    fn refresh_seen_at_length(&mut self) {
        let total = self.current_genes();
        self.seen_at_length = self
            .pool
            .members()
            .iter()
            .filter(|member| member.genome.len() == total)
            .count() as u64;
    }

    fn best_genome(&self) -> Genome {
        if let Some(champion) = &self.champion {
            return champion.genome.clone();
        }
        match self.pool.best() {
            Some(best) => best.genome.clone(),
            None => Genome::new(Vec::new()),
        }
    }

    fn log_strategy_usage(&self) {
        if !self.print_strategy_usage || self.improvements == 0 {
            return;
        }
        info!(improvements = self.improvements, "strategy usage");
        for handle in &self.handles {
            info!(
                strategy = handle.kind.name(),
                successes = handle.successes,
                share_pct = 100 * handle.successes / self.improvements,
                "strategy successes"
            );
        }
        if self.climb_successes > 0 {
            info!(
                strategy = StrategyKind::Climb.name(),
                successes = self.climb_successes,
                share_pct = 100 * self.climb_successes / self.improvements,
                "strategy successes"
            );
        }
        info!(
            share_pct = 100 * self.champion_children / self.improvements,
            "new champions bred from the reigning champion"
        );
    }

    /// Tears the background units down: dropping the cancel sender and the
    /// worker endpoints unblocks every unit, then each one reports its name
    /// back before exiting.
    fn shutdown(self) {
        let mut missing: Vec<&'static str> = vec![GENE_PRODUCER, CHROMOSOME_PRODUCER];
        missing.extend(self.handles.iter().map(|handle| handle.kind.name()));
        let Engine {
            cancel,
            handles,
            chromosomes,
            acks,
            ..
        } = self;
        drop(cancel);
        drop(handles);
        drop(chromosomes);
        while !missing.is_empty() {
            match acks.recv_timeout(ACK_GRACE) {
                Ok(name) => {
                    missing.retain(|unit| *unit != name);
                    debug!(unit = name, "background unit stopped");
                }
                Err(_) => break,
            }
        }
        if let Some(unit) = missing.first().copied() {
            let err = SearchError::CancelUnacknowledged(unit);
            error!(error = %err, "cancellation handshake incomplete");
            debug_assert!(missing.is_empty(), "units missed cancellation: {:?}", missing);
        }
    }
}

/// Scores a batch of genomes, in parallel once the batch is large enough to
/// amortize the fork-join overhead. Output order matches input order.
fn score_batch<F>(genomes: Vec<Genome>, fitness: &F) -> Vec<(Genome, i64)>
where
    F: Fn(&Genome) -> i64 + Sync,
{
    if genomes.len() >= PARALLEL_THRESHOLD {
        genomes
            .into_par_iter()
            .map(|genome| {
                let score = fitness(&genome);
                (genome, score)
            })
            .collect()
    } else {
        genomes
            .into_iter()
            .map(|genome| {
                let score = fitness(&genome);
                (genome, score)
            })
            .collect()
    }
}
