//! # Material Producers
//!
//! Two background units keep the engine supplied with randomness: a gene
//! producer emitting single symbols and a chromosome producer assembling
//! fixed-length gene groups. Each unit serves one bounded outbound channel
//! per consumer through a `Select` over the send operations, so a slow
//! consumer only ever stalls its own substream.
//!
//! The gene producer owns one RNG per outbound substream, and the chromosome
//! producer assembles each outbound channel from a dedicated gene feed, so
//! the material any consumer receives is a pure function of the seed, never
//! of thread interleaving. This is what keeps fixed-seed runs reproducible.
//!
//! Cancellation is a broadcast: the engine drops the cancel sender, every
//! producer observes the disconnect in its select loop, acknowledges on the
//! ack channel, and exits. A producer also exits when all of its outbound
//! channels (or its inbound feeds) disconnect, which covers consumers that
//! are torn down first.

use crossbeam_channel::{Receiver, RecvError, Select, Sender};
use rand::{rngs::StdRng, Rng};

use crate::genome::Gene;

/// Cancellation channels carry no values; they only ever disconnect.
pub(crate) enum Never {}

/// A fixed-length group of genes.
pub(crate) type Chromosome = Vec<Gene>;

pub(crate) const GENE_PRODUCER: &str = "gene-producer";
pub(crate) const CHROMOSOME_PRODUCER: &str = "chromosome-producer";

/// Buffer depth of one gene substream.
pub(crate) fn gene_channel_capacity(genes_per_chromosome: usize) -> usize {
    1 + genes_per_chromosome
}

/// Buffer depth of one chromosome substream.
pub(crate) const CHROMOSOME_CHANNEL_CAPACITY: usize = 1;

/// Body of the gene-producer unit. `txs[i]` is fed exclusively from
/// `rngs[i]`. Runs until cancelled or until every outbound channel has
/// disconnected, then acknowledges and returns.
pub(crate) fn run_gene_producer(
    gene_set: &[Gene],
    txs: Vec<Sender<Gene>>,
    mut rngs: Vec<StdRng>,
    cancel: Receiver<Never>,
    ack: Sender<&'static str>,
) {
    debug_assert_eq!(txs.len(), rngs.len());
    let mut sel = Select::new();
    for tx in &txs {
        sel.send(tx);
    }
    let cancel_index = sel.recv(&cancel);
    let mut live = txs.len();
    while live > 0 {
        let oper = sel.select();
        let index = oper.index();
        if index == cancel_index {
            let _ = oper.recv(&cancel);
            break;
        }
        let gene = gene_set[rngs[index].gen_range(0..gene_set.len())];
        if oper.send(&txs[index], gene).is_err() {
            sel.remove(index);
            live -= 1;
        }
    }
    let _ = ack.send(GENE_PRODUCER);
}

/// Body of the chromosome-producer unit. `txs[i]` is assembled exclusively
/// from `feeds[i]`, one pending chromosome per substream, replaced after
/// each successful send.
pub(crate) fn run_chromosome_producer(
    feeds: Vec<Receiver<Gene>>,
    txs: Vec<Sender<Chromosome>>,
    genes_per_chromosome: usize,
    cancel: Receiver<Never>,
    ack: Sender<&'static str>,
) {
    debug_assert_eq!(feeds.len(), txs.len());
    let mut pending: Vec<Chromosome> = Vec::with_capacity(txs.len());
    let mut fed = true;
    for feed in &feeds {
        match assemble(feed, genes_per_chromosome) {
            Ok(chromosome) => pending.push(chromosome),
            Err(_) => {
                fed = false;
                break;
            }
        }
    }
    if fed {
        let mut sel = Select::new();
        for tx in &txs {
            sel.send(tx);
        }
        let cancel_index = sel.recv(&cancel);
        let mut live = txs.len();
        while live > 0 {
            let oper = sel.select();
            let index = oper.index();
            if index == cancel_index {
                let _ = oper.recv(&cancel);
                break;
            }
            if oper.send(&txs[index], pending[index].clone()).is_err() {
                sel.remove(index);
                live -= 1;
                continue;
            }
            match assemble(&feeds[index], genes_per_chromosome) {
                Ok(chromosome) => pending[index] = chromosome,
                // Gene stream closed: shutdown is under way.
                Err(_) => break,
            }
        }
    }
    let _ = ack.send(CHROMOSOME_PRODUCER);
}

fn assemble(feed: &Receiver<Gene>, genes_per_chromosome: usize) -> Result<Chromosome, RecvError> {
    let mut chromosome = Vec::with_capacity(genes_per_chromosome);
    for _ in 0..genes_per_chromosome {
        chromosome.push(feed.recv()?);
    }
    Ok(chromosome)
}
