//! Parallel walk generation over node partitions.
//!
//! The node list is cut into `workers` contiguous partitions of `ceil(n / workers)` nodes.
//! Each partition runs on its own thread of a dedicated rayon pool with its own RNG, and
//! batches come back in partition order no matter which worker finishes first.

use crate::graph::WeightedGraph;
use crate::observer::WalkObserver;
use crate::random_walk::{truncated_walk, Walk, WalkBatch, WalkConfig};
use crate::sampler::WeightedNeighborSampler;
use crate::{Error, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, debug_span, warn};

/// Upper bound on the up-front reservation for a batch; larger batches grow on demand.
const BATCH_RESERVE: usize = 1 << 16;

/// Generates the walk corpus of a graph.
#[derive(Clone)]
pub struct WalkEngine {
    config: WalkConfig,
    observer: Option<Arc<dyn WalkObserver>>,
}

impl std::fmt::Debug for WalkEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkEngine")
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl WalkEngine {
    /// Fails with [`Error::InvalidConfig`] before any work if a count is zero.
    pub fn new(config: WalkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, observer: None })
    }

    pub fn with_observer(mut self, observer: Arc<dyn WalkObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Walk from every node of `graph`.
    ///
    /// Returns exactly `workers` batches, in partition order. Partitions left empty (more
    /// workers than nodes) yield empty batches.
    pub fn generate<G>(&self, graph: &G) -> Result<Vec<WalkBatch>>
    where
        G: WeightedGraph + Sync + ?Sized,
        G::Node: Send + Sync,
    {
        self.run(graph, graph.nodes())
    }

    /// Like [`generate`](Self::generate), but only from `start_nodes`, in the given order.
    ///
    /// Every start node must be in the graph; this is checked before any worker starts.
    pub fn generate_from_nodes<G>(&self, graph: &G, start_nodes: &[G::Node]) -> Result<Vec<WalkBatch>>
    where
        G: WeightedGraph + Sync + ?Sized,
        G::Node: Send + Sync,
    {
        for node in start_nodes {
            graph.neighbors(node)?;
        }
        self.run(graph, start_nodes.to_vec())
    }

    fn run<G>(&self, graph: &G, nodes: Vec<G::Node>) -> Result<Vec<WalkBatch>>
    where
        G: WeightedGraph + Sync + ?Sized,
        G::Node: Send + Sync,
    {
        if nodes.is_empty() {
            return Err(Error::EmptyGraph);
        }
        let WalkConfig { walk_length, walk_number, workers, .. } = self.config;
        debug!(
            nodes = nodes.len(),
            workers,
            partition_size = nodes.len().div_ceil(workers),
            walk_length,
            walk_number,
            "generating walks"
        );

        let partitions = partition_nodes(nodes, workers);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("walk-worker-{i}"))
            .build()?;

        let batches = pool.install(|| {
            partitions
                .into_par_iter()
                .enumerate()
                .map(|(index, part)| self.run_partition(graph, index, &part))
                .collect::<Result<Vec<WalkBatch>>>()
        })?;

        debug!(walks = batches.iter().map(Vec::len).sum::<usize>(), "walk generation finished");
        Ok(batches)
    }

    fn run_partition<G>(&self, graph: &G, index: usize, nodes: &[G::Node]) -> Result<WalkBatch>
    where
        G: WeightedGraph + ?Sized,
    {
        let _span = debug_span!("walk_worker", partition = index).entered();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.walk_partition(graph, index, nodes)))
            .unwrap_or_else(|payload| {
                Err(Error::WorkerFailure { partition: index, message: panic_message(payload.as_ref()) })
            });
        if let Err(e) = &outcome {
            warn!(partition = index, error = %e, "walk worker failed");
        }
        outcome
    }

    fn walk_partition<G>(&self, graph: &G, index: usize, nodes: &[G::Node]) -> Result<WalkBatch>
    where
        G: WeightedGraph + ?Sized,
    {
        let observer = self.observer.as_deref();
        if let Some(obs) = observer {
            obs.partition_started(index, nodes.len());
        }

        let mut rng = self.worker_rng(index);
        let mut sampler = WeightedNeighborSampler::new(graph);
        let mut batch = Vec::with_capacity(nodes.len().saturating_mul(self.config.walk_number).min(BATCH_RESERVE));
        for (done, node) in nodes.iter().enumerate() {
            for _ in 0..self.config.walk_number {
                batch.push(truncated_walk(&mut sampler, node, self.config.walk_length, &mut rng)?);
            }
            if let Some(obs) = observer {
                obs.node_completed(index, done + 1);
            }
        }

        if let Some(obs) = observer {
            obs.partition_finished(index, batch.len());
        }
        Ok(batch)
    }

    fn worker_rng(&self, partition: usize) -> ChaCha8Rng {
        match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(mix64(seed ^ ((partition as u64) << 32))),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }
}

/// Walk every node of `graph` with `config`.
pub fn generate_walks<G>(graph: &G, config: WalkConfig) -> Result<Vec<WalkBatch>>
where
    G: WeightedGraph + Sync + ?Sized,
    G::Node: Send + Sync,
{
    WalkEngine::new(config)?.generate(graph)
}

/// Concatenate batches, in order, into a single corpus.
pub fn flatten_batches(batches: Vec<WalkBatch>) -> Vec<Walk> {
    batches.into_iter().flatten().collect()
}

/// Split `nodes` into exactly `workers` contiguous groups of `ceil(n / workers)` nodes.
///
/// Trailing groups are shorter, or empty when `workers` exceeds what the chunking needs.
pub fn partition_nodes<N>(nodes: Vec<N>, workers: usize) -> Vec<Vec<N>> {
    let workers = workers.max(1);
    let chunk = nodes.len().div_ceil(workers).max(1);
    let mut iter = nodes.into_iter();
    (0..workers).map(|_| iter.by_ref().take(chunk).collect()).collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}
