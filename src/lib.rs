//! `walker`: weighted, truncated random walks for embedding corpora.
//!
//! For every node of a weighted graph the engine emits `walk_number` independent walks of at
//! most `walk_length` nodes. Each step picks a neighbor with probability proportional to the
//! edge weight, and the walk's origin is never revisited. Work is split into `workers`
//! contiguous partitions that run on a fixed-size thread pool.
//!
//! Public invariants (must not drift):
//! - **Batch order**: one batch per partition, in partition order, regardless of which worker
//!   finishes first.
//! - **Walk order**: inside a batch, walks follow the partition's node order and each node's
//!   walks are consecutive.
//! - **Origin exclusion**: the origin is excluded from candidacy at every step, not just the
//!   first one.
//! - **All or nothing**: a generation either returns every batch or a single error.
//!
//! ```
//! use walker::{WalkConfig, WalkEngine, WeightedAdjacency};
//!
//! let g = WeightedAdjacency::from_edges([("a", "b", 1.0), ("b", "c", 2.0), ("a", "c", 1.0)]);
//! let engine = WalkEngine::new(WalkConfig::new(3, 2).with_workers(2).with_seed(7))?;
//! let batches = engine.generate(&g)?;
//! assert_eq!(batches.len(), 2);
//! assert_eq!(batches.iter().map(Vec::len).sum::<usize>(), 6);
//! # Ok::<(), walker::Error>(())
//! ```

pub mod engine;
pub mod graph;
pub mod observer;
pub mod random_walk;
pub mod sampler;

pub use engine::{flatten_batches, generate_walks, partition_nodes, WalkEngine};
pub use graph::{AdjacencyMatrix, WeightedAdjacency, WeightedGraph};
pub use observer::{LogProgress, WalkObserver};
pub use random_walk::{truncated_walk, Walk, WalkBatch, WalkConfig};
pub use sampler::WeightedNeighborSampler;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("graph has no nodes to walk from")]
    EmptyGraph,
    #[error("node `{0}` is not present in the graph")]
    UnknownNode(String),
    #[error("edge `{node}` -- `{neighbor}` has no weight")]
    MissingWeight { node: String, neighbor: String },
    #[error("cannot sample a neighbor of `{node}`: {reason}")]
    InvalidWeights { node: String, reason: String },
    #[error("walk worker {partition} failed: {message}")]
    WorkerFailure { partition: usize, message: String },
    #[error("failed to build walk worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
