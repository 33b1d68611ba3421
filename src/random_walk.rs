//! Walk configuration and the single truncated walk.

use crate::graph::WeightedGraph;
use crate::sampler::WeightedNeighborSampler;
use crate::{Error, Result};
use rand::Rng;

/// Upper bound on the up-front reservation for a walk; longer walks grow on demand.
const WALK_RESERVE: usize = 128;

/// One walk: node identifiers in their `Display` form, origin first.
pub type Walk = Vec<String>;

/// The walks produced by one worker for one partition.
pub type WalkBatch = Vec<Walk>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WalkConfig {
    /// Maximum walk length, in nodes (origin included).
    pub walk_length: usize,
    /// Walks started from every node.
    pub walk_number: usize,
    /// Number of partitions, and threads in the worker pool.
    pub workers: usize,
    /// Seed for the per-worker RNGs. `None` seeds every worker from the OS.
    pub seed: Option<u64>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self { walk_length: 80, walk_number: 10, workers: 10, seed: None }
    }
}

impl WalkConfig {
    pub fn new(walk_length: usize, walk_number: usize) -> Self {
        Self { walk_length, walk_number, ..Self::default() }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("walk_length", self.walk_length),
            ("walk_number", self.walk_number),
            ("workers", self.workers),
        ] {
            if value < 1 {
                return Err(Error::InvalidConfig(format!("{name} must be at least 1, got {value}")));
            }
        }
        Ok(())
    }
}

/// Walk from `origin` for at most `walk_length` nodes.
///
/// Every step goes through the sampler with `origin` excluded, so the walk never comes back
/// to its start node. The walk ends early when the current node has no eligible neighbor.
pub fn truncated_walk<G, R>(
    sampler: &mut WeightedNeighborSampler<'_, G>,
    origin: &G::Node,
    walk_length: usize,
    rng: &mut R,
) -> Result<Walk>
where
    G: WeightedGraph + ?Sized,
    R: Rng + ?Sized,
{
    let mut walk = Vec::with_capacity(walk_length.min(WALK_RESERVE));
    walk.push(origin.to_string());

    let mut curr = origin.clone();
    for _ in 1..walk_length {
        let Some(next) = sampler.sample(&curr, origin, rng)? else {
            break;
        };
        walk.push(next.to_string());
        curr = next;
    }
    Ok(walk)
}
