//! Progress notifications from walk workers.

use tracing::{debug, trace};

/// Receives progress from the workers of a generation.
///
/// Callbacks run on worker threads, concurrently across partitions. Nothing the observer
/// does can affect the walks.
pub trait WalkObserver: Send + Sync {
    fn partition_started(&self, _partition: usize, _nodes: usize) {}

    /// `completed` of the partition's nodes have all their walks generated.
    fn node_completed(&self, partition: usize, completed: usize);

    fn partition_finished(&self, _partition: usize, _walks: usize) {}
}

/// Reports progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl WalkObserver for LogProgress {
    fn partition_started(&self, partition: usize, nodes: usize) {
        debug!(partition, nodes, "walk partition started");
    }

    fn node_completed(&self, partition: usize, completed: usize) {
        trace!(partition, completed, "node walks completed");
    }

    fn partition_finished(&self, partition: usize, walks: usize) {
        debug!(partition, walks, "walk partition finished");
    }
}
