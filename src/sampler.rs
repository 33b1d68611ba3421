//! Weighted next-hop selection.

use crate::graph::WeightedGraph;
use crate::{Error, Result};
use rand::prelude::*;

/// Picks the next hop of a walk among the current node's neighbors, proportionally to edge
/// weight, never returning the walk's origin.
///
/// The sampler keeps a candidate buffer so a worker can reuse it for every step of every walk.
pub struct WeightedNeighborSampler<'g, G: WeightedGraph + ?Sized> {
    graph: &'g G,
    candidates: Vec<(G::Node, f64)>,
}

impl<'g, G: WeightedGraph + ?Sized> WeightedNeighborSampler<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph, candidates: Vec::new() }
    }

    /// Draw one neighbor of `current`, excluding `origin`.
    ///
    /// Returns `Ok(None)` when `current` has no neighbor other than `origin`.
    /// Weights are relative; they need not sum to 1.
    pub fn sample<R: Rng + ?Sized>(
        &mut self,
        current: &G::Node,
        origin: &G::Node,
        rng: &mut R,
    ) -> Result<Option<G::Node>> {
        self.candidates.clear();
        for nbr in self.graph.neighbors(current)? {
            if nbr == *origin {
                continue;
            }
            let w = self.graph.edge_weight(current, &nbr)?;
            self.candidates.push((nbr, w));
        }

        match self.candidates.len() {
            0 => Ok(None),
            _ => self
                .candidates
                .choose_weighted(rng, |(_, w)| *w)
                .map(|(next, _)| Some(next.clone()))
                .map_err(|e| Error::InvalidWeights {
                    node: current.to_string(),
                    reason: e.to_string(),
                }),
        }
    }
}
