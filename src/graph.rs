//! Minimal weighted graph adapter trait and the adapters shipped with the crate.

use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// The narrow read-only view the walk engine needs from a graph.
///
/// Graphs are treated as undirected: `neighbors(a)` contains `b` iff `neighbors(b)`
/// contains `a`, and `edge_weight(a, b) == edge_weight(b, a)`.
pub trait WeightedGraph {
    /// Opaque node identifier. Walks carry its `Display` form.
    type Node: Clone + Eq + Hash + Display;

    fn node_count(&self) -> usize;

    /// All nodes, in a stable order. Partitioning follows this order.
    fn nodes(&self) -> Vec<Self::Node>;

    /// Neighbors of `node`. Fails with [`Error::UnknownNode`] if `node` is not in the graph.
    fn neighbors(&self, node: &Self::Node) -> Result<Vec<Self::Node>>;

    /// Weight of the edge between two adjacent nodes.
    ///
    /// Fails with [`Error::MissingWeight`] if the edge carries no weight.
    fn edge_weight(&self, node: &Self::Node, neighbor: &Self::Node) -> Result<f64>;
}

/// Insertion-ordered undirected weighted adjacency list.
///
/// Re-adding an existing edge overwrites its weight. Self-loops are stored once.
#[derive(Debug, Clone)]
pub struct WeightedAdjacency<N> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    adj: Vec<Vec<(usize, Option<f64>)>>,
}

impl<N> Default for WeightedAdjacency<N> {
    fn default() -> Self {
        Self { nodes: Vec::new(), index: HashMap::new(), adj: Vec::new() }
    }
}

impl<N: Clone + Eq + Hash + Display> WeightedAdjacency<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(a, b, weight)` triples.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N, f64)>,
    {
        let mut g = Self::new();
        for (a, b, w) in edges {
            g.add_edge(a, b, w);
        }
        g
    }

    /// Add a node if it is not already present. Returns its dense index.
    pub fn add_node(&mut self, node: N) -> usize {
        if let Some(&i) = self.index.get(&node) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(node.clone(), i);
        self.nodes.push(node);
        self.adj.push(Vec::new());
        i
    }

    pub fn add_edge(&mut self, a: N, b: N, weight: f64) {
        self.insert_edge(a, b, Some(weight));
    }

    /// Add an edge without a weight attribute. Walking across it fails with
    /// [`Error::MissingWeight`].
    pub fn add_unweighted_edge(&mut self, a: N, b: N) {
        self.insert_edge(a, b, None);
    }

    pub fn edge_count(&self) -> usize {
        let (loops, links) = self
            .adj
            .iter()
            .enumerate()
            .flat_map(|(u, nbrs)| nbrs.iter().map(move |&(v, _)| (u, v)))
            .fold((0, 0), |(l, e), (u, v)| if u == v { (l + 1, e) } else { (l, e + 1) });
        loops + links / 2
    }

    pub fn contains(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    fn insert_edge(&mut self, a: N, b: N, weight: Option<f64>) {
        let ia = self.add_node(a);
        let ib = self.add_node(b);
        set_weight(&mut self.adj[ia], ib, weight);
        if ia != ib {
            set_weight(&mut self.adj[ib], ia, weight);
        }
    }

    fn position(&self, node: &N) -> Result<usize> {
        self.index.get(node).copied().ok_or_else(|| Error::UnknownNode(node.to_string()))
    }
}

fn set_weight(nbrs: &mut Vec<(usize, Option<f64>)>, target: usize, weight: Option<f64>) {
    match nbrs.iter_mut().find(|(v, _)| *v == target) {
        Some(slot) => slot.1 = weight,
        None => nbrs.push((target, weight)),
    }
}

impl<N: Clone + Eq + Hash + Display> WeightedGraph for WeightedAdjacency<N> {
    type Node = N;

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn nodes(&self) -> Vec<N> {
        self.nodes.clone()
    }

    fn neighbors(&self, node: &N) -> Result<Vec<N>> {
        let i = self.position(node)?;
        Ok(self.adj[i].iter().map(|&(v, _)| self.nodes[v].clone()).collect())
    }

    fn edge_weight(&self, node: &N, neighbor: &N) -> Result<f64> {
        let u = self.position(node)?;
        let v = self.position(neighbor)?;
        self.adj[u]
            .iter()
            .find(|(x, _)| *x == v)
            .and_then(|&(_, w)| w)
            .ok_or_else(|| Error::MissingWeight {
                node: node.to_string(),
                neighbor: neighbor.to_string(),
            })
    }
}

/// Dense weighted adjacency matrix. Node ids are row indices; an entry `> 0` is an edge.
pub struct AdjacencyMatrix<'a>(pub &'a [Vec<f64>]);

impl<'a> AdjacencyMatrix<'a> {
    fn row(&self, node: usize) -> Result<&'a [f64]> {
        self.0.get(node).map(Vec::as_slice).ok_or_else(|| Error::UnknownNode(node.to_string()))
    }
}

impl<'a> WeightedGraph for AdjacencyMatrix<'a> {
    type Node = usize;

    fn node_count(&self) -> usize {
        self.0.len()
    }

    fn nodes(&self) -> Vec<usize> {
        (0..self.0.len()).collect()
    }

    fn neighbors(&self, node: &usize) -> Result<Vec<usize>> {
        Ok(self.row(*node)?.iter().enumerate().filter(|(_, &w)| w > 0.0).map(|(i, _)| i).collect())
    }

    fn edge_weight(&self, node: &usize, neighbor: &usize) -> Result<f64> {
        let w = self.row(*node)?.get(*neighbor).copied().ok_or_else(|| Error::UnknownNode(neighbor.to_string()))?;
        if w > 0.0 {
            Ok(w)
        } else {
            Err(Error::MissingWeight { node: node.to_string(), neighbor: neighbor.to_string() })
        }
    }
}

#[cfg(feature = "petgraph")]
impl<N, E, Ix> WeightedGraph for petgraph::Graph<N, E, petgraph::Undirected, Ix>
where
    E: Copy + Into<f64>,
    Ix: petgraph::graph::IndexType,
{
    type Node = usize;

    fn node_count(&self) -> usize {
        self.node_count()
    }

    fn nodes(&self) -> Vec<usize> {
        self.node_indices().map(|idx| idx.index()).collect()
    }

    fn neighbors(&self, node: &usize) -> Result<Vec<usize>> {
        if *node >= self.node_count() {
            return Err(Error::UnknownNode(node.to_string()));
        }
        Ok(self.neighbors(petgraph::graph::NodeIndex::new(*node)).map(|idx| idx.index()).collect())
    }

    fn edge_weight(&self, node: &usize, neighbor: &usize) -> Result<f64> {
        let a = petgraph::graph::NodeIndex::new(*node);
        let b = petgraph::graph::NodeIndex::new(*neighbor);
        self.find_edge(a, b)
            .and_then(|e| petgraph::Graph::edge_weight(self, e))
            .map(|&w| w.into())
            .ok_or_else(|| Error::MissingWeight {
                node: node.to_string(),
                neighbor: neighbor.to_string(),
            })
    }
}
