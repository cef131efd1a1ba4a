//! Graph representations and traits for energy-aware route planning.

use std::ops::Range;

pub mod consumption;
pub mod first_out_graph;
pub mod overhead_graph;

pub use self::consumption::{edge_costs, ConsumptionProfile, EdgeCost, EnergyUnits};
pub use self::first_out_graph::{FirstOutGraph, OwnedGraph};
pub use self::overhead_graph::OverheadGraph;

/// Node ids are 32bit unsigned ints
pub type NodeId = u32;
/// Edge ids are 32bit unsigned ints
pub type EdgeId = u32;
/// Travel time weights are 32bit unsigned ints
pub type Weight = u32;
/// A sufficiently large infinity constant.
/// Set to `u32::MAX / 2` so that `INFINITY + x` for `x <= INFINITY` does not overflow.
pub const INFINITY: Weight = u32::MAX / 2;

/// Simple struct for weighted links.
/// No behaviour, just a pure data struct.
#[derive(Debug, Copy, Clone)]
pub struct Link {
    pub node: NodeId,
    pub cost: EdgeCost,
}

/// Base trait for graphs.
/// Interesting behaviour will be added through subtraits.
pub trait Graph {
    fn num_nodes(&self) -> usize;
    fn num_arcs(&self) -> usize;
    fn degree(&self, node: NodeId) -> usize;
}

/// Trait for graph data structures which allow iterating over outgoing links of a node.
pub trait LinkIterGraph<'a>: Graph {
    /// Type of the outgoing neighbor iterator.
    /// The lifetime bound has to come from a lifetime param of the trait
    /// until we can use GATs here.
    type Iter: Iterator<Item = Link> + 'a;

    /// Get an iterator over the outgoing links of the given node.
    fn neighbor_iter(&'a self, node: NodeId) -> Self::Iter;
}

/// Trait for graph types which allow random access to links based on edge ids.
pub trait RandomLinkAccessGraph: Graph {
    /// Get the link with the given id.
    fn link(&self, edge_id: EdgeId) -> Link;
    /// Find the id of an edge from `from` to `to` if one exists, by linear scan.
    fn edge_index(&self, from: NodeId, to: NodeId) -> Option<EdgeId>;
    /// Get the range of edge ids which make up the outgoing edges of `node`
    fn neighbor_edge_indices(&self, node: NodeId) -> Range<EdgeId>;

    /// Get the range of edge ids which make up the outgoing edges of `node` as a `Range<usize>`
    fn neighbor_edge_indices_usize(&self, node: NodeId) -> Range<usize> {
        let range = self.neighbor_edge_indices(node);
        Range {
            start: range.start as usize,
            end: range.end as usize,
        }
    }
}

/// Build a graph of this type as the reversal of the given graph.
/// Multi-edges are preserved, the order of edges within a node's bucket is unspecified.
pub trait BuildReversed<G> {
    fn reversed(graph: &G) -> Self;
}
