//! Building blocks for fast routing algorithms.

use crate::datastr::{graph::*, index_heap::Indexing};

pub mod core_ch;
pub mod dijkstra;

/// Simply a source-target pair
#[derive(Debug, Clone, Copy)]
pub struct Query {
    pub from: NodeId,
    pub to: NodeId,
}

/// Priority queue element for time-keyed searches.
/// The derived lexicographic order makes ties between equal keys
/// deterministic - the lower node id wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct State {
    pub key: Weight,
    pub node: NodeId,
}

impl Indexing for State {
    fn as_index(&self) -> usize {
        self.node as usize
    }
}
