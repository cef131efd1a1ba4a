//! Core Contraction Hierarchy preprocessing.
//!
//! Removes nodes one at a time in a heuristic importance order and inserts
//! shortcut edges preserving shortest path distances among the remaining
//! nodes. Contraction can be stopped early, leaving a residual uncontracted
//! core - charging stations are pinned into that core by giving them infinite
//! importance. The result is the augmented graph (all original edges plus
//! shortcuts) and the contraction order, which together feed the query engine.

use super::*;
use crate::datastr::{index_heap::IndexdMinHeap, node_order::NodeOrder, timestamped_vector::TimestampedVector};
use crate::report::*;

pub mod query;

/// Bounded forward search deciding whether a candidate shortcut is redundant.
///
/// Distances are epoch tagged, so starting over for a new source is O(1).
/// As long as consecutive calls share the same source, the frontier is kept
/// and extended, which amortizes the search over all successor pairs examined
/// while contracting one node.
pub struct WitnessSearch {
    queue: IndexdMinHeap<State>,
    distances: TimestampedVector<EdgeCost>,
    capacity: EnergyUnits,
    source: NodeId,
}

impl WitnessSearch {
    pub fn new(n: usize, capacity: EnergyUnits) -> WitnessSearch {
        WitnessSearch {
            queue: IndexdMinHeap::new(n),
            distances: TimestampedVector::new(n, EdgeCost::infinity(capacity)),
            capacity,
            source: NodeId::MAX,
        }
    }

    /// Check whether the shortcut `(from, to)` over `via` of time cost `weight_limit` is necessary,
    /// that is whether no alternative path of at most the same time cost avoids `via`.
    ///
    /// The search never relaxes edges out of `via` and stops as soon as `to`
    /// is dequeued or the dequeued distance exceeds `weight_limit`.
    pub fn is_necessary(&mut self, graph: &OverheadGraph, from: NodeId, to: NodeId, via: NodeId, weight_limit: Weight) -> bool {
        if from != self.source {
            self.queue.clear();
            self.distances.reset();
            self.distances.set(from as usize, EdgeCost::neutral(self.capacity));
            self.queue.push(State { key: 0, node: from });
            self.source = from;
        }

        while let Some(State { node, .. }) = self.queue.pop() {
            if node == to {
                break;
            }
            if node == via {
                continue;
            }
            let settled = self.distances[node as usize];
            if settled.time > weight_limit {
                break;
            }

            for edge_id in graph.neighbor_edge_indices_usize(node) {
                if !graph.is_valid(edge_id as EdgeId) {
                    continue;
                }
                let Link { node: next, cost } = graph.link(edge_id as EdgeId);
                let next_time = settled.time + cost.time;
                if next_time < self.distances[next as usize].time {
                    self.distances.set(
                        next as usize,
                        EdgeCost {
                            time: next_time,
                            energy: settled.energy.chain(cost.energy),
                        },
                    );
                    let next = State { key: next_time, node: next };
                    if self.queue.contains_index(next.node as usize) {
                        self.queue.decrease_key(next);
                    } else {
                        self.queue.push(next);
                    }
                }
            }
        }

        self.distances[to as usize].time > weight_limit
    }
}

/// Preprocessing driver: node ordering plus incremental contraction.
///
/// Holds three synchronized mutable views of the same logical edge set: the
/// combined view accumulates shortcuts and becomes the augmented output (it
/// keeps contracted nodes' edges - the final graph contains every edge ever
/// inserted), while the forward and backward search views mirror the current
/// partially contracted graph for successor/predecessor enumeration and as
/// substrate for the witness search.
pub struct ContractionBuilder {
    graph: OverheadGraph,
    forward: OverheadGraph,
    backward: OverheadGraph,
    level: Vec<u32>,
    order: Vec<NodeId>,
    charging_station: Vec<bool>,
    witness: WitnessSearch,
    total_nodes: usize,
    contracted_nodes: usize,
    shortcut_count: usize,
    edges_in_core: usize,
}

impl ContractionBuilder {
    pub fn new(graph: &OwnedGraph, charging_station: Vec<bool>, capacity: EnergyUnits) -> ContractionBuilder {
        let n = graph.num_nodes();
        assert_eq!(charging_station.len(), n);
        let reversed = OwnedGraph::reversed(graph);

        ContractionBuilder {
            graph: OverheadGraph::new(graph, 1),
            forward: OverheadGraph::new(graph, 1),
            backward: OverheadGraph::new(&reversed, 1),
            level: vec![0; n],
            order: Vec::with_capacity(n),
            charging_station,
            witness: WitnessSearch::new(n, capacity),
            total_nodes: n,
            contracted_nodes: 0,
            shortcut_count: 0,
            edges_in_core: graph.num_arcs(),
        }
    }

    /// The contraction order so far, one entry per processed node.
    /// After `run` it is a full permutation of the node ids.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn node_order(&self) -> NodeOrder {
        NodeOrder::from_node_order(self.order.clone())
    }

    /// Compact the combined view into the augmented graph: all original edges plus all inserted shortcuts.
    pub fn augmented_graph(&self) -> OwnedGraph {
        self.graph.to_nonoverhead_graph()
    }

    pub fn shortcut_count(&self) -> usize {
        self.shortcut_count
    }

    /// Estimate of the number of edges among the not yet contracted nodes.
    pub fn edges_in_core(&self) -> usize {
        self.edges_in_core
    }

    /// Edge difference importance key for `v`: the lower, the earlier `v` gets contracted.
    /// Charging stations get an infinite key, pinning them into the core.
    fn key(&mut self, v: NodeId) -> Weight {
        if self.charging_station[v as usize] {
            return INFINITY;
        }

        let mut added = 0;
        let mut added_original = 0;

        for in_edge in self.backward.neighbor_edge_indices_usize(v) {
            if !self.backward.is_valid(in_edge as EdgeId) {
                continue;
            }
            let from = self.backward.head(in_edge as EdgeId);
            let in_cost = self.backward.cost(in_edge as EdgeId);
            for out_edge in self.forward.neighbor_edge_indices_usize(v) {
                if !self.forward.is_valid(out_edge as EdgeId) {
                    continue;
                }
                let to = self.forward.head(out_edge as EdgeId);
                let out_cost = self.forward.cost(out_edge as EdgeId);
                let shortcut_time = in_cost.time + out_cost.time;
                if self.witness.is_necessary(&self.forward, from, to, v, shortcut_time) {
                    added += 1;
                    added_original += self.backward.original_edges(in_edge as EdgeId) + self.forward.original_edges(out_edge as EdgeId);
                }
            }
        }

        let deleted = (self.forward.degree(v) + self.backward.degree(v)) as u32;
        let deleted_original = self.forward.original_outgoing_edges(v) + self.backward.original_outgoing_edges(v);

        let edge_quotient = if deleted == 0 { 0 } else { added / deleted };
        let original_quotient = if deleted_original == 0 { 0 } else { added_original / deleted_original };
        self.level[v as usize] + edge_quotient + original_quotient
    }

    /// Contract nodes in importance order until only `core_size` nodes remain
    /// uncontracted; those are appended to the order as-is and form the core.
    ///
    /// Keys are computed once when the queue is seeded and not re-evaluated
    /// when a neighbor's edges change - a deliberate non-lazy simplification.
    pub fn run(&mut self, core_size: usize) {
        let mut queue = IndexdMinHeap::new(self.total_nodes);
        for node in 0..self.total_nodes as NodeId {
            let key = self.key(node);
            queue.push(State { key, node });
        }

        while let Some(State { node, .. }) = queue.pop() {
            self.order.push(node);
            if self.contracted_nodes + core_size < self.total_nodes {
                self.contract(node);
                self.contracted_nodes += 1;

                if self.contracted_nodes % 10_000 == 0 {
                    eprintln!(
                        "contracted: {} remaining: {} shortcuts: {} edges in core: {}",
                        self.contracted_nodes,
                        self.total_nodes - self.contracted_nodes,
                        self.shortcut_count,
                        self.edges_in_core
                    );
                }
            }
        }

        report!("contracted_nodes", self.contracted_nodes);
        report!("core_size", self.total_nodes - self.contracted_nodes);
        report!("shortcuts", self.shortcut_count);
        report!("edges_in_core", self.edges_in_core);
    }

    /// Contract `v`: insert every necessary shortcut between its predecessors
    /// and successors, then remove all edges incident to `v` from both search views.
    fn contract(&mut self, v: NodeId) {
        let in_links: Vec<(NodeId, EdgeCost, u32)> = self
            .backward
            .neighbor_edge_indices_usize(v)
            .filter(|&e| self.backward.is_valid(e as EdgeId))
            .map(|e| (self.backward.head(e as EdgeId), self.backward.cost(e as EdgeId), self.backward.original_edges(e as EdgeId)))
            .collect();
        let out_links: Vec<(NodeId, EdgeCost, u32)> = self
            .forward
            .neighbor_edge_indices_usize(v)
            .filter(|&e| self.forward.is_valid(e as EdgeId))
            .map(|e| (self.forward.head(e as EdgeId), self.forward.cost(e as EdgeId), self.forward.original_edges(e as EdgeId)))
            .collect();

        for &(from, in_cost, in_original) in &in_links {
            for &(to, out_cost, out_original) in &out_links {
                let shortcut = EdgeCost {
                    time: in_cost.time + out_cost.time,
                    energy: in_cost.energy.chain(out_cost.energy),
                };
                if self.witness.is_necessary(&self.forward, from, to, v, shortcut.time) {
                    self.shortcut_count += 1;
                    self.edges_in_core += 1;
                    // upgrading an existing edge must not change the core edge count
                    if self.forward.edge_index(from, to).is_some() {
                        self.edges_in_core -= 1;
                    }

                    let original_edges = in_original + out_original;
                    self.forward.add_edge(from, to, shortcut, original_edges);
                    self.backward.add_edge(to, from, shortcut, original_edges);
                    self.graph.add_edge(from, to, shortcut, 1);
                }
            }
        }

        for &(to, ..) in &out_links {
            let out_edge = self.forward.edge_index(v, to).expect("outgoing edge of contracted node vanished");
            self.forward.delete_edge(v, out_edge);
            let mirrored = self.backward.edge_index(to, v).expect("backward mirror of outgoing edge vanished");
            self.backward.delete_edge(to, mirrored);
        }

        for &(from, ..) in &in_links {
            let in_edge = self.backward.edge_index(v, from).expect("incoming edge of contracted node vanished");
            self.backward.delete_edge(v, in_edge);
            let mirrored = self.forward.edge_index(from, v).expect("forward mirror of incoming edge vanished");
            self.forward.delete_edge(from, mirrored);
        }

        self.edges_in_core -= in_links.len() + out_links.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> OwnedGraph {
        // the 9 node test network, energy deltas equal to travel times
        OwnedGraph::from_raw(
            100,
            vec![0, 3, 6, 9, 12, 15, 16, 17, 17, 17],
            vec![3, 5, 8, 0, 2, 7, 1, 4, 7, 0, 5, 6, 2, 6, 7, 6, 4],
            vec![1, 10, 20, 2, 3, 2, 3, 1, 5, 2, 2, 7, 1, 3, 10, 4, 2],
            vec![1, 10, 20, 2, 3, 2, 3, 1, 5, 2, 2, 7, 1, 3, 10, 4, 2],
        )
    }

    #[test]
    fn full_contraction_orders_every_node() {
        let g = graph();
        let mut builder = ContractionBuilder::new(&g, vec![false; g.num_nodes()], 100);
        builder.run(0);

        let mut order = builder.order().to_vec();
        assert_eq!(order.len(), g.num_nodes());
        order.sort_unstable();
        assert_eq!(order, (0..g.num_nodes() as NodeId).collect::<Vec<_>>());
    }

    #[test]
    fn augmented_graph_contains_original_edges() {
        let g = graph();
        let mut builder = ContractionBuilder::new(&g, vec![false; g.num_nodes()], 100);
        builder.run(0);
        let augmented = builder.augmented_graph();

        for node in 0..g.num_nodes() as NodeId {
            for Link { node: to, cost } in g.neighbor_iter(node) {
                let edge_id = augmented.edge_index(node, to).expect("original edge missing from augmented graph");
                assert!(augmented.link(edge_id).cost.time <= cost.time);
            }
        }
    }

    #[test]
    fn contracting_a_sink_inserts_no_shortcuts() {
        // node 1 has incoming edges only
        let g = OwnedGraph::from_raw(10, vec![0, 1, 1, 2], vec![1, 1], vec![3, 4], vec![0, 0]);
        let mut builder = ContractionBuilder::new(&g, vec![false; 3], 10);
        builder.contract(1);

        assert_eq!(builder.shortcut_count(), 0);
        assert_eq!(builder.forward.valid_edge_count(), 0);
        assert_eq!(builder.backward.valid_edge_count(), 0);
    }

    #[test]
    fn witness_search_spares_redundant_shortcuts() {
        // 0 -> 1 -> 2 with a direct cheaper 0 -> 2: contracting 1 adds nothing
        let g = OwnedGraph::from_raw(10, vec![0, 2, 3, 3], vec![1, 2, 2], vec![1, 1, 1], vec![0, 0, 0]);
        let mut builder = ContractionBuilder::new(&g, vec![false; 3], 10);
        builder.contract(1);

        assert_eq!(builder.shortcut_count(), 0);
    }

    #[test]
    fn contraction_inserts_necessary_shortcut() {
        // path 0 -> 1 -> 2, no alternative: contracting 1 must bridge it
        let g = OwnedGraph::from_raw(10, vec![0, 1, 2, 2], vec![1, 2], vec![3, 4], vec![1, -1]);
        let mut builder = ContractionBuilder::new(&g, vec![false; 3], 10);
        builder.contract(1);

        assert_eq!(builder.shortcut_count(), 1);
        let shortcut = builder.forward.edge_index(0, 2).expect("missing shortcut");
        let cost = builder.forward.cost(shortcut);
        assert_eq!(cost.time, 7);
        assert_eq!(cost.energy.cost, 0);
    }

    #[test]
    fn charging_stations_form_the_core() {
        let g = graph();
        let n = g.num_nodes();
        let mut stations = vec![false; n];
        stations[2] = true;
        stations[6] = true;

        let mut builder = ContractionBuilder::new(&g, stations.clone(), 100);
        builder.run(2);

        let order = builder.order();
        // stations are popped last - no station may precede an eligible non-station
        for &node in &order[..n - 2] {
            assert!(!stations[node as usize]);
        }
        for &node in &order[n - 2..] {
            assert!(stations[node as usize]);
        }
    }
}
