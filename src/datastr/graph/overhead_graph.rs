//! Mutable adjacency array variant for in-place shortcut insertion.
//!
//! During contraction, shortcut edges have to be inserted into and removed
//! from the graph many times. This structure keeps the adjacency array layout
//! but reserves spare slots behind each node's edges, sized as a multiple of
//! the node's initial out degree. A per-slot validity flag marks free slots.
//! A node's live edges occupy the half open range `[first_out[u], last_out[u])`,
//! insertion fills an adjacent free slot or, when the neighborhood is boxed in,
//! relocates the node's whole bucket to the end of the array with fresh spare
//! slots - amortized growth without reallocating the entire graph.
//!
//! All mutations are local to the node they operate on: mutating node `u`
//! never invalidates edge ids or iteration state of any other node.

use super::*;

#[derive(Debug, Clone)]
pub struct OverheadGraph {
    // index of each node's first slot, not a prefix sum - buckets may relocate
    first_out: Vec<EdgeId>,
    // index one past each node's last live slot
    last_out: Vec<EdgeId>,
    head: Vec<NodeId>,
    weight: Vec<EdgeCost>,
    // tombstone flags, false marks a free slot
    is_valid: Vec<bool>,
    // how many base network edges each (possibly shortcut) edge represents
    original_edges: Vec<u32>,
    // spare slot factor relative to a node's out degree
    overhead: u32,
}

impl OverheadGraph {
    /// Wrap a static graph, reserving `overhead` times each node's out degree in spare slots.
    pub fn new<G: for<'a> LinkIterGraph<'a>>(graph: &G, overhead: u32) -> OverheadGraph {
        let n = graph.num_nodes();
        let num_slots = graph.num_arcs() * (1 + overhead as usize);

        let mut first_out = vec![0; n];
        let mut last_out = vec![0; n];
        let mut head = vec![0; num_slots];
        let mut weight = vec![EdgeCost::default(); num_slots];
        let mut is_valid = vec![false; num_slots];
        let mut original_edges = vec![0; num_slots];

        let mut slot = 0;
        for node in 0..n as NodeId {
            first_out[node as usize] = slot as EdgeId;
            let mut degree = 0;
            for link in graph.neighbor_iter(node) {
                head[slot] = link.node;
                weight[slot] = link.cost;
                is_valid[slot] = true;
                original_edges[slot] = 1;
                slot += 1;
                degree += 1;
            }
            last_out[node as usize] = slot as EdgeId;
            slot += degree * overhead as usize;
        }

        OverheadGraph {
            first_out,
            last_out,
            head,
            weight,
            is_valid,
            original_edges,
            overhead,
        }
    }

    pub fn is_valid(&self, edge_id: EdgeId) -> bool {
        self.is_valid[edge_id as usize]
    }

    pub fn head(&self, edge_id: EdgeId) -> NodeId {
        debug_assert!(self.is_valid(edge_id));
        self.head[edge_id as usize]
    }

    pub fn cost(&self, edge_id: EdgeId) -> EdgeCost {
        debug_assert!(self.is_valid(edge_id));
        self.weight[edge_id as usize]
    }

    pub fn set_cost(&mut self, edge_id: EdgeId, cost: EdgeCost) {
        debug_assert!(self.is_valid(edge_id));
        self.weight[edge_id as usize] = cost;
    }

    /// How many base network edges the given edge represents.
    pub fn original_edges(&self, edge_id: EdgeId) -> u32 {
        debug_assert!(self.is_valid(edge_id));
        self.original_edges[edge_id as usize]
    }

    /// Total number of base network edges represented by `node`'s live edges.
    pub fn original_outgoing_edges(&self, node: NodeId) -> u32 {
        self.neighbor_edge_indices_usize(node)
            .filter(|&e| self.is_valid[e])
            .map(|e| self.original_edges[e])
            .sum()
    }

    /// Number of live edges over all nodes.
    pub fn valid_edge_count(&self) -> usize {
        (0..self.num_nodes() as NodeId).map(|node| self.degree(node)).sum()
    }

    /// Insert the edge `(from, to)` with the given cost.
    ///
    /// When a live `(from, to)` edge already exists the lower travel time
    /// version of the two is kept. Otherwise a free slot adjacent to `from`'s
    /// live range is used (right first, then left), the edge array is grown by
    /// one slot when `from`'s range touches the array end, and as a last
    /// resort `from`'s whole bucket is relocated to the end of the array with
    /// `(1 + overhead) * degree + 1` fresh slots.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, cost: EdgeCost, original_edges: u32) {
        if let Some(edge_id) = self.edge_index(from, to) {
            if self.weight[edge_id as usize].time > cost.time {
                self.weight[edge_id as usize] = cost;
                self.original_edges[edge_id as usize] = original_edges;
            }
            return;
        }

        let first = self.first_out[from as usize] as usize;
        let last = self.last_out[from as usize] as usize;

        if last < self.head.len() && !self.is_valid[last] {
            // free slot right of the live range
            self.fill_slot(last, to, cost, original_edges);
            self.last_out[from as usize] += 1;
        } else if first > 0 && !self.is_valid[first - 1] {
            // free slot left of the live range
            self.fill_slot(first - 1, to, cost, original_edges);
            self.first_out[from as usize] -= 1;
        } else if last == self.head.len() {
            // live range touches the array end, grow by one slot
            self.grow(1);
            self.fill_slot(last, to, cost, original_edges);
            self.last_out[from as usize] += 1;
        } else {
            // boxed in, relocate the whole bucket to the end of the array
            let old_size = self.head.len();
            let degree = last - first;
            self.grow(degree * (1 + self.overhead as usize) + 1);
            for offset in 0..degree {
                self.head[old_size + offset] = self.head[first + offset];
                self.weight[old_size + offset] = self.weight[first + offset];
                self.is_valid[old_size + offset] = self.is_valid[first + offset];
                self.original_edges[old_size + offset] = self.original_edges[first + offset];
                self.is_valid[first + offset] = false;
            }
            self.fill_slot(old_size + degree, to, cost, original_edges);
            self.first_out[from as usize] = old_size as EdgeId;
            self.last_out[from as usize] = (old_size + degree + 1) as EdgeId;
        }
    }

    /// Remove the edge in slot `edge_id` from `node`'s bucket by swapping the
    /// last live edge into its place. O(1), keeps the live range contiguous.
    /// Edge ids within `node`'s bucket are unstable across this call.
    pub fn delete_edge(&mut self, node: NodeId, edge_id: EdgeId) {
        let edge_id = edge_id as usize;
        assert!(edge_id >= self.first_out[node as usize] as usize);
        assert!(edge_id < self.last_out[node as usize] as usize);

        if !self.is_valid[edge_id] {
            return;
        }

        let last = self.last_out[node as usize] as usize - 1;
        if edge_id != last {
            self.head[edge_id] = self.head[last];
            self.weight[edge_id] = self.weight[last];
            self.is_valid[edge_id] = self.is_valid[last];
            self.original_edges[edge_id] = self.original_edges[last];
        }
        self.is_valid[last] = false;
        self.last_out[node as usize] -= 1;
    }

    /// Remove all of `node`'s outgoing edges.
    pub fn delete_edges(&mut self, node: NodeId) {
        for edge_id in self.neighbor_edge_indices_usize(node) {
            self.is_valid[edge_id] = false;
        }
        self.last_out[node as usize] = self.first_out[node as usize];
    }

    /// Compact all live edges into a dense static graph.
    pub fn to_nonoverhead_graph(&self) -> OwnedGraph {
        let mut first_out = Vec::with_capacity(self.num_nodes() + 1);
        first_out.push(0);
        let mut head = Vec::with_capacity(self.valid_edge_count());
        let mut weight = Vec::with_capacity(self.valid_edge_count());

        for node in 0..self.num_nodes() as NodeId {
            for edge_id in self.neighbor_edge_indices_usize(node) {
                if !self.is_valid[edge_id] {
                    continue;
                }
                head.push(self.head[edge_id]);
                weight.push(self.weight[edge_id]);
            }
            first_out.push(head.len() as EdgeId);
        }

        OwnedGraph::new(first_out, head, weight)
    }

    fn fill_slot(&mut self, slot: usize, to: NodeId, cost: EdgeCost, original_edges: u32) {
        debug_assert!(!self.is_valid[slot]);
        self.head[slot] = to;
        self.weight[slot] = cost;
        self.is_valid[slot] = true;
        self.original_edges[slot] = original_edges;
    }

    fn grow(&mut self, additional: usize) {
        let new_size = self.head.len() + additional;
        self.head.resize(new_size, 0);
        self.weight.resize(new_size, EdgeCost::default());
        self.is_valid.resize(new_size, false);
        self.original_edges.resize(new_size, 0);
    }
}

impl Graph for OverheadGraph {
    fn num_nodes(&self) -> usize {
        self.first_out.len()
    }

    fn num_arcs(&self) -> usize {
        self.head.len()
    }

    fn degree(&self, node: NodeId) -> usize {
        (self.last_out[node as usize] - self.first_out[node as usize]) as usize
    }
}

impl RandomLinkAccessGraph for OverheadGraph {
    fn link(&self, edge_id: EdgeId) -> Link {
        debug_assert!(self.is_valid(edge_id));
        Link {
            node: self.head[edge_id as usize],
            cost: self.weight[edge_id as usize],
        }
    }

    fn edge_index(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.neighbor_edge_indices_usize(from)
            .find(|&edge_id| self.is_valid[edge_id] && self.head[edge_id] == to)
            .map(|edge_id| edge_id as EdgeId)
    }

    fn neighbor_edge_indices(&self, node: NodeId) -> Range<EdgeId> {
        self.first_out[node as usize]..self.last_out[node as usize]
    }
}

/// Iterator over the live outgoing links of a node.
#[derive(Debug)]
pub struct LinkIter<'a> {
    graph: &'a OverheadGraph,
    range: Range<usize>,
}

impl<'a> Iterator for LinkIter<'a> {
    type Item = Link;

    fn next(&mut self) -> Option<Link> {
        for edge_id in &mut self.range {
            if self.graph.is_valid[edge_id] {
                return Some(Link {
                    node: self.graph.head[edge_id],
                    cost: self.graph.weight[edge_id],
                });
            }
        }
        None
    }
}

impl<'a> LinkIterGraph<'a> for OverheadGraph {
    type Iter = LinkIter<'a>;

    fn neighbor_iter(&'a self, node: NodeId) -> Self::Iter {
        LinkIter {
            graph: self,
            range: self.neighbor_edge_indices_usize(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost(time: Weight) -> EdgeCost {
        EdgeCost {
            time,
            energy: ConsumptionProfile::neutral(10),
        }
    }

    fn test_graph() -> OwnedGraph {
        OwnedGraph::new(vec![0, 2, 3, 3], vec![1, 2, 2], vec![cost(1), cost(2), cost(3)])
    }

    #[test]
    fn wrap_and_compact_roundtrip() {
        let graph = test_graph();
        let overhead = OverheadGraph::new(&graph, 1);
        assert_eq!(overhead.valid_edge_count(), 3);

        let compacted = overhead.to_nonoverhead_graph();
        assert_eq!(compacted.first_out(), graph.first_out());
        assert_eq!(compacted.head(), graph.head());
    }

    #[test]
    fn add_edge_uses_spare_slot() {
        let graph = test_graph();
        let mut overhead = OverheadGraph::new(&graph, 1);
        let slots = overhead.num_arcs();

        overhead.add_edge(1, 0, cost(7), 1);
        assert_eq!(overhead.degree(1), 2);
        // spare slot reused, no growth
        assert_eq!(overhead.num_arcs(), slots);

        // upgrading an existing edge with a worse time is a no-op
        overhead.add_edge(0, 2, cost(7), 2);
        let edge_id = overhead.edge_index(0, 2).unwrap();
        assert_eq!(overhead.cost(edge_id).time, 2);
        assert_eq!(overhead.degree(0), 2);
    }

    #[test]
    fn add_edge_keeps_lower_time_cost() {
        let graph = test_graph();
        let mut overhead = OverheadGraph::new(&graph, 1);

        overhead.add_edge(1, 2, cost(1), 2);
        let edge_id = overhead.edge_index(1, 2).unwrap();
        assert_eq!(overhead.cost(edge_id).time, 1);
        assert_eq!(overhead.original_edges(edge_id), 2);
        assert_eq!(overhead.degree(1), 1);
    }

    #[test]
    fn add_edge_relocates_boxed_in_bucket() {
        let graph = OwnedGraph::new(vec![0, 1, 2, 2], vec![1, 2], vec![cost(1), cost(2)]);
        let mut overhead = OverheadGraph::new(&graph, 0);
        let slots = overhead.num_arcs();

        // node 0 has no spare slots and no free neighbors, bucket must move
        overhead.add_edge(0, 2, cost(5), 1);
        assert!(overhead.num_arcs() > slots);
        assert_eq!(overhead.degree(0), 2);
        assert!(overhead.edge_index(0, 1).is_some());
        assert!(overhead.edge_index(0, 2).is_some());
        // node 1 unaffected
        assert_eq!(overhead.degree(1), 1);
        assert_eq!(overhead.edge_index(1, 2), Some(1));
    }

    #[test]
    fn delete_edge_swaps_last_live_edge() {
        let graph = test_graph();
        let mut overhead = OverheadGraph::new(&graph, 1);

        let edge_id = overhead.edge_index(0, 1).unwrap();
        overhead.delete_edge(0, edge_id);
        assert_eq!(overhead.degree(0), 1);
        assert_eq!(overhead.edge_index(0, 1), None);
        // the remaining edge was swapped into the freed slot
        assert_eq!(overhead.edge_index(0, 2), Some(edge_id));
    }

    #[test]
    fn delete_edges_empties_bucket() {
        let graph = test_graph();
        let mut overhead = OverheadGraph::new(&graph, 1);

        overhead.delete_edges(0);
        assert_eq!(overhead.degree(0), 0);
        assert_eq!(overhead.valid_edge_count(), 1);
        assert_eq!(overhead.to_nonoverhead_graph().first_out(), &[0, 0, 1, 1]);
    }
}
