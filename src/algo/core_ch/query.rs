//! Bidirectional query over the augmented graph.
//!
//! Both searches only relax edges leading to higher ranked nodes. A meeting
//! node settled from both sides yields a tentative distance, and each side
//! stops once its frontier exceeds the current tentative travel time. The
//! energy profile of the best meeting is chained from both halves.

use super::*;
use crate::report::*;

pub struct Server {
    forward: OwnedGraph,
    backward: OwnedGraph,
    rank: Vec<u32>,
    forward_queue: IndexdMinHeap<State>,
    backward_queue: IndexdMinHeap<State>,
    forward_distances: TimestampedVector<EdgeCost>,
    backward_distances: TimestampedVector<EdgeCost>,
    capacity: EnergyUnits,
}

impl Server {
    pub fn new(graph: OwnedGraph, order: &NodeOrder, capacity: EnergyUnits) -> Server {
        let n = graph.num_nodes();
        assert_eq!(order.len(), n);
        let backward = OwnedGraph::reversed(&graph);

        Server {
            forward: graph,
            backward,
            rank: (0..n as NodeId).map(|node| order.rank(node)).collect(),
            forward_queue: IndexdMinHeap::new(n),
            backward_queue: IndexdMinHeap::new(n),
            forward_distances: TimestampedVector::new(n, EdgeCost::infinity(capacity)),
            backward_distances: TimestampedVector::new(n, EdgeCost::infinity(capacity)),
            capacity,
        }
    }

    /// Shortest travel time from `from` to `to` with the consumption profile
    /// of that path, or `None` when `to` is unreachable.
    pub fn distance(&mut self, Query { from, to }: Query) -> Option<EdgeCost> {
        report!("algo", "core_ch_query");
        if from == to {
            return Some(EdgeCost::neutral(self.capacity));
        }
        self.forward_queue.clear();
        self.backward_queue.clear();
        self.forward_distances.reset();
        self.backward_distances.reset();
        self.forward_distances.set(from as usize, EdgeCost::neutral(self.capacity));
        self.backward_distances.set(to as usize, EdgeCost::neutral(self.capacity));
        self.forward_queue.push(State { key: 0, node: from });
        self.backward_queue.push(State { key: 0, node: to });

        let mut tentative = EdgeCost::infinity(self.capacity);

        while let Some(State { node, .. }) = self.forward_queue.pop() {
            if node == to {
                break;
            }
            let settled = self.forward_distances[node as usize];
            if settled.time > tentative.time {
                break;
            }
            Self::relax_upward(
                &self.forward,
                &self.rank,
                node,
                settled,
                &mut self.forward_distances,
                &mut self.forward_queue,
                &self.backward_distances,
                &mut tentative,
                true,
            );
        }

        while let Some(State { node, .. }) = self.backward_queue.pop() {
            if node == from {
                break;
            }
            let settled = self.backward_distances[node as usize];
            if settled.time > tentative.time {
                break;
            }
            Self::relax_upward(
                &self.backward,
                &self.rank,
                node,
                settled,
                &mut self.backward_distances,
                &mut self.backward_queue,
                &self.forward_distances,
                &mut tentative,
                false,
            );
        }

        if tentative.time < INFINITY {
            Some(tentative)
        } else {
            None
        }
    }

    // `forward` selects the operand order for the combined profile of the
    // tentative best, the forward half always comes first.
    #[allow(clippy::too_many_arguments)]
    fn relax_upward(
        graph: &OwnedGraph,
        rank: &[u32],
        node: NodeId,
        settled: EdgeCost,
        distances: &mut TimestampedVector<EdgeCost>,
        queue: &mut IndexdMinHeap<State>,
        other_distances: &TimestampedVector<EdgeCost>,
        tentative: &mut EdgeCost,
        forward: bool,
    ) {
        for Link { node: next, cost } in graph.neighbor_iter(node) {
            if rank[next as usize] <= rank[node as usize] {
                continue;
            }
            let next_time = settled.time + cost.time;
            if next_time < distances[next as usize].time {
                let next_cost = EdgeCost {
                    time: next_time,
                    energy: settled.energy.chain(cost.energy),
                };
                distances.set(next as usize, next_cost);

                let next = State { key: next_time, node: next };
                if queue.contains_index(next.node as usize) {
                    queue.decrease_key(next);
                } else {
                    queue.push(next);
                }

                let other = other_distances[next.node as usize];
                if next_time + other.time < tentative.time {
                    tentative.time = next_time + other.time;
                    tentative.energy = if forward {
                        next_cost.energy.chain(other.energy)
                    } else {
                        other.energy.chain(next_cost.energy)
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::{core_ch::ContractionBuilder, dijkstra};

    fn graph() -> OwnedGraph {
        OwnedGraph::from_raw(
            100,
            vec![0, 3, 6, 9, 12, 15, 16, 17, 17, 17],
            vec![3, 5, 8, 0, 2, 7, 1, 4, 7, 0, 5, 6, 2, 6, 7, 6, 4],
            vec![1, 10, 20, 2, 3, 2, 3, 1, 5, 2, 2, 7, 1, 3, 10, 4, 2],
            vec![1, 10, 20, 2, 3, 2, 3, 1, 5, 2, 2, 7, 1, 3, 10, 4, 2],
        )
    }

    fn preprocess(graph: &OwnedGraph, core_size: usize) -> Server {
        let mut builder = ContractionBuilder::new(graph, vec![false; graph.num_nodes()], 100);
        builder.run(core_size);
        Server::new(builder.augmented_graph(), &builder.node_order(), 100)
    }

    #[test]
    fn simple_query() {
        let mut server = preprocess(&graph(), 0);
        // 0 -> 3 -> 5 -> 6 -> 4
        let result = server.distance(Query { from: 0, to: 4 }).unwrap();
        assert_eq!(result.time, 9);
    }

    #[test]
    fn all_pairs_match_plain_dijkstra() {
        let g = graph();
        let n = g.num_nodes();
        let mut server = preprocess(&g, 0);
        let mut baseline = dijkstra::Server::new(g, 100);

        for from in 0..n as NodeId {
            for to in 0..n as NodeId {
                let expected = baseline.distance(from, to);
                let got = server.distance(Query { from, to });
                assert_eq!(
                    got.map(|cost| cost.time),
                    expected.map(|cost| cost.time),
                    "wrong travel time for {} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn source_equals_target_is_free() {
        let mut server = preprocess(&graph(), 0);
        for node in 0..9 {
            let result = server.distance(Query { from: node, to: node }).unwrap();
            assert_eq!(result.time, 0);
            assert_eq!(result.energy, ConsumptionProfile::neutral(100));
        }
    }

    #[test]
    fn unreachable_pair_yields_none() {
        // nodes 7 and 8 have no outgoing edges
        let mut server = preprocess(&graph(), 0);
        assert_eq!(server.distance(Query { from: 7, to: 0 }), None);
    }

    #[test]
    fn energy_profile_chains_across_shortcuts() {
        // a chain 0 -> 1 -> 2 forced through a contracted middle node
        let g = OwnedGraph::from_raw(10, vec![0, 1, 2, 2], vec![1, 2], vec![3, 4], vec![4, -2]);
        let mut builder = ContractionBuilder::new(&g, vec![false; 3], 10);
        builder.run(0);
        let mut server = Server::new(builder.augmented_graph(), &builder.node_order(), 10);

        let result = server.distance(Query { from: 0, to: 2 }).unwrap();
        assert_eq!(result.time, 7);
        assert_eq!(result.energy.min_entry, 4);
        assert_eq!(result.energy.cost, 2);
    }
}
