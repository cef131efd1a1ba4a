//! Basic variant of dijkstras algorithm.
//!
//! Unidirectional, no pruning - serves as the ground truth the hierarchy
//! based query engine is validated against.

use super::*;
use crate::datastr::{index_heap::IndexdMinHeap, timestamped_vector::TimestampedVector};

pub struct Server<G: for<'a> LinkIterGraph<'a>> {
    graph: G,
    distances: TimestampedVector<EdgeCost>,
    queue: IndexdMinHeap<State>,
    capacity: EnergyUnits,
}

impl<G: for<'a> LinkIterGraph<'a>> Server<G> {
    pub fn new(graph: G, capacity: EnergyUnits) -> Server<G> {
        let n = graph.num_nodes();
        Server {
            graph,
            distances: TimestampedVector::new(n, EdgeCost::infinity(capacity)),
            queue: IndexdMinHeap::new(n),
            capacity,
        }
    }

    /// Time and accumulated energy profile of a shortest (by time) path, or `None` if `to` is unreachable.
    pub fn distance(&mut self, from: NodeId, to: NodeId) -> Option<EdgeCost> {
        self.queue.clear();
        self.distances.reset();
        self.distances.set(from as usize, EdgeCost::neutral(self.capacity));
        self.queue.push(State { key: 0, node: from });

        while let Some(State { node, .. }) = self.queue.pop() {
            let settled = self.distances[node as usize];
            if node == to {
                return Some(settled);
            }

            for Link { node: next, cost } in self.graph.neighbor_iter(node) {
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

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastr::graph::first_out_graph::OwnedGraph;

    #[test]
    fn simple_dijkstra_correct_distances() {
        //
        //                  7
        //          +-----------------+
        //          |                 |
        //          v   1        2    |  2
        //          0 -----> 1 -----> 3 ---> 4
        //          |        ^        ^      ^
        //          |        | 1      |      |
        //          |        |        | 3    | 1
        //          +------> 2 -------+      |
        //           10      |               |
        //                   +---------------+
        //
        let graph = OwnedGraph::from_raw(
            100,
            vec![0, 2, 3, 6, 8, 8, 8],
            vec![2, 1, 3, 1, 3, 4, 0, 4],
            vec![10, 1, 2, 1, 3, 1, 7, 2],
            vec![10, 1, 2, 1, 3, 1, 7, 2],
        );
        let mut server = Server::new(graph, 100);

        assert_eq!(server.distance(0, 1).map(|cost| cost.time), Some(1));
        assert_eq!(server.distance(0, 3).map(|cost| cost.time), Some(3));
        assert_eq!(server.distance(3, 0).map(|cost| cost.time), Some(7));
        assert_eq!(server.distance(0, 4).map(|cost| cost.time), Some(5));
        assert_eq!(server.distance(4, 0), None);
    }

    #[test]
    fn accumulates_energy_profile_along_path() {
        // 0 -> 1 consumes 5, 1 -> 2 regenerates 3
        let graph = OwnedGraph::from_raw(10, vec![0, 1, 2, 2], vec![1, 2], vec![1, 1], vec![5, -3]);
        let mut server = Server::new(graph, 10);

        let cost = server.distance(0, 2).unwrap();
        assert_eq!(cost.time, 2);
        assert_eq!(cost.energy.cost, 2);
        assert_eq!(cost.energy.min_entry, 5);
    }
}
