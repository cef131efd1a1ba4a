extern crate core_ch;

use core_ch::{
    algo::{
        core_ch::{query::Server, ContractionBuilder},
        dijkstra,
        Query,
    },
    datastr::graph::*,
};
use std::collections::HashMap;

const CAPACITY: EnergyUnits = 100;

// This is the directed graph we're going to use.
// Travel times and energy deltas coincide, so every edge consumes charge.
// Nodes 7 and 8 are sinks without outgoing edges.
fn graph() -> OwnedGraph {
    OwnedGraph::from_raw(
        CAPACITY,
        vec![0, 3, 6, 9, 12, 15, 16, 17, 17, 17],
        vec![3, 5, 8, 0, 2, 7, 1, 4, 7, 0, 5, 6, 2, 6, 7, 6, 4],
        vec![1, 10, 20, 2, 3, 2, 3, 1, 5, 2, 2, 7, 1, 3, 10, 4, 2],
        vec![1, 10, 20, 2, 3, 2, 3, 1, 5, 2, 2, 7, 1, 3, 10, 4, 2],
    )
}

fn contract(graph: &OwnedGraph, charging_station: Vec<bool>, core_size: usize) -> ContractionBuilder {
    let mut builder = ContractionBuilder::new(graph, charging_station, CAPACITY);
    builder.run(core_size);
    builder
}

#[test]
fn full_contraction_queries_match_plain_dijkstra() {
    let g = graph();
    let n = g.num_nodes() as NodeId;
    let builder = contract(&g, vec![false; n as usize], 0);
    let mut server = Server::new(builder.augmented_graph(), &builder.node_order(), CAPACITY);
    let mut baseline = dijkstra::Server::new(g, CAPACITY);

    for from in 0..n {
        for to in 0..n {
            let expected = baseline.distance(from, to);
            let got = server.distance(Query { from, to });
            assert_eq!(got.map(|cost| cost.time), expected.map(|cost| cost.time), "query {} -> {}", from, to);
        }
    }
}

// Exhaustive memoized search for a path of exactly the given travel time.
// Terminates because every edge time in the fixtures is positive.
fn path_with_exact_time_exists(graph: &OwnedGraph, from: NodeId, to: NodeId, time: Weight) -> bool {
    fn search(graph: &OwnedGraph, from: NodeId, to: NodeId, time: Weight, known: &mut HashMap<(NodeId, Weight), bool>) -> bool {
        if time == 0 {
            return from == to;
        }
        if let Some(&reachable) = known.get(&(from, time)) {
            return reachable;
        }
        let reachable = graph
            .neighbor_iter(from)
            .any(|link| link.cost.time <= time && search(graph, link.node, to, time - link.cost.time, known));
        known.insert((from, time), reachable);
        reachable
    }
    search(graph, from, to, time, &mut HashMap::new())
}

#[test]
fn shortcut_weights_are_realised_by_original_paths() {
    let g = graph();
    let builder = contract(&g, vec![false; g.num_nodes()], 0);
    let augmented = builder.augmented_graph();

    for node in 0..augmented.num_nodes() as NodeId {
        for Link { node: to, cost } in augmented.neighbor_iter(node) {
            assert!(
                path_with_exact_time_exists(&g, node, to, cost.time),
                "no original path realises edge {} -> {} with time {}",
                node,
                to,
                cost.time
            );
        }
    }
}

#[test]
fn augmented_graph_contains_all_original_edges() {
    let g = graph();
    let builder = contract(&g, vec![false; g.num_nodes()], 0);
    let augmented = builder.augmented_graph();

    for node in 0..g.num_nodes() as NodeId {
        for Link { node: to, cost } in g.neighbor_iter(node) {
            let edge = augmented.edge_index(node, to).expect("original edge missing");
            assert!(augmented.link(edge).cost.time <= cost.time);
        }
    }
}

#[test]
fn charging_stations_stay_uncontracted() {
    let g = graph();
    let n = g.num_nodes();
    let mut stations = vec![false; n];
    stations[0] = true;
    stations[4] = true;
    stations[6] = true;

    let builder = contract(&g, stations.clone(), 3);
    let order = builder.order();
    assert_eq!(order.len(), n);
    for &node in &order[n - 3..] {
        assert!(stations[node as usize], "non station node {} ended up in the core", node);
    }
}

#[test]
fn isolated_nodes_contract_without_shortcuts() {
    // two disconnected components, node 2 fully isolated
    let g = OwnedGraph::from_raw(CAPACITY, vec![0, 1, 1, 1], vec![1], vec![5], vec![2]);
    let builder = contract(&g, vec![false; 3], 0);

    assert_eq!(builder.shortcut_count(), 0);
    assert_eq!(builder.augmented_graph().num_arcs(), 1);
}

#[test]
fn query_reports_feasibility_window() {
    // 0 -> 1 uphill, 1 -> 2 downhill with recuperation
    let g = OwnedGraph::from_raw(10, vec![0, 1, 2, 2], vec![1, 2], vec![2, 2], vec![8, -5]);
    let builder = {
        let mut b = ContractionBuilder::new(&g, vec![false; 3], 10);
        b.run(0);
        b
    };
    let mut server = Server::new(builder.augmented_graph(), &builder.node_order(), 10);

    let cost = server.distance(Query { from: 0, to: 2 }).unwrap();
    assert_eq!(cost.time, 4);
    // needs at least 8 units at departure, arrives with at most 7, net consumption 3
    assert_eq!(cost.energy.min_entry, 8);
    assert_eq!(cost.energy.max_exit, 7);
    assert_eq!(cost.energy.cost, 3);
}
