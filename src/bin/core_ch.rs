// Complete core contraction hierarchy toolchain.
// Takes a graph directory (first_out, head, travel_time, energy_delta and
// optionally charging_stations), contracts down to the requested core size,
// stores the augmented graph and the order and runs random queries against
// the result, cross-checking travel times with plain Dijkstra.

#[macro_use]
extern crate core_ch;
use core_ch::{
    algo::{core_ch::query, core_ch::ContractionBuilder, dijkstra, Query},
    cli::CliErr,
    datastr::graph::*,
    io::*,
    report::*,
};
use std::{env, error::Error, path::Path};

use rand::prelude::*;

const NUM_QUERIES: usize = 1000;
const DEFAULT_CAPACITY: EnergyUnits = 100_000;

fn main() -> Result<(), Box<dyn Error>> {
    let _reporter = enable_reporting("core_ch");

    let mut args = env::args().skip(1);
    let arg = args.next().ok_or(CliErr("No graph directory arg given"))?;
    let path = Path::new(&arg);
    let core_size: usize = args.next().ok_or(CliErr("No core size arg given"))?.parse()?;
    let capacity: EnergyUnits = args.next().map(|arg| arg.parse()).transpose()?.unwrap_or(DEFAULT_CAPACITY);
    report!("core_size_requested", core_size);
    report!("battery_capacity", capacity);

    let first_out = Vec::<EdgeId>::load_from(path.join("first_out"))?;
    let head = Vec::<NodeId>::load_from(path.join("head"))?;
    let travel_time = Vec::<Weight>::load_from(path.join("travel_time"))?;
    let energy_delta = Vec::<EnergyUnits>::load_from(path.join("energy_delta"))?;
    let graph = OwnedGraph::from_raw(capacity, first_out, head, travel_time, energy_delta);
    report!("graph", { "num_nodes": graph.num_nodes(), "num_arcs": graph.num_arcs() });

    let mut charging_station = vec![false; graph.num_nodes()];
    match Vec::<NodeId>::load_from(path.join("charging_stations")) {
        Ok(stations) => {
            for station in stations {
                charging_station[station as usize] = true;
            }
        }
        // no station file just means no stations, anything else is a broken input
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => (),
        Err(err) => return Err(err.into()),
    }
    report!("num_charging_stations", charging_station.iter().filter(|&&s| s).count());

    let mut builder = ContractionBuilder::new(&graph, charging_station, capacity);
    report_time_with_key("contraction", "contraction_running_time_ms", || builder.run(core_size));

    let augmented = builder.augmented_graph();
    let order = builder.node_order();
    report!("augmented_arcs", augmented.num_arcs());
    std::fs::create_dir_all(path.join("core_ch").join("order"))?;
    augmented.deconstruct_to(&path.join("core_ch"))?;
    order.deconstruct_to(&path.join("core_ch").join("order"))?;

    let n = graph.num_nodes() as NodeId;
    let mut server = query::Server::new(augmented, &order, capacity);
    let mut baseline = dijkstra::Server::new(graph, capacity);

    let mut rng = StdRng::from_seed(Default::default());
    let mut algo_runs_ctxt = push_collection_context("algo_runs".to_string());

    for _ in 0..NUM_QUERIES {
        let _query_ctxt = algo_runs_ctxt.push_collection_item();
        let from = rng.gen_range(0..n);
        let to = rng.gen_range(0..n);
        report!("from", from);
        report!("to", to);

        let (result, time) = measure(|| server.distance(Query { from, to }));
        report!("running_time_ms", time.as_secs_f64() * 1000.0);
        if let Some(cost) = result {
            report!("result", cost.time);
            report!("min_entry_charge", cost.energy.min_entry);
            report!("max_exit_charge", cost.energy.max_exit);
            report!("energy_cost", cost.energy.cost);
            report!("feasible", cost.energy.is_feasible(capacity));
        } else {
            report!("result", "unreachable");
        }

        let expected = baseline.distance(from, to);
        assert_eq!(result.map(|cost| cost.time), expected.map(|cost| cost.time));
    }

    Ok(())
}
