//! Runs a small port network for a few hundred time units and prints the
//! Transit and Decision observations.
//!
//! ```text
//! RUST_LOG=logistics_core=info cargo run -p logistics_core --example network_run
//! ```

use std::collections::HashMap;

use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use logistics_core::error::{ConfigError, ModelError};
use logistics_core::event::PortEvent;
use logistics_core::model::{AtomicModel, SimTime, INFINITY};
use logistics_core::runner::ModelRunner;
use logistics_core::scenario::build_model;
use logistics_core::telemetry::{
    OBS_SIZE, OBS_TIME_IN_TRANSIT, OBS_TRANSPORT_LATENESS, OBS_WAIT, OBS_WAITING,
};

const END_TIME: SimTime = 500.0;
const MAX_PASSES: usize = 10_000;

type Runner = ModelRunner<Box<dyn AtomicModel>>;

/// Models by name plus `(model, port) -> (model, port)` links.
struct Network {
    models: Vec<(String, Runner)>,
    links: HashMap<(String, String), Vec<(String, String)>>,
    sink: Vec<(SimTime, PortEvent)>,
}

impl Network {
    fn new() -> Self {
        Self {
            models: Vec::new(),
            links: HashMap::new(),
            sink: Vec::new(),
        }
    }

    fn add(&mut self, kind: &str, params: serde_json::Value) -> Result<(), ConfigError> {
        let model = build_model(kind, &params)?;
        let name = model.name().to_string();
        self.models.push((name, ModelRunner::new(model)));
        Ok(())
    }

    fn link(&mut self, from: (&str, &str), to: (&str, &str)) {
        self.links
            .entry((from.0.to_string(), from.1.to_string()))
            .or_default()
            .push((to.0.to_string(), to.1.to_string()));
    }

    fn initialize(&mut self) {
        for (_, runner) in &mut self.models {
            runner.initialize(0.0);
        }
    }

    fn next_event_time(&self) -> SimTime {
        self.models
            .iter()
            .map(|(_, runner)| runner.next_event_time())
            .fold(INFINITY, f64::min)
    }

    /// Delivers pending inputs before firing each model, until the instant
    /// is quiet.
    fn step(&mut self, now: SimTime) -> Result<(), ModelError> {
        let mut inbox: HashMap<String, Vec<PortEvent>> = HashMap::new();
        for _ in 0..MAX_PASSES {
            let mut progressed = false;
            for (name, runner) in &mut self.models {
                if let Some(events) = inbox.remove(name.as_str()) {
                    runner.deliver(events, now)?;
                    progressed = true;
                }
                let Some(events) = runner.fire(now) else {
                    continue;
                };
                progressed = true;
                for event in events {
                    match self.links.get(&(name.clone(), event.port.clone())) {
                        Some(targets) => {
                            for (model, port) in targets {
                                inbox
                                    .entry(model.clone())
                                    .or_default()
                                    .push(event.relabel(port.clone()));
                            }
                        }
                        None => self.sink.push((now, event)),
                    }
                }
            }
            if !progressed && inbox.is_empty() {
                return Ok(());
            }
        }
        panic!("network did not settle at {now}");
    }

    fn observe(&self, model: &str, port: &str, now: SimTime) -> String {
        self.models
            .iter()
            .find(|(name, _)| name == model)
            .and_then(|(_, runner)| runner.observe(port, now))
            .map(|value| value.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

fn build_network() -> Result<Network, ConfigError> {
    let mut network = Network::new();
    network.add(
        "ArrivalGenerator",
        json!({
            "Name": "arrivals",
            "MinCapacity": 1.0, "MaxCapacity": 1.0,
            "MinDuration": 1.0, "MaxDuration": 4.0,
            "MinSize": 1, "MaxSize": 5,
            "MinTravelDuration": 10.0, "MaxTravelDuration": 60.0,
            "Names": ["Le Havre", "Rouen", "Paris"],
            "Seed": 7
        }),
    )?;
    network.add(
        "TransportGenerator",
        json!({
            "Name": "boats",
            "ContainerPresent": false,
            "TransportType": 0,
            "MinCapacity": 2, "MaxCapacity": 8,
            "MinDuration": 3.0, "MaxDuration": 9.0,
            "MinStayDuration": 5.0, "MaxStayDuration": 15.0,
            "Destinations": ["Rouen", "Paris"],
            "Seed": 11
        }),
    )?;
    network.add("Split", json!({ "Name": "split" }))?;
    network.add("EntryDispatch", json!({ "Name": "entry" }))?;
    network.add("Decision", json!({ "Name": "decision", "Policy": "BatchDeparture" }))?;
    network.add("Transit", json!({ "Name": "transit", "Policy": "CapacityFill" }))?;
    network.add("Move", json!({ "Name": "move" }))?;

    network.link(("arrivals", "out"), ("split", "in"));
    network.link(("split", "out"), ("transit", "container"));
    network.link(("boats", "out"), ("entry", "in"));
    network.link(("entry", "boat"), ("decision", "transport"));
    network.link(("decision", "load"), ("transit", "load"));
    network.link(("decision", "depart"), ("transit", "depart"));
    network.link(("transit", "loaded"), ("decision", "loaded"));
    network.link(("transit", "out"), ("move", "in"));
    Ok(network)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut network = build_network()?;
    network.initialize();

    loop {
        let now = network.next_event_time();
        if now > END_TIME {
            break;
        }
        network.step(now)?;
    }

    let departures = network
        .sink
        .iter()
        .filter(|(_, event)| event.port.starts_with("to_"))
        .count();
    info!(departures, "run finished");

    println!("departures by destination:");
    let mut by_port: HashMap<&str, usize> = HashMap::new();
    for (_, event) in &network.sink {
        *by_port.entry(event.port.as_str()).or_default() += 1;
    }
    let mut ports: Vec<_> = by_port.into_iter().collect();
    ports.sort();
    for (port, count) in ports {
        println!("  {port}: {count}");
    }

    println!("transit size:             {}", network.observe("transit", OBS_SIZE, END_TIME));
    println!("transit waiting:          {}", network.observe("transit", OBS_WAITING, END_TIME));
    println!(
        "transit time-in-transit:  {}",
        network.observe("transit", OBS_TIME_IN_TRANSIT, END_TIME)
    );
    println!(
        "transit lateness:         {}",
        network.observe("transit", OBS_TRANSPORT_LATENESS, END_TIME)
    );
    println!("decision size:            {}", network.observe("decision", OBS_SIZE, END_TIME));
    println!("decision wait:            {}", network.observe("decision", OBS_WAIT, END_TIME));
    Ok(())
}
