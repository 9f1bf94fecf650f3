#![allow(dead_code)]

use logistics_core::decision::Decision;
use logistics_core::entities::{Container, Transport};
use logistics_core::event::PortEvent;
use logistics_core::model::SimTime;
use logistics_core::runner::ModelRunner;
use logistics_core::test_helpers::{container_event, transport_event};
use logistics_core::transit::{Transit, PORT_OUT};

const MAX_SETTLE_STEPS: usize = 10_000;

/// Decision and Transit wired back to back, the way a host couples them:
/// Decision's requests and releases go to Transit, Transit's confirmations go
/// back to Decision, and Transit's `out` events are collected.
pub struct DecisionTransitLink {
    pub decision: ModelRunner<Decision>,
    pub transit: ModelRunner<Transit>,
    pub delivered: Vec<(SimTime, PortEvent)>,
}

impl DecisionTransitLink {
    pub fn new(decision: Decision, transit: Transit) -> Self {
        let mut decision = ModelRunner::new(decision);
        let mut transit = ModelRunner::new(transit);
        decision.initialize(0.0);
        transit.initialize(0.0);
        Self {
            decision,
            transit,
            delivered: Vec::new(),
        }
    }

    /// Runs every event up to `now`, then hands the transport to Decision.
    pub fn arrive_transport(&mut self, transport: &Transport, now: SimTime) {
        self.advance_to(now);
        self.decision
            .deliver(vec![transport_event("transport", transport)], now)
            .expect("decision accepts transports");
        self.settle(now);
    }

    /// Runs every event up to `now`, then hands the containers to Transit.
    pub fn arrive_containers(&mut self, containers: &[Container], now: SimTime) {
        self.advance_to(now);
        let events = containers.iter().map(container_event).collect();
        self.transit
            .deliver(events, now)
            .expect("transit accepts containers");
        self.settle(now);
    }

    /// Fires scheduled events in time order up to and including `end`.
    pub fn advance_to(&mut self, end: SimTime) {
        loop {
            let next = self
                .decision
                .next_event_time()
                .min(self.transit.next_event_time());
            if !next.is_finite() || next > end {
                break;
            }
            self.settle(next);
        }
    }

    /// Fires both models at `now` until neither is due.
    pub fn settle(&mut self, now: SimTime) {
        for _ in 0..MAX_SETTLE_STEPS {
            let mut progressed = false;
            if let Some(events) = self.decision.fire(now) {
                progressed = true;
                self.transit
                    .deliver(events, now)
                    .expect("transit accepts decision output");
            }
            if let Some(events) = self.transit.fire(now) {
                progressed = true;
                let (out, confirmations): (Vec<_>, Vec<_>) =
                    events.into_iter().partition(|event| event.on_port(PORT_OUT));
                self.delivered
                    .extend(out.into_iter().map(|event| (now, event)));
                self.decision
                    .deliver(confirmations, now)
                    .expect("decision accepts transit output");
            }
            if !progressed {
                return;
            }
        }
        panic!("models still firing at {now} after {MAX_SETTLE_STEPS} steps");
    }
}
