//! Unbundles container batches into one event per container.

use tracing::debug;

use crate::entities::Container;
use crate::error::ModelError;
use crate::event::PortEvent;
use crate::model::{AtomicModel, Phase, SimTime, INFINITY};

pub const PORT_OUT: &str = "out";

#[derive(Debug)]
pub struct Split {
    name: String,
    phase: Phase,
    batches: Vec<Vec<Container>>,
}

impl Split {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phase: Phase::Idle,
            batches: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of containers that the next output will emit.
    pub fn pending(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }
}

impl AtomicModel for Split {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _now: SimTime) -> SimTime {
        self.phase = Phase::Idle;
        self.batches.clear();
        INFINITY
    }

    fn time_advance(&self) -> SimTime {
        match self.phase {
            Phase::Idle => INFINITY,
            Phase::Send => 0.0,
        }
    }

    fn output(&self, _now: SimTime) -> Vec<PortEvent> {
        self.batches
            .iter()
            .flatten()
            .map(|container| PortEvent::new(PORT_OUT).with_container(container))
            .collect()
    }

    fn internal_transition(&mut self, _now: SimTime) {
        self.batches.clear();
        self.phase = Phase::Idle;
    }

    fn external_transition(
        &mut self,
        events: Vec<PortEvent>,
        now: SimTime,
    ) -> Result<(), ModelError> {
        for event in &events {
            let mut batch = event.containers()?;
            for container in &mut batch {
                container.arrived(now);
            }
            debug!(model = %self.name, time = now, size = batch.len(), "batch split");
            self.batches.push(batch);
        }
        if !self.batches.is_empty() {
            self.phase = Phase::Send;
        }
        Ok(())
    }
}
