//! Transit: pairs waiting containers with waiting transports and releases
//! departing transports together with their load.

use tracing::{debug, info, warn};

use crate::error::ModelError;
use crate::event::{PortEvent, ATTR_CONTAINER};
use crate::matching::{AllocationPolicy, CapacityFill, TransitQueues};
use crate::model::{AtomicModel, Phase, SimTime, INFINITY};
use crate::telemetry::{
    Observation, OBS_SIZE, OBS_TIME_IN_TRANSIT, OBS_TRANSPORT_LATENESS, OBS_WAITING,
    OBS_WAIT_TRANSPORT_TIME,
};

pub const PORT_CONTAINER: &str = "container";
pub const PORT_OUT: &str = "out";

#[derive(Debug)]
pub struct Transit {
    name: String,
    policy: Box<dyn AllocationPolicy>,
    queues: TransitQueues,
    phase: Phase,
    confirmations: Vec<PortEvent>,
}

impl Transit {
    pub fn new(name: impl Into<String>, policy: Box<dyn AllocationPolicy>) -> Self {
        Self {
            name: name.into(),
            policy,
            queues: TransitQueues::new(),
            phase: Phase::Idle,
            confirmations: Vec::new(),
        }
    }

    pub fn with_capacity_fill(name: impl Into<String>) -> Self {
        Self::new(name, Box::new(CapacityFill))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn policy(&self) -> &dyn AllocationPolicy {
        self.policy.as_ref()
    }

    pub fn queues(&self) -> &TransitQueues {
        &self.queues
    }

    fn on_container(&mut self, event: &PortEvent, now: SimTime) -> Result<(), ModelError> {
        let mut container = event.container()?;
        container.arrived(now);
        debug!(model = %self.name, time = now, container = %container.id(), "container queued");
        self.queues.push_container(container);
        Ok(())
    }

    fn on_request(&mut self, event: &PortEvent, now: SimTime) -> Result<(), ModelError> {
        let mut transport = event.transport()?;
        let id = transport.id();
        transport.arrived(now);
        if self.queues.push_transport(transport) {
            debug!(
                model = %self.name,
                time = now,
                transport = %id,
                waiting = self.queues.waiting_transports().len(),
                "transport queued"
            );
        } else {
            warn!(model = %self.name, time = now, transport = %id, "transport already queued");
        }
        Ok(())
    }

    fn on_release(&mut self, event: &PortEvent, now: SimTime) -> Result<(), ModelError> {
        let id = event.transport_id()?;
        if event.attributes.contains_key(ATTR_CONTAINER) {
            let container = event.container_id()?;
            let reserved = self
                .queues
                .assigned(id)
                .iter()
                .any(|assigned| assigned.id() == container);
            if !reserved {
                warn!(
                    model = %self.name,
                    time = now,
                    transport = %id,
                    container = %container,
                    "released container was not reserved for this transport"
                );
            }
        }
        if self.queues.release(id) {
            debug!(model = %self.name, time = now, transport = %id, "transport released");
        } else {
            warn!(model = %self.name, time = now, transport = %id, "release for unknown transport");
        }
        Ok(())
    }
}

impl AtomicModel for Transit {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _now: SimTime) -> SimTime {
        self.queues.clear();
        self.confirmations.clear();
        self.phase = Phase::Idle;
        INFINITY
    }

    fn time_advance(&self) -> SimTime {
        match self.phase {
            Phase::Idle => INFINITY,
            Phase::Send => 0.0,
        }
    }

    fn output(&self, _now: SimTime) -> Vec<PortEvent> {
        let mut events = self.confirmations.clone();
        events.extend(self.queues.ready().map(|(transport, containers)| {
            PortEvent::new(PORT_OUT)
                .with_transport(transport)
                .with_containers(containers)
        }));
        events
    }

    fn internal_transition(&mut self, now: SimTime) {
        self.confirmations.clear();
        if self.queues.has_ready() {
            let departed = self.queues.remove_ready();
            info!(
                model = %self.name,
                time = now,
                departed,
                waiting = self.queues.waiting_transports().len(),
                "transports departed"
            );
        }
        self.phase = Phase::Idle;
    }

    fn external_transition(
        &mut self,
        events: Vec<PortEvent>,
        now: SimTime,
    ) -> Result<(), ModelError> {
        for event in &events {
            if event.on_port(PORT_CONTAINER) {
                self.on_container(event, now)?;
            } else if event.on_port(self.policy.request_port()) {
                self.on_request(event, now)?;
            } else if event.on_port(self.policy.release_port()) {
                self.on_release(event, now)?;
            } else {
                return Err(ModelError::UnexpectedPort {
                    model: self.name.clone(),
                    port: event.port.clone(),
                });
            }
        }

        let confirmations = self.policy.allocate(&mut self.queues, now);
        if !confirmations.is_empty() {
            debug!(
                model = %self.name,
                time = now,
                policy = self.policy.name(),
                count = confirmations.len(),
                "confirmations pending"
            );
        }
        self.confirmations.extend(confirmations);

        if !self.confirmations.is_empty() || self.queues.has_ready() {
            self.phase = Phase::Send;
        }
        Ok(())
    }

    fn observe(&self, port: &str, now: SimTime) -> Option<Observation> {
        match port {
            OBS_SIZE => Some(Observation::Integer(self.queues.waiting_containers().len())),
            OBS_WAITING => Some(Observation::Integer(self.queues.waiting_transports().len())),
            OBS_TIME_IN_TRANSIT => Some(Observation::Real(self.queues.mean_time_in_transit(now))),
            OBS_TRANSPORT_LATENESS | OBS_WAIT_TRANSPORT_TIME => {
                Some(Observation::Real(self.queues.mean_transport_lateness(now)))
            }
            _ => None,
        }
    }
}
