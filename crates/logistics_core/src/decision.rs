//! Decision: holds arrived transports until their departure date, asks
//! Transit to service each one, then releases the confirmed transports.

pub mod policy;

pub use policy::{BatchDeparture, DecisionPolicy, Retirement};

use tracing::{debug, info, warn};

use crate::entities::Transport;
use crate::error::ModelError;
use crate::event::PortEvent;
use crate::model::{AtomicModel, Phase, SimTime, INFINITY, TIME_EPSILON};
use crate::telemetry::{Observation, OBS_SIZE, OBS_WAIT, OBS_WAITING};

pub const PORT_TRANSPORT: &str = "transport";

/// A confirmed transport and the event that releases it.
#[derive(Debug, Clone)]
struct Departure {
    transport: Transport,
    release: PortEvent,
}

#[derive(Debug)]
pub struct Decision {
    name: String,
    policy: Box<dyn DecisionPolicy>,
    phase: Phase,
    tracked: Vec<Transport>,
    awaiting: Vec<Transport>,
    ready: Vec<Departure>,
    selected: Option<Transport>,
    /// Absolute time of the next scheduled search.
    wake_at: SimTime,
    last_transition: SimTime,
}

impl Decision {
    pub fn new(name: impl Into<String>, policy: Box<dyn DecisionPolicy>) -> Self {
        Self {
            name: name.into(),
            policy,
            phase: Phase::Idle,
            tracked: Vec::new(),
            awaiting: Vec::new(),
            ready: Vec::new(),
            selected: None,
            wake_at: INFINITY,
            last_transition: 0.0,
        }
    }

    pub fn with_batch_departure(name: impl Into<String>) -> Self {
        Self::new(name, Box::new(BatchDeparture))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn policy(&self) -> &dyn DecisionPolicy {
        self.policy.as_ref()
    }

    /// Transports that arrived and are waiting for their departure date.
    pub fn tracked(&self) -> &[Transport] {
        &self.tracked
    }

    /// Transports whose request was sent and not yet confirmed.
    pub fn awaiting(&self) -> &[Transport] {
        &self.awaiting
    }

    pub fn ready(&self) -> impl Iterator<Item = &Transport> + '_ {
        self.ready.iter().map(|departure| &departure.transport)
    }

    pub fn selected(&self) -> Option<&Transport> {
        self.selected.as_ref()
    }

    /// Tracked transport due at `now`. Several due transports resolve to the
    /// lowest id; a transport whose departure date already passed counts as
    /// due.
    pub fn search_transport(&self, now: SimTime) -> Option<&Transport> {
        self.tracked
            .iter()
            .filter(|transport| transport.departure_date() - now < TIME_EPSILON)
            .min_by_key(|transport| transport.id())
    }

    /// Moves the selected transport from the tracked pool to the set waiting
    /// for confirmation.
    pub fn wait_container(&mut self) {
        let Some(selected) = self.selected.take() else {
            return;
        };
        if let Some(index) = self
            .tracked
            .iter()
            .position(|transport| transport.id() == selected.id())
        {
            let transport = self.tracked.remove(index);
            self.awaiting.push(transport);
        }
    }

    fn next_departure(&self) -> SimTime {
        self.tracked
            .iter()
            .map(Transport::departure_date)
            .fold(INFINITY, f64::min)
    }

    /// Schedules the next search on the earliest tracked departure. Outside
    /// of `recompute` the schedule only moves earlier.
    pub fn update_sigma(&mut self, now: SimTime, recompute: bool) {
        let next = self.next_departure();
        if recompute || next < self.wake_at {
            self.wake_at = next;
        }
        self.last_transition = now;
    }

    fn on_transport(&mut self, event: &PortEvent, now: SimTime) -> Result<(), ModelError> {
        let mut transport = event.transport()?;
        transport.arrived(now);
        debug!(
            model = %self.name,
            time = now,
            transport = %transport.id(),
            departure = transport.departure_date(),
            "transport tracked"
        );
        self.tracked.push(transport);
        Ok(())
    }

    fn on_confirmation(&mut self, event: &PortEvent, now: SimTime) -> Result<(), ModelError> {
        let id = event.transport_id()?;
        let Some(index) = self
            .awaiting
            .iter()
            .position(|transport| transport.id() == id)
        else {
            warn!(model = %self.name, time = now, transport = %id, "confirmation for unknown transport");
            return Ok(());
        };
        let release = self.policy.release(&self.awaiting[index], event)?;
        let transport = self.awaiting.remove(index);
        debug!(model = %self.name, time = now, transport = %id, "transport confirmed");
        self.ready.push(Departure { transport, release });
        self.phase = Phase::Send;
        Ok(())
    }
}

impl AtomicModel for Decision {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, now: SimTime) -> SimTime {
        self.phase = Phase::Idle;
        self.tracked.clear();
        self.awaiting.clear();
        self.ready.clear();
        self.selected = None;
        self.wake_at = INFINITY;
        self.last_transition = now;
        INFINITY
    }

    fn time_advance(&self) -> SimTime {
        match self.phase {
            Phase::Idle => (self.wake_at - self.last_transition).max(0.0),
            Phase::Send => 0.0,
        }
    }

    fn output(&self, _now: SimTime) -> Vec<PortEvent> {
        if self.phase != Phase::Send {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(self.ready.len() + 1);
        if let Some(selected) = &self.selected {
            events.push(
                PortEvent::new(self.policy.request_port())
                    .with_content_type(selected.content_type())
                    .with_transport(selected),
            );
        }
        events.extend(self.ready.iter().map(|departure| departure.release.clone()));
        events
    }

    fn internal_transition(&mut self, now: SimTime) {
        match self.phase {
            Phase::Idle => {
                let selected = self.search_transport(now).cloned();
                match selected {
                    Some(transport) => {
                        debug!(
                            model = %self.name,
                            time = now,
                            transport = %transport.id(),
                            request = self.policy.request_port(),
                            "transport selected"
                        );
                        self.selected = Some(transport);
                        self.phase = Phase::Send;
                        self.last_transition = now;
                    }
                    None => {
                        warn!(
                            model = %self.name,
                            time = now,
                            tracked = self.tracked.len(),
                            "no transport departs at this time"
                        );
                        self.update_sigma(now, true);
                    }
                }
            }
            Phase::Send => {
                self.wait_container();
                if !self.ready.is_empty() {
                    info!(
                        model = %self.name,
                        time = now,
                        released = self.ready.len(),
                        policy = self.policy.name(),
                        "transports released"
                    );
                    self.ready.clear();
                }
                self.phase = Phase::Idle;
                self.update_sigma(now, true);
            }
        }
    }

    fn external_transition(
        &mut self,
        events: Vec<PortEvent>,
        now: SimTime,
    ) -> Result<(), ModelError> {
        for event in &events {
            if event.on_port(PORT_TRANSPORT) {
                self.on_transport(event, now)?;
            } else if event.on_port(self.policy.confirmation_port()) {
                self.on_confirmation(event, now)?;
            } else {
                return Err(ModelError::UnexpectedPort {
                    model: self.name.clone(),
                    port: event.port.clone(),
                });
            }
        }
        self.update_sigma(now, false);
        Ok(())
    }

    fn observe(&self, port: &str, _now: SimTime) -> Option<Observation> {
        match port {
            OBS_SIZE => Some(Observation::Integer(self.tracked.len())),
            OBS_WAIT | OBS_WAITING => Some(Observation::Integer(self.awaiting.len())),
            _ => None,
        }
    }
}
