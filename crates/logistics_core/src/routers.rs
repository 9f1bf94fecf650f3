//! Relabeling stages: every input is re-emitted, attributes untouched, on a
//! port computed from one attribute.
//!
//! - [`Dispatch`]: `{input_port}_Food` / `{input_port}_NoFood`
//! - [`EntryDispatch`]: `boat` / `truck` / `train`
//! - [`Move`]: `to_{destination}`

use std::fmt::Debug;

use tracing::debug;

use crate::error::{DecodeError, ModelError};
use crate::event::PortEvent;
use crate::model::{AtomicModel, Phase, SimTime, INFINITY};

pub const PORT_IN: &str = "in";
pub const PORT_CONTAINER: &str = "container";

/// Projection from an event to its output port.
pub trait RouteRule: Debug + Default + Send {
    fn accepts(&self, port: &str) -> bool;

    fn output_port(&self, event: &PortEvent) -> Result<String, DecodeError>;
}

/// Routes by content type. Events on `container` carry a full container
/// record; every other port carries an integer `type` attribute.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByContentType;

impl RouteRule for ByContentType {
    fn accepts(&self, _port: &str) -> bool {
        true
    }

    fn output_port(&self, event: &PortEvent) -> Result<String, DecodeError> {
        let content_type = if event.on_port(PORT_CONTAINER) {
            event.container()?.content_type()
        } else {
            event.content_type()?
        };
        Ok(format!("{}_{}", event.port, content_type.port_suffix()))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ByTransportType;

impl RouteRule for ByTransportType {
    fn accepts(&self, port: &str) -> bool {
        port == PORT_IN
    }

    fn output_port(&self, event: &PortEvent) -> Result<String, DecodeError> {
        let transport = event.transport()?;
        transport
            .transport_type()
            .map(|transport_type| transport_type.port_name().to_string())
            .ok_or(DecodeError::MissingTransportType(transport.id().0))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ByDestination;

impl RouteRule for ByDestination {
    fn accepts(&self, port: &str) -> bool {
        port == PORT_IN
    }

    fn output_port(&self, event: &PortEvent) -> Result<String, DecodeError> {
        Ok(format!("to_{}", event.transport()?.destination()))
    }
}

pub type Dispatch = Router<ByContentType>;
pub type EntryDispatch = Router<ByTransportType>;
pub type Move = Router<ByDestination>;

#[derive(Debug)]
pub struct Router<R> {
    name: String,
    rule: R,
    phase: Phase,
    buffer: Vec<PortEvent>,
}

impl<R: RouteRule> Router<R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rule: R::default(),
            phase: Phase::Idle,
            buffer: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn buffered(&self) -> &[PortEvent] {
        &self.buffer
    }
}

impl<R: RouteRule> AtomicModel for Router<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _now: SimTime) -> SimTime {
        self.phase = Phase::Idle;
        self.buffer.clear();
        INFINITY
    }

    fn time_advance(&self) -> SimTime {
        match self.phase {
            Phase::Idle => INFINITY,
            Phase::Send => 0.0,
        }
    }

    fn output(&self, _now: SimTime) -> Vec<PortEvent> {
        self.buffer.clone()
    }

    fn internal_transition(&mut self, _now: SimTime) {
        self.buffer.clear();
        self.phase = Phase::Idle;
    }

    fn external_transition(
        &mut self,
        events: Vec<PortEvent>,
        now: SimTime,
    ) -> Result<(), ModelError> {
        for event in events {
            if !self.rule.accepts(&event.port) {
                return Err(ModelError::UnexpectedPort {
                    model: self.name.clone(),
                    port: event.port,
                });
            }
            let port = self.rule.output_port(&event)?;
            debug!(model = %self.name, time = now, from = %event.port, to = %port, "routed");
            self.buffer.push(PortEvent {
                port,
                attributes: event.attributes,
            });
        }
        if !self.buffer.is_empty() {
            self.phase = Phase::Send;
        }
        Ok(())
    }
}
