//! The atomic-model contract shared by every component.
//!
//! A component is a finite-state machine driven by a host. The host asks for
//! the time advance, calls [`AtomicModel::output`] when the scheduled event
//! fires and immediately applies [`AtomicModel::internal_transition`]. Inputs
//! arriving at one instant are handed over in a single
//! [`AtomicModel::external_transition`] call.
//!
//! When an internal and an external event fall on the same instant the
//! external events are integrated first; the model recomputes its schedule,
//! and only then is output produced. [`crate::runner::ModelRunner`] applies
//! that ordering for one model.

use crate::error::ModelError;
use crate::event::PortEvent;
use crate::telemetry::Observation;

/// Simulation time. Dates and durations share the unit.
pub type SimTime = f64;

/// Time advance meaning "no pending work".
pub const INFINITY: SimTime = f64::INFINITY;

/// Tolerance used when comparing a departure date with the current time.
pub const TIME_EPSILON: SimTime = 1e-5;

pub trait AtomicModel: Send {
    /// Name used in log records.
    fn name(&self) -> &str;

    /// Sets the initial phase and returns the first time advance.
    fn initialize(&mut self, now: SimTime) -> SimTime;

    /// Duration until the next internal event. Never negative, and stable
    /// across repeated calls without an intervening transition.
    fn time_advance(&self) -> SimTime;

    /// Events emitted when the internal event fires. Buffers already hold
    /// everything to emit, so this never mutates the model.
    fn output(&self, now: SimTime) -> Vec<PortEvent>;

    fn internal_transition(&mut self, now: SimTime);

    /// Integrates every event addressed to the model at `now`.
    ///
    /// An error means the event could not be understood and is a wiring
    /// defect; the model state is unspecified afterwards.
    fn external_transition(&mut self, events: Vec<PortEvent>, now: SimTime)
        -> Result<(), ModelError>;

    /// Read-only observation of the model state.
    fn observe(&self, _port: &str, _now: SimTime) -> Option<Observation> {
        None
    }
}

impl<M: AtomicModel + ?Sized> AtomicModel for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn initialize(&mut self, now: SimTime) -> SimTime {
        (**self).initialize(now)
    }

    fn time_advance(&self) -> SimTime {
        (**self).time_advance()
    }

    fn output(&self, now: SimTime) -> Vec<PortEvent> {
        (**self).output(now)
    }

    fn internal_transition(&mut self, now: SimTime) {
        (**self).internal_transition(now)
    }

    fn external_transition(
        &mut self,
        events: Vec<PortEvent>,
        now: SimTime,
    ) -> Result<(), ModelError> {
        (**self).external_transition(events, now)
    }

    fn observe(&self, port: &str, now: SimTime) -> Option<Observation> {
        (**self).observe(port, now)
    }
}

/// `Idle` waits on the scheduled time advance; `Send` flushes buffered
/// output at the current instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Send,
}
