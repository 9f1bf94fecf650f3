//! Per-component driver: keeps one model's schedule and applies the
//! confluence rule.
//!
//! The runner does not order events between components. A host owns one
//! runner per component, delivers inputs with [`ModelRunner::deliver`] and
//! fires due internal events with [`ModelRunner::fire`]. Inputs for an
//! instant must be delivered before that instant is fired, so output is
//! never produced from a partially integrated state.

use tracing::trace;

use crate::error::ModelError;
use crate::event::PortEvent;
use crate::model::{AtomicModel, SimTime, INFINITY, TIME_EPSILON};
use crate::telemetry::Observation;

#[derive(Debug)]
pub struct ModelRunner<M> {
    model: M,
    last_event: SimTime,
    next_event: SimTime,
}

impl<M: AtomicModel> ModelRunner<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            last_event: 0.0,
            next_event: INFINITY,
        }
    }

    pub fn initialize(&mut self, now: SimTime) {
        let sigma = self.model.initialize(now);
        self.last_event = now;
        self.next_event = now + sigma;
    }

    pub fn next_event_time(&self) -> SimTime {
        self.next_event
    }

    pub fn last_event_time(&self) -> SimTime {
        self.last_event
    }

    pub fn is_due(&self, now: SimTime) -> bool {
        self.next_event.is_finite() && self.next_event <= now + TIME_EPSILON
    }

    /// Integrates every external event of the instant and reschedules.
    pub fn deliver(&mut self, events: Vec<PortEvent>, now: SimTime) -> Result<(), ModelError> {
        debug_assert!(
            now + TIME_EPSILON >= self.last_event,
            "external event at {now} precedes last event at {}",
            self.last_event
        );
        if events.is_empty() {
            return Ok(());
        }
        self.model.external_transition(events, now)?;
        self.reschedule(now);
        Ok(())
    }

    /// Fires the scheduled internal event if it is due at `now`.
    ///
    /// Returns `None` when nothing is scheduled for this instant.
    pub fn fire(&mut self, now: SimTime) -> Option<Vec<PortEvent>> {
        if !self.is_due(now) {
            return None;
        }
        let output = self.model.output(now);
        self.model.internal_transition(now);
        self.reschedule(now);
        Some(output)
    }

    /// Fires every internal event up to `end`, for models that need no
    /// input (generators). Stops after `max_steps` firings.
    pub fn run_until(&mut self, end: SimTime, max_steps: usize) -> Vec<(SimTime, PortEvent)> {
        let mut emitted = Vec::new();
        let mut steps = 0;
        while steps < max_steps && self.next_event <= end {
            let now = self.next_event;
            if let Some(events) = self.fire(now) {
                emitted.extend(events.into_iter().map(|event| (now, event)));
            }
            steps += 1;
        }
        emitted
    }

    pub fn observe(&self, port: &str, now: SimTime) -> Option<Observation> {
        self.model.observe(port, now)
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_inner(self) -> M {
        self.model
    }

    fn reschedule(&mut self, now: SimTime) {
        let sigma = self.model.time_advance();
        debug_assert!(sigma >= 0.0, "negative time advance {sigma}");
        self.last_event = now;
        self.next_event = now + sigma;
        trace!(model = self.model.name(), time = now, next = self.next_event, "rescheduled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Phase;

    /// Echoes every input on `out` one cycle later.
    #[derive(Debug, Default)]
    struct Echo {
        phase: Phase,
        buffer: Vec<PortEvent>,
    }

    impl AtomicModel for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn initialize(&mut self, _now: SimTime) -> SimTime {
            INFINITY
        }

        fn time_advance(&self) -> SimTime {
            match self.phase {
                Phase::Idle => INFINITY,
                Phase::Send => 0.0,
            }
        }

        fn output(&self, _now: SimTime) -> Vec<PortEvent> {
            self.buffer.iter().map(|event| event.relabel("out")).collect()
        }

        fn internal_transition(&mut self, _now: SimTime) {
            self.buffer.clear();
            self.phase = Phase::Idle;
        }

        fn external_transition(
            &mut self,
            events: Vec<PortEvent>,
            _now: SimTime,
        ) -> Result<(), ModelError> {
            self.buffer.extend(events);
            self.phase = Phase::Send;
            Ok(())
        }
    }

    #[test]
    fn does_not_fire_before_schedule() {
        let mut runner = ModelRunner::new(Echo::default());
        runner.initialize(0.0);
        assert_eq!(runner.next_event_time(), INFINITY);
        assert!(runner.fire(1.0).is_none());
    }

    #[test]
    fn inputs_of_an_instant_are_emitted_together() {
        let mut runner = ModelRunner::new(Echo::default());
        runner.initialize(0.0);
        runner
            .deliver(vec![PortEvent::new("a"), PortEvent::new("b")], 3.0)
            .expect("deliver");
        assert_eq!(runner.next_event_time(), 3.0);
        let out = runner.fire(3.0).expect("due");
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|event| event.on_port("out")));
        assert!(runner.fire(3.0).is_none());
    }

    #[test]
    fn empty_delivery_keeps_schedule() {
        let mut runner = ModelRunner::new(Echo::default());
        runner.initialize(0.0);
        runner.deliver(Vec::new(), 2.0).expect("deliver");
        assert_eq!(runner.next_event_time(), INFINITY);
        assert_eq!(runner.last_event_time(), 0.0);
    }
}
