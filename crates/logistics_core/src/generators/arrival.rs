use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::distributions::{fair_coin, generator_rng, pick_name, UniformCount, UniformRange};
use crate::entities::{Container, ContainerId, ContentType, IdAllocator};
use crate::error::{ConfigError, ModelError};
use crate::event::PortEvent;
use crate::generators::{reject_inputs, PORT_OUT};
use crate::model::{AtomicModel, Phase, SimTime};
use crate::scenario::ArrivalGeneratorParams;

/// Emits container batches on `out` at uniformly drawn intervals.
#[derive(Debug)]
pub struct ArrivalGenerator {
    name: String,
    capacity: UniformRange,
    interval: UniformRange,
    size: UniformCount,
    travel: UniformRange,
    names: Vec<String>,
    rng: StdRng,
    ids: IdAllocator,
    phase: Phase,
    sigma: SimTime,
    batch: Vec<Container>,
}

impl ArrivalGenerator {
    pub fn new(params: ArrivalGeneratorParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            capacity: params.capacity_range()?,
            interval: params.interval_range()?,
            size: params.size_range()?,
            travel: params.travel_range()?,
            rng: generator_rng(params.seed),
            ids: IdAllocator::starting_at(params.first_id),
            name: params.name,
            names: params.names,
            phase: Phase::Idle,
            sigma: 0.0,
            batch: Vec::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Batch waiting to be emitted in `Send`.
    pub fn pending_batch(&self) -> &[Container] {
        &self.batch
    }

    fn enter_idle(&mut self) {
        self.phase = Phase::Idle;
        self.sigma = self.interval.sample(&mut self.rng);
    }

    fn generate(&mut self, now: SimTime) {
        let size = self.size.sample(&mut self.rng);
        debug!(model = %self.name, time = now, size, "containers generated");

        for _ in 0..size {
            let Some(id) = self.ids.next_id() else {
                warn!(model = %self.name, time = now, "container ids exhausted");
                break;
            };
            let capacity = self.capacity.sample(&mut self.rng);
            let source = pick_name(&mut self.rng, &self.names).to_string();
            let destination = pick_name(&mut self.rng, &self.names).to_string();
            let content_type = ContentType::from_coin(fair_coin(&mut self.rng));
            let exigibility_date = now + self.travel.sample(&mut self.rng);

            self.batch.push(Container::new(
                ContainerId(id),
                capacity,
                source,
                destination,
                content_type,
                exigibility_date,
            ));
        }
    }
}

impl AtomicModel for ArrivalGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _now: SimTime) -> SimTime {
        self.batch.clear();
        self.enter_idle();
        self.sigma
    }

    fn time_advance(&self) -> SimTime {
        match self.phase {
            Phase::Idle => self.sigma,
            Phase::Send => 0.0,
        }
    }

    fn output(&self, _now: SimTime) -> Vec<PortEvent> {
        match self.phase {
            Phase::Send => vec![PortEvent::new(PORT_OUT).with_containers(&self.batch)],
            Phase::Idle => Vec::new(),
        }
    }

    fn internal_transition(&mut self, now: SimTime) {
        match self.phase {
            Phase::Idle => {
                self.generate(now);
                self.phase = Phase::Send;
            }
            Phase::Send => {
                self.batch.clear();
                self.enter_idle();
            }
        }
    }

    fn external_transition(
        &mut self,
        events: Vec<PortEvent>,
        _now: SimTime,
    ) -> Result<(), ModelError> {
        reject_inputs(&self.name, &events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ArrivalGeneratorParams {
        ArrivalGeneratorParams::default()
            .with_names(["Le Havre", "Paris", "Lyon"])
            .with_size(2, 4)
            .with_duration(1.0, 3.0)
            .with_travel_duration(10.0, 20.0)
            .with_seed(11)
    }

    #[test]
    fn idle_time_advance_is_stable_until_transition() {
        let mut generator = ArrivalGenerator::new(params()).expect("valid");
        let sigma = generator.initialize(0.0);
        assert!((1.0..=3.0).contains(&sigma));
        assert_eq!(generator.time_advance(), sigma);
        assert_eq!(generator.time_advance(), sigma);
    }

    #[test]
    fn firing_builds_then_flushes_batch() {
        let mut generator = ArrivalGenerator::new(params()).expect("valid");
        let sigma = generator.initialize(0.0);
        assert!(generator.output(sigma).is_empty());
        generator.internal_transition(sigma);

        assert_eq!(generator.phase(), Phase::Send);
        assert_eq!(generator.time_advance(), 0.0);
        let size = generator.pending_batch().len();
        assert!((2..=4).contains(&size));
        for container in generator.pending_batch() {
            let delay = container.exigibility_date() - sigma;
            assert!((10.0..=20.0).contains(&delay));
        }

        let out = generator.output(sigma);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].containers().expect("batch").len(), size);

        generator.internal_transition(sigma);
        assert_eq!(generator.phase(), Phase::Idle);
        assert!(generator.pending_batch().is_empty());
    }

    #[test]
    fn ids_continue_across_batches() {
        let mut generator =
            ArrivalGenerator::new(params().with_first_id(500)).expect("valid");
        generator.initialize(0.0);
        generator.internal_transition(1.0);
        let first: Vec<_> = generator.pending_batch().iter().map(|c| c.id().0).collect();
        generator.internal_transition(1.0);
        generator.internal_transition(2.0);
        let second: Vec<_> = generator.pending_batch().iter().map(|c| c.id().0).collect();

        assert_eq!(first[0], 500);
        assert_eq!(second[0], first[first.len() - 1] + 1);
    }

    #[test]
    fn negative_interval_is_rejected_at_construction() {
        let err = ArrivalGenerator::new(params().with_duration(-5.0, -1.0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { name: "Duration", .. }));
    }

    #[test]
    fn batch_stops_at_last_id() {
        let mut generator =
            ArrivalGenerator::new(params().with_size(3, 3).with_first_id(u32::MAX)).expect("valid");
        generator.initialize(0.0);
        generator.internal_transition(1.0);
        let ids: Vec<_> = generator.pending_batch().iter().map(|c| c.id().0).collect();
        assert_eq!(ids, [u32::MAX]);

        generator.internal_transition(1.0);
        generator.internal_transition(2.0);
        assert!(generator.pending_batch().is_empty());
        assert_eq!(generator.phase(), Phase::Send);
    }

    #[test]
    fn inputs_are_rejected() {
        let mut generator = ArrivalGenerator::new(params()).expect("valid");
        let err = generator
            .external_transition(vec![PortEvent::new("in")], 0.0)
            .unwrap_err();
        assert!(matches!(err, ModelError::UnexpectedPort { .. }));
    }
}
