use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, warn};

use crate::distributions::{fair_coin, generator_rng, pick_name, UniformCount, UniformRange};
use crate::entities::{
    Container, ContainerId, ContentType, IdAllocator, Transport, TransportId, TransportType,
};
use crate::error::{ConfigError, ModelError};
use crate::event::PortEvent;
use crate::generators::{reject_inputs, PORT_OUT};
use crate::model::{AtomicModel, Phase, SimTime};
use crate::scenario::TransportGeneratorParams;

/// Container batch paired with every generated transport.
#[derive(Debug, Clone)]
struct PairedContainers {
    min_size: u32,
    travel: UniformRange,
}

/// Emits one transport per firing on `out`, optionally with a container
/// batch that fits in it.
#[derive(Debug)]
pub struct TransportGenerator {
    name: String,
    transport_type: Option<TransportType>,
    capacity: UniformCount,
    interval: UniformRange,
    stay: UniformRange,
    destinations: Vec<String>,
    paired: Option<PairedContainers>,
    rng: StdRng,
    transport_ids: IdAllocator,
    container_ids: IdAllocator,
    phase: Phase,
    sigma: SimTime,
    transport: Option<Transport>,
    containers: Vec<Container>,
}

impl TransportGenerator {
    pub fn new(params: TransportGeneratorParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let paired = if params.container_present {
            Some(PairedContainers {
                min_size: params.min_size,
                travel: params.travel_range()?,
            })
        } else {
            None
        };
        Ok(Self {
            transport_type: params.transport_type,
            capacity: params.capacity_range()?,
            interval: params.interval_range()?,
            stay: params.stay_range()?,
            paired,
            rng: generator_rng(params.seed),
            transport_ids: IdAllocator::starting_at(params.first_transport_id),
            container_ids: IdAllocator::starting_at(params.first_container_id),
            name: params.name,
            destinations: params.destinations,
            phase: Phase::Idle,
            sigma: 0.0,
            transport: None,
            containers: Vec::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending_transport(&self) -> Option<&Transport> {
        self.transport.as_ref()
    }

    pub fn pending_containers(&self) -> &[Container] {
        &self.containers
    }

    fn enter_idle(&mut self) {
        self.phase = Phase::Idle;
        self.sigma = self.interval.sample(&mut self.rng);
    }

    fn generate_transport(&mut self, now: SimTime) {
        let Some(id) = self.transport_ids.next_id() else {
            warn!(model = %self.name, time = now, "transport ids exhausted");
            return;
        };
        let capacity = self.capacity.sample(&mut self.rng);
        let destination = pick_name(&mut self.rng, &self.destinations).to_string();
        let content_type = ContentType::from_coin(fair_coin(&mut self.rng));
        let departure_date = now + self.stay.sample(&mut self.rng);

        let mut transport = Transport::new(
            TransportId(id),
            capacity,
            destination,
            content_type,
            departure_date,
        );
        if let Some(transport_type) = self.transport_type {
            transport = transport.with_type(transport_type);
        }
        debug!(
            model = %self.name,
            time = now,
            transport = %transport.id(),
            capacity,
            departure = departure_date,
            "transport generated"
        );
        self.transport = Some(transport);

        if let Some(paired) = self.paired.clone() {
            self.generate_containers(now, capacity, &paired);
        }
    }

    fn generate_containers(&mut self, now: SimTime, capacity: u32, paired: &PairedContainers) {
        let size = if paired.min_size < capacity {
            self.rng.gen_range(paired.min_size..=capacity)
        } else {
            capacity
        };
        debug!(model = %self.name, time = now, size, "paired containers generated");

        for _ in 0..size {
            let Some(id) = self.container_ids.next_id() else {
                warn!(model = %self.name, time = now, "container ids exhausted");
                break;
            };
            let source = pick_name(&mut self.rng, &self.destinations).to_string();
            let destination = pick_name(&mut self.rng, &self.destinations).to_string();
            let content_type = ContentType::from_coin(fair_coin(&mut self.rng));
            let exigibility_date = now + paired.travel.sample(&mut self.rng);

            self.containers.push(Container::new(
                ContainerId(id),
                1.0,
                source,
                destination,
                content_type,
                exigibility_date,
            ));
        }
    }
}

impl AtomicModel for TransportGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _now: SimTime) -> SimTime {
        self.transport = None;
        self.containers.clear();
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
        match (self.phase, &self.transport) {
            (Phase::Send, Some(transport)) => vec![PortEvent::new(PORT_OUT)
                .with_transport(transport)
                .with_containers(&self.containers)],
            _ => Vec::new(),
        }
    }

    fn internal_transition(&mut self, now: SimTime) {
        match self.phase {
            Phase::Idle => {
                self.generate_transport(now);
                self.phase = Phase::Send;
            }
            Phase::Send => {
                self.transport = None;
                self.containers.clear();
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
