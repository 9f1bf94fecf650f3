use std::collections::{HashMap, HashSet};

use crate::entities::{Container, ContainerId, Transport, TransportId};
use crate::model::SimTime;
use crate::telemetry::mean_delay;

/// Waiting pools and per-transport assignments held by Transit.
///
/// Containers leave the pool when assigned and are dropped for good when
/// their transport is released. A transport's assignment list never grows
/// past its declared capacity.
#[derive(Debug, Default, Clone)]
pub struct TransitQueues {
    waiting_containers: Vec<Container>,
    waiting_transports: Vec<Transport>,
    loading: HashMap<TransportId, Vec<Container>>,
    confirmed: HashSet<TransportId>,
    ready: Vec<TransportId>,
}

impl TransitQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_container(&mut self, container: Container) {
        self.waiting_containers.push(container);
    }

    /// Queues a transport behind the ones already waiting. Returns `false`
    /// when a transport with the same id is already queued.
    pub fn push_transport(&mut self, transport: Transport) -> bool {
        if self.transport(transport.id()).is_some() {
            return false;
        }
        self.waiting_transports.push(transport);
        true
    }

    pub fn waiting_containers(&self) -> &[Container] {
        &self.waiting_containers
    }

    pub fn waiting_transports(&self) -> &[Transport] {
        &self.waiting_transports
    }

    pub fn transport(&self, id: TransportId) -> Option<&Transport> {
        self.waiting_transports
            .iter()
            .find(|transport| transport.id() == id)
    }

    /// Containers assigned to a waiting transport so far.
    pub fn assigned(&self, id: TransportId) -> &[Container] {
        self.loading.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_full(&self, transport: &Transport) -> bool {
        self.assigned(transport.id()).len() >= transport.capacity() as usize
    }

    pub fn is_confirmed(&self, id: TransportId) -> bool {
        self.confirmed.contains(&id)
    }

    pub fn confirm(&mut self, id: TransportId) {
        self.confirmed.insert(id);
    }

    pub fn is_ready(&self, id: TransportId) -> bool {
        self.ready.contains(&id)
    }

    /// Waiting container with the earliest exigibility date; ties go to the
    /// one that has waited longest.
    pub fn search_container(&self) -> Option<&Container> {
        earliest_deadline(&self.waiting_containers).map(|index| &self.waiting_containers[index])
    }

    /// Assigns the earliest-deadline container to `transport`.
    ///
    /// The pool is scanned once, O(n) in the number of waiting containers.
    /// Among equal exigibility dates the first in pool order wins, which is
    /// the container that arrived first.
    ///
    /// Returns the assigned container id, or `None` when the pool is empty
    /// or the transport is not queued.
    ///
    /// # Panics
    ///
    /// Panics if the transport already holds as many containers as its
    /// capacity.
    pub fn load_container(&mut self, transport: TransportId) -> Option<ContainerId> {
        let capacity = self.transport(transport)?.capacity() as usize;
        let assigned = self.loading.entry(transport).or_default();
        assert!(
            assigned.len() < capacity,
            "transport {transport} already holds its capacity of {capacity} containers"
        );
        let index = earliest_deadline(&self.waiting_containers)?;
        let container = self.waiting_containers.remove(index);
        let id = container.id();
        assigned.push(container);
        Some(id)
    }

    /// Fills waiting transports in queue order, each up to its capacity
    /// before the next one gets a container. Transports already released
    /// are skipped.
    ///
    /// Returns whether any transport became full during this pass.
    pub fn load_containers(&mut self) -> bool {
        let mut filled = false;
        for index in 0..self.waiting_transports.len() {
            if self.waiting_containers.is_empty() {
                break;
            }
            let transport = &self.waiting_transports[index];
            let (id, capacity) = (transport.id(), transport.capacity() as usize);
            if self.is_ready(id) {
                continue;
            }
            let before = self.assigned(id).len();
            while self.assigned(id).len() < capacity && self.load_container(id).is_some() {}
            let after = self.assigned(id).len();
            filled |= before < capacity && after == capacity;
        }
        filled
    }

    /// Full transports whose `loaded` confirmation has not been emitted.
    pub fn full_unconfirmed(&self) -> Vec<TransportId> {
        self.waiting_transports
            .iter()
            .filter(|transport| self.is_full(transport) && !self.is_confirmed(transport.id()))
            .map(Transport::id)
            .collect()
    }

    /// Waiting transports without a confirmation, in queue order.
    pub fn unconfirmed(&self) -> Vec<TransportId> {
        self.waiting_transports
            .iter()
            .map(Transport::id)
            .filter(|id| !self.is_confirmed(*id) && !self.is_ready(*id))
            .collect()
    }

    /// Marks a queued transport for release. Returns `false` for an id that
    /// is not queued.
    pub fn release(&mut self, id: TransportId) -> bool {
        if self.transport(id).is_none() {
            return false;
        }
        if !self.is_ready(id) {
            self.ready.push(id);
        }
        true
    }

    pub fn has_ready(&self) -> bool {
        !self.ready.is_empty()
    }

    /// Released transports with their assigned batch, in release order.
    pub fn ready(&self) -> impl Iterator<Item = (&Transport, &[Container])> + '_ {
        self.ready
            .iter()
            .filter_map(move |id| self.transport(*id).map(|transport| (transport, self.assigned(*id))))
    }

    /// Drops every released transport together with its containers.
    /// Returns how many transports left.
    pub fn remove_ready(&mut self) -> usize {
        let ready = std::mem::take(&mut self.ready);
        for id in &ready {
            self.loading.remove(id);
            self.confirmed.remove(id);
        }
        self.waiting_transports
            .retain(|transport| !ready.contains(&transport.id()));
        ready.len()
    }

    pub fn mean_time_in_transit(&self, now: SimTime) -> f64 {
        mean_delay(&self.waiting_containers, now, Container::dwell_time)
    }

    pub fn mean_transport_lateness(&self, now: SimTime) -> f64 {
        mean_delay(&self.waiting_transports, now, Transport::lateness)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn earliest_deadline(containers: &[Container]) -> Option<usize> {
    containers
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, SimTime)>, (index, container)| {
            let date = container.exigibility_date();
            match best {
                Some((_, best_date)) if best_date <= date => best,
                _ => Some((index, date)),
            }
        })
        .map(|(index, _)| index)
}
