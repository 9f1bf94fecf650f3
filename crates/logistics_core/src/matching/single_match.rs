use tracing::debug;

use crate::event::{PortEvent, ATTR_CONTAINER, PORT_FOUND, PORT_SEARCH, PORT_TAKE};
use crate::model::SimTime;

use super::policy::AllocationPolicy;
use super::queues::TransitQueues;

/// Reserves one container per `search` request and answers with `found`.
///
/// A request that finds the pool empty stays queued and is served, in
/// arrival order, as soon as containers come in.
///
/// # Algorithm Behavior
///
/// 1. Takes the oldest unconfirmed transport with spare capacity
/// 2. Reserves the waiting container with the earliest exigibility date
/// 3. Emits `found` carrying the transport and the reserved container id
/// 4. Repeats while both a request and a container are waiting
///
/// The reservation stays with the transport until its `take` releases it.
/// Transports of capacity 0 are never matched.
///
/// # Performance
///
/// O(n) per reservation where n is the number of waiting containers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleMatch;

impl AllocationPolicy for SingleMatch {
    fn name(&self) -> &'static str {
        "single-match"
    }

    fn request_port(&self) -> &'static str {
        PORT_SEARCH
    }

    fn release_port(&self) -> &'static str {
        PORT_TAKE
    }

    fn allocate(&self, queues: &mut TransitQueues, now: SimTime) -> Vec<PortEvent> {
        let mut found = Vec::new();
        for id in queues.unconfirmed() {
            if queues.search_container().is_none() {
                break;
            }
            let Some(content_type) = queues
                .transport(id)
                .filter(|transport| transport.capacity() > 0)
                .map(|transport| transport.content_type())
            else {
                continue;
            };
            let Some(container) = queues.load_container(id) else {
                break;
            };
            debug!(time = now, transport = %id, container = %container, "container reserved");
            queues.confirm(id);
            found.push(
                PortEvent::new(PORT_FOUND)
                    .with_transport_id(id)
                    .with_content_type(content_type)
                    .with_attribute(ATTR_CONTAINER, container.0),
            );
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Container, ContainerId, ContentType, Transport, TransportId};

    fn container(id: u32, exigibility: f64) -> Container {
        Container::new(ContainerId(id), 1.0, "A", "B", ContentType::Food, exigibility)
    }

    #[test]
    fn one_container_per_request() {
        let mut queues = TransitQueues::new();
        queues.push_transport(Transport::new(TransportId(7), 4, "B", ContentType::Food, 9.0));
        queues.push_container(container(0, 8.0));
        queues.push_container(container(1, 3.0));

        let found = SingleMatch.allocate(&mut queues, 1.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].transport_id().expect("id"), TransportId(7));
        assert_eq!(found[0].container_id().expect("container"), ContainerId(1));
        assert_eq!(queues.waiting_containers().len(), 1);

        assert!(SingleMatch.allocate(&mut queues, 2.0).is_empty());
    }

    #[test]
    fn pending_search_is_served_when_containers_arrive() {
        let mut queues = TransitQueues::new();
        queues.push_transport(Transport::new(TransportId(1), 1, "B", ContentType::Food, 9.0));
        queues.push_transport(Transport::new(TransportId(2), 1, "B", ContentType::Food, 9.0));
        assert!(SingleMatch.allocate(&mut queues, 1.0).is_empty());

        queues.push_container(container(0, 4.0));
        let found = SingleMatch.allocate(&mut queues, 2.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].transport_id().expect("id"), TransportId(1));

        queues.push_container(container(1, 4.0));
        let found = SingleMatch.allocate(&mut queues, 3.0);
        assert_eq!(found[0].transport_id().expect("id"), TransportId(2));
    }
}
