//! Test helpers for common test setup and utilities.
//!
//! Builders for entities and events so tests do not repeat field lists.

use crate::entities::{Container, ContainerId, ContentType, Transport, TransportId};
use crate::event::PortEvent;
use crate::model::SimTime;

/// Node names shared by tests that need a small network.
pub const TEST_NAMES: [&str; 3] = ["Le Havre", "Paris", "Lyon"];

/// FOOD container of capacity 1 travelling from Le Havre to Paris.
pub fn test_container(id: u32, exigibility_date: SimTime) -> Container {
    Container::new(
        ContainerId(id),
        1.0,
        TEST_NAMES[0],
        TEST_NAMES[1],
        ContentType::Food,
        exigibility_date,
    )
}

/// Containers with consecutive ids starting at 0, one per deadline.
pub fn test_containers(deadlines: &[SimTime]) -> Vec<Container> {
    deadlines
        .iter()
        .enumerate()
        .map(|(id, deadline)| test_container(id as u32, *deadline))
        .collect()
}

/// FOOD transport bound for Paris.
pub fn test_transport(id: u32, capacity: u32, departure_date: SimTime) -> Transport {
    Transport::new(
        TransportId(id),
        capacity,
        TEST_NAMES[1],
        ContentType::Food,
        departure_date,
    )
}

/// Event delivering one container to Transit.
pub fn container_event(container: &Container) -> PortEvent {
    PortEvent::new("container").with_container(container)
}

/// Event carrying a transport record, as sent to Decision or Transit.
pub fn transport_event(port: &str, transport: &Transport) -> PortEvent {
    PortEvent::new(port)
        .with_content_type(transport.content_type())
        .with_transport(transport)
}
