use std::fmt::Debug;

use crate::entities::Transport;
use crate::error::DecodeError;
use crate::event::{
    PortEvent, ATTR_CONTAINER, PORT_DEPART, PORT_FOUND, PORT_LOAD, PORT_LOADED, PORT_SEARCH,
    PORT_TAKE,
};

/// Request/confirmation/release protocol Decision speaks with Transit.
pub trait DecisionPolicy: Debug + Send {
    fn name(&self) -> &'static str;

    /// Port used to ask for a transport to be serviced.
    fn request_port(&self) -> &'static str;

    /// Port on which servicing is confirmed.
    fn confirmation_port(&self) -> &'static str;

    /// Event that releases `transport` once `confirmation` has arrived.
    fn release(
        &self,
        transport: &Transport,
        confirmation: &PortEvent,
    ) -> Result<PortEvent, DecodeError>;
}

/// `load` then `loaded`; every confirmed transport departs with `depart`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchDeparture;

impl DecisionPolicy for BatchDeparture {
    fn name(&self) -> &'static str {
        "batch-departure"
    }

    fn request_port(&self) -> &'static str {
        PORT_LOAD
    }

    fn confirmation_port(&self) -> &'static str {
        PORT_LOADED
    }

    fn release(
        &self,
        transport: &Transport,
        _confirmation: &PortEvent,
    ) -> Result<PortEvent, DecodeError> {
        Ok(PortEvent::new(PORT_DEPART)
            .with_content_type(transport.content_type())
            .with_transport_id(transport.id()))
    }
}

/// `search` then `found`; the matched container is retired with `take`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Retirement;

impl DecisionPolicy for Retirement {
    fn name(&self) -> &'static str {
        "retirement"
    }

    fn request_port(&self) -> &'static str {
        PORT_SEARCH
    }

    fn confirmation_port(&self) -> &'static str {
        PORT_FOUND
    }

    fn release(
        &self,
        transport: &Transport,
        confirmation: &PortEvent,
    ) -> Result<PortEvent, DecodeError> {
        let container = confirmation.container_id()?;
        Ok(PortEvent::new(PORT_TAKE)
            .with_content_type(transport.content_type())
            .with_transport_id(transport.id())
            .with_attribute(ATTR_CONTAINER, container.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ContainerId, ContentType, TransportId};

    fn transport() -> Transport {
        Transport::new(TransportId(5), 2, "Lyon", ContentType::NoFood, 4.0)
    }

    #[test]
    fn depart_carries_type_and_id() {
        let confirmation = PortEvent::new(PORT_LOADED).with_transport_id(TransportId(5));
        let depart = BatchDeparture
            .release(&transport(), &confirmation)
            .expect("depart");
        assert!(depart.on_port(PORT_DEPART));
        assert_eq!(depart.transport_id().expect("id"), TransportId(5));
        assert_eq!(depart.content_type().expect("type"), ContentType::NoFood);
    }

    #[test]
    fn take_forwards_matched_container() {
        let confirmation = PortEvent::new(PORT_FOUND)
            .with_transport_id(TransportId(5))
            .with_attribute(ATTR_CONTAINER, 12);
        let take = Retirement.release(&transport(), &confirmation).expect("take");
        assert!(take.on_port(PORT_TAKE));
        assert_eq!(take.container_id().expect("container"), ContainerId(12));
    }

    #[test]
    fn found_without_container_is_rejected() {
        let confirmation = PortEvent::new(PORT_FOUND).with_transport_id(TransportId(5));
        assert!(Retirement.release(&transport(), &confirmation).is_err());
    }
}
