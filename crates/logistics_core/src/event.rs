//! Ported events exchanged between components through the host.
//!
//! An event is a port name plus an attribute map. Entities travel inside the
//! map as wire records; the typed accessors below are the single place where
//! an attribute is turned back into a value, so a missing or malformed field
//! always surfaces as a [`DecodeError`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::{
    batch_from_value, batch_to_value, Container, ContainerId, ContentType, Transport, TransportId,
};
use crate::error::DecodeError;

pub const ATTR_CONTAINER: &str = "container";
pub const ATTR_CONTAINERS: &str = "containers";
pub const ATTR_TRANSPORT: &str = "transport";
pub const ATTR_ID: &str = "id";
pub const ATTR_TYPE: &str = "type";

/// Ports of the Decision/Transit protocol.
pub const PORT_LOAD: &str = "load";
pub const PORT_LOADED: &str = "loaded";
pub const PORT_DEPART: &str = "depart";
pub const PORT_SEARCH: &str = "search";
pub const PORT_FOUND: &str = "found";
pub const PORT_TAKE: &str = "take";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortEvent {
    pub port: String,
    pub attributes: Map<String, Value>,
}

impl PortEvent {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_container(self, container: &Container) -> Self {
        self.with_attribute(ATTR_CONTAINER, container.to_value())
    }

    pub fn with_containers(self, containers: &[Container]) -> Self {
        self.with_attribute(ATTR_CONTAINERS, batch_to_value(containers))
    }

    pub fn with_transport(self, transport: &Transport) -> Self {
        self.with_attribute(ATTR_TRANSPORT, transport.to_value())
    }

    pub fn with_transport_id(self, id: TransportId) -> Self {
        self.with_attribute(ATTR_ID, id.0)
    }

    pub fn with_content_type(self, content_type: ContentType) -> Self {
        self.with_attribute(ATTR_TYPE, content_type.code())
    }

    pub fn on_port(&self, port: &str) -> bool {
        self.port == port
    }

    /// Copy of this event addressed to another port, every attribute kept.
    pub fn relabel(&self, port: impl Into<String>) -> PortEvent {
        PortEvent {
            port: port.into(),
            attributes: self.attributes.clone(),
        }
    }

    pub fn attribute(&self, name: &str) -> Result<&Value, DecodeError> {
        self.attributes
            .get(name)
            .ok_or_else(|| DecodeError::MissingAttribute {
                port: self.port.clone(),
                name: name.to_string(),
            })
    }

    pub fn integer(&self, name: &str) -> Result<i64, DecodeError> {
        self.attribute(name)?
            .as_i64()
            .ok_or_else(|| DecodeError::WrongType {
                name: name.to_string(),
                expected: "an integer",
            })
    }

    fn id_attribute(&self, name: &str) -> Result<u32, DecodeError> {
        u32::try_from(self.integer(name)?).map_err(|_| DecodeError::WrongType {
            name: name.to_string(),
            expected: "a non-negative 32-bit id",
        })
    }

    pub fn transport_id(&self) -> Result<TransportId, DecodeError> {
        self.id_attribute(ATTR_ID).map(TransportId)
    }

    /// Container id carried by `found` and `take` events.
    pub fn container_id(&self) -> Result<ContainerId, DecodeError> {
        self.id_attribute(ATTR_CONTAINER).map(ContainerId)
    }

    pub fn content_type(&self) -> Result<ContentType, DecodeError> {
        ContentType::from_code(self.integer(ATTR_TYPE)?)
    }

    pub fn container(&self) -> Result<Container, DecodeError> {
        Container::from_value(self.attribute(ATTR_CONTAINER)?)
    }

    pub fn containers(&self) -> Result<Vec<Container>, DecodeError> {
        batch_from_value(self.attribute(ATTR_CONTAINERS)?)
    }

    pub fn transport(&self) -> Result<Transport, DecodeError> {
        Transport::from_value(self.attribute(ATTR_TRANSPORT)?)
    }
}
