//! Cargo entities that flow between components.
//!
//! Containers and transports are owned by whichever component currently
//! queues them. Crossing an event boundary goes through the wire records in
//! [`record`], so the receiver always decodes its own copy.

pub mod container;
pub mod record;
pub mod transport;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

pub use container::{batch_from_value, batch_to_value, Container};
pub use record::{ContainerRecord, TransportRecord};
pub use transport::{Transport, TransportType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportId(pub u32);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TransportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a container holds, or what a transport is allowed to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ContentType {
    Food,
    NoFood,
}

impl ContentType {
    /// Integer code used on the wire (`FOOD = 0`, `NOFOOD = 1`).
    pub fn code(self) -> i64 {
        match self {
            ContentType::Food => 0,
            ContentType::NoFood => 1,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, DecodeError> {
        match code {
            0 => Ok(ContentType::Food),
            1 => Ok(ContentType::NoFood),
            other => Err(DecodeError::InvalidContentType(other)),
        }
    }

    /// Suffix appended to a port name by the content-type dispatcher.
    pub fn port_suffix(self) -> &'static str {
        match self {
            ContentType::Food => "Food",
            ContentType::NoFood => "NoFood",
        }
    }

    /// Fair-coin mapping used by the generators.
    pub fn from_coin(heads: bool) -> Self {
        if heads {
            ContentType::Food
        } else {
            ContentType::NoFood
        }
    }
}

impl TryFrom<i64> for ContentType {
    type Error = DecodeError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        ContentType::from_code(code)
    }
}

impl From<ContentType> for i64 {
    fn from(content_type: ContentType) -> Self {
        content_type.code()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Food => f.write_str("FOOD"),
            ContentType::NoFood => f.write_str("NOFOOD"),
        }
    }
}

/// Monotonic id source owned by a single generator.
///
/// Two generators feeding the same matching component should start from
/// disjoint ranges (see `FirstId` in the generator parameters). Once
/// `u32::MAX` has been handed out the allocator is exhausted.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: Option<u32>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

impl IdAllocator {
    pub fn starting_at(first: u32) -> Self {
        Self { next: Some(first) }
    }

    /// Next free id, or `None` when the id space is used up.
    pub fn next_id(&mut self) -> Option<u32> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }

    pub fn peek(&self) -> Option<u32> {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_codes_round_trip() {
        for content_type in [ContentType::Food, ContentType::NoFood] {
            assert_eq!(
                ContentType::from_code(content_type.code()).expect("known code"),
                content_type
            );
        }
        assert!(matches!(
            ContentType::from_code(7),
            Err(DecodeError::InvalidContentType(7))
        ));
    }

    #[test]
    fn allocator_is_monotonic_from_its_start() {
        let mut ids = IdAllocator::starting_at(100);
        assert_eq!(ids.next_id(), Some(100));
        assert_eq!(ids.next_id(), Some(101));
        assert_eq!(ids.peek(), Some(102));
    }

    #[test]
    fn allocator_hands_out_max_then_stops() {
        let mut ids = IdAllocator::starting_at(u32::MAX - 1);
        assert_eq!(ids.next_id(), Some(u32::MAX - 1));
        assert_eq!(ids.next_id(), Some(u32::MAX));
        assert_eq!(ids.next_id(), None);
        assert_eq!(ids.peek(), None);
    }

    #[test]
    fn allocators_are_independent() {
        let mut a = IdAllocator::default();
        let mut b = IdAllocator::default();
        a.next_id();
        a.next_id();
        assert_eq!(b.next_id(), Some(0));
    }
}
