use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::record::TransportRecord;
use crate::entities::{ContentType, TransportId};
use crate::error::DecodeError;
use crate::model::SimTime;

/// Encoded as its integer code (`BOAT = 0`, `TRUCK = 1`, `TRAIN = 2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum TransportType {
    Boat,
    Truck,
    Train,
}

impl TransportType {
    pub fn code(self) -> i64 {
        match self {
            TransportType::Boat => 0,
            TransportType::Truck => 1,
            TransportType::Train => 2,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, DecodeError> {
        match code {
            0 => Ok(TransportType::Boat),
            1 => Ok(TransportType::Truck),
            2 => Ok(TransportType::Train),
            other => Err(DecodeError::InvalidTransportType(other)),
        }
    }

    /// Output port used by the entry dispatcher.
    pub fn port_name(self) -> &'static str {
        match self {
            TransportType::Boat => "boat",
            TransportType::Truck => "truck",
            TransportType::Train => "train",
        }
    }
}

impl TryFrom<i64> for TransportType {
    type Error = DecodeError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        TransportType::from_code(code)
    }
}

impl From<TransportType> for i64 {
    fn from(transport_type: TransportType) -> Self {
        transport_type.code()
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.port_name())
    }
}

/// A vehicle that carries up to `capacity` containers and must leave at its
/// departure date.
#[derive(Debug, Clone, PartialEq)]
pub struct Transport {
    id: TransportId,
    transport_type: Option<TransportType>,
    capacity: u32,
    destination: String,
    content_type: ContentType,
    departure_date: SimTime,
    arrival_date: Option<SimTime>,
}

impl Transport {
    pub fn new(
        id: TransportId,
        capacity: u32,
        destination: impl Into<String>,
        content_type: ContentType,
        departure_date: SimTime,
    ) -> Self {
        Self {
            id,
            transport_type: None,
            capacity,
            destination: destination.into(),
            content_type,
            departure_date,
            arrival_date: None,
        }
    }

    pub fn with_type(mut self, transport_type: TransportType) -> Self {
        self.transport_type = Some(transport_type);
        self
    }

    pub fn arrived(&mut self, time: SimTime) {
        self.arrival_date = Some(time);
    }

    pub fn id(&self) -> TransportId {
        self.id
    }

    pub fn transport_type(&self) -> Option<TransportType> {
        self.transport_type
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn departure_date(&self) -> SimTime {
        self.departure_date
    }

    pub fn arrival_date(&self) -> Option<SimTime> {
        self.arrival_date
    }

    /// How far past its departure date the transport is, clamped at zero.
    pub fn lateness(&self, now: SimTime) -> f64 {
        (now - self.departure_date).max(0.0)
    }

    pub fn to_record(&self) -> TransportRecord {
        TransportRecord {
            id: self.id.0,
            transport_type: self.transport_type.map(TransportType::code),
            capacity: f64::from(self.capacity),
            destination: self.destination.clone(),
            content_type: self.content_type.code(),
            departure_date: self.departure_date,
        }
    }

    pub fn to_value(&self) -> Value {
        self.to_record().into_value()
    }

    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        TransportRecord::from_value(value)?.try_into()
    }
}

impl TryFrom<TransportRecord> for Transport {
    type Error = DecodeError;

    fn try_from(record: TransportRecord) -> Result<Self, Self::Error> {
        let capacity = record.capacity;
        if !(capacity.is_finite() && capacity >= 0.0 && capacity.fract() == 0.0)
            || capacity > f64::from(u32::MAX)
        {
            return Err(DecodeError::InvalidCapacity(capacity));
        }
        Ok(Transport {
            id: TransportId(record.id),
            transport_type: record
                .transport_type
                .map(TransportType::from_code)
                .transpose()?,
            capacity: capacity as u32,
            destination: record.destination,
            content_type: ContentType::from_code(record.content_type)?,
            departure_date: record.departure_date,
            arrival_date: None,
        })
    }
}
