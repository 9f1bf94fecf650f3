use serde_json::Value;

use crate::entities::record::ContainerRecord;
use crate::entities::{ContainerId, ContentType};
use crate::error::DecodeError;
use crate::model::SimTime;

/// A single cargo unit waiting to be carried somewhere before its
/// exigibility date.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    id: ContainerId,
    capacity: f64,
    source: String,
    destination: String,
    content_type: ContentType,
    exigibility_date: SimTime,
    /// Set by the component that receives the container.
    arrival_date: Option<SimTime>,
    path: Vec<String>,
}

impl Container {
    pub fn new(
        id: ContainerId,
        capacity: f64,
        source: impl Into<String>,
        destination: impl Into<String>,
        content_type: ContentType,
        exigibility_date: SimTime,
    ) -> Self {
        Self {
            id,
            capacity,
            source: source.into(),
            destination: destination.into(),
            content_type,
            exigibility_date,
            arrival_date: None,
            path: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }

    pub fn arrived(&mut self, time: SimTime) {
        self.arrival_date = Some(time);
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn exigibility_date(&self) -> SimTime {
        self.exigibility_date
    }

    pub fn arrival_date(&self) -> Option<SimTime> {
        self.arrival_date
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Time spent waiting since arrival, clamped at zero.
    pub fn dwell_time(&self, now: SimTime) -> f64 {
        self.arrival_date
            .map(|arrival| (now - arrival).max(0.0))
            .unwrap_or(0.0)
    }

    pub fn to_record(&self) -> ContainerRecord {
        ContainerRecord {
            id: self.id.0,
            capacity: self.capacity,
            source: self.source.clone(),
            destination: self.destination.clone(),
            content_type: self.content_type.code(),
            exigibility_date: self.exigibility_date,
            path: self.path.clone(),
        }
    }

    pub fn to_value(&self) -> Value {
        self.to_record().into_value()
    }

    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        ContainerRecord::from_value(value)?.try_into()
    }
}

impl TryFrom<ContainerRecord> for Container {
    type Error = DecodeError;

    fn try_from(record: ContainerRecord) -> Result<Self, Self::Error> {
        Ok(Container {
            id: ContainerId(record.id),
            capacity: record.capacity,
            source: record.source,
            destination: record.destination,
            content_type: ContentType::from_code(record.content_type)?,
            exigibility_date: record.exigibility_date,
            arrival_date: None,
            path: record.path,
        })
    }
}

/// Encodes a batch as a list of container records.
pub fn batch_to_value(containers: &[Container]) -> Value {
    Value::Array(containers.iter().map(Container::to_value).collect())
}

/// Decodes a list of container records into a batch.
pub fn batch_from_value(value: &Value) -> Result<Vec<Container>, DecodeError> {
    let items = value.as_array().ok_or_else(|| DecodeError::WrongType {
        name: "containers".to_string(),
        expected: "a list of container records",
    })?;
    items.iter().map(Container::from_value).collect()
}
