//! Error types for configuration, event decoding and model transitions.
//!
//! Configuration and decode errors are fatal for the component that raises
//! them: they point at a wiring or parameter defect, never at a transient
//! condition.

use thiserror::Error;

/// Errors raised while validating component parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter map could not be deserialized.
    #[error("malformed parameters for {component}: {source}")]
    Malformed {
        component: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// A `min..=max` range has `min > max` or a non-finite bound.
    #[error("invalid range {name}: [{min}, {max}]")]
    InvalidRange { name: &'static str, min: f64, max: f64 },
    /// A name list that must be sampled from is empty.
    #[error("parameter {0} must not be empty")]
    Empty(&'static str),
    #[error("unknown component kind {0:?}")]
    UnknownComponent(String),
}

/// Errors raised while turning an untyped event attribute into an entity.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("event on port {port:?} is missing attribute {name:?}")]
    MissingAttribute { port: String, name: String },
    #[error("attribute {name:?} is not {expected}")]
    WrongType { name: String, expected: &'static str },
    #[error("malformed {record} record: {source}")]
    Malformed {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown content type {0}")]
    InvalidContentType(i64),
    #[error("unknown transport type {0}")]
    InvalidTransportType(i64),
    #[error("transport capacity {0} is not a non-negative integer")]
    InvalidCapacity(f64),
    #[error("transport {0} has no type")]
    MissingTransportType(u32),
}

/// Errors surfaced by [`crate::model::AtomicModel::external_transition`].
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("model {model:?} has no input port {port:?}")]
    UnexpectedPort { model: String, port: String },
}
