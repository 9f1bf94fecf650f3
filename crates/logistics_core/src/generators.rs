//! Generators: produce batches of entities at randomized intervals.
//!
//! Both generators alternate between `Idle`, whose duration is drawn once on
//! entry, and `Send`, which emits the batch built when `Idle` expired.

pub mod arrival;
pub mod transport;

pub use arrival::ArrivalGenerator;
pub use transport::TransportGenerator;

use crate::error::ModelError;
use crate::event::PortEvent;

pub const PORT_OUT: &str = "out";

/// Generators have no input ports; any delivered event is a wiring error.
pub(crate) fn reject_inputs(model: &str, events: &[PortEvent]) -> Result<(), ModelError> {
    match events.first() {
        Some(event) => Err(ModelError::UnexpectedPort {
            model: model.to_string(),
            port: event.port.clone(),
        }),
        None => Ok(()),
    }
}
