use std::fmt::Debug;

use crate::event::PortEvent;
use crate::model::SimTime;

use super::queues::TransitQueues;

/// Allocation strategy plugged into Transit.
pub trait AllocationPolicy: Debug + Send {
    fn name(&self) -> &'static str;

    /// Port on which transports are queued for allocation.
    fn request_port(&self) -> &'static str;

    /// Port on which queued transports are released.
    fn release_port(&self) -> &'static str;

    /// Runs after every external integration.
    ///
    /// Returns the confirmations to emit this instant. Implementations mark
    /// each confirmed transport in `queues` so that it is confirmed once.
    fn allocate(&self, queues: &mut TransitQueues, now: SimTime) -> Vec<PortEvent>;
}
