use tracing::debug;

use crate::event::{PortEvent, PORT_DEPART, PORT_LOAD, PORT_LOADED};
use crate::model::SimTime;

use super::policy::AllocationPolicy;
use super::queues::TransitQueues;

/// Loads every waiting transport up to capacity, earliest deadline first,
/// and confirms each one with `loaded` once it is full.
///
/// Transports are served in the order their `load` request arrived; the
/// first one is filled completely before the next gets a container.
///
/// # Algorithm Behavior
///
/// 1. Walks waiting transports in queue order, skipping released ones
/// 2. Assigns the waiting container with the earliest exigibility date
///    until the transport reaches its capacity or the pool is empty
/// 3. Emits one `loaded` event for every full transport not yet confirmed
///
/// Equal exigibility dates go to the container that has waited longest.
/// A transport with capacity 0 is full on arrival and confirmed at once.
///
/// # Performance
///
/// Each assignment scans the pool, so a pass costs O(k * n) where k is the
/// number of containers assigned and n the pool size.
#[derive(Debug, Default, Clone, Copy)]
pub struct CapacityFill;

impl AllocationPolicy for CapacityFill {
    fn name(&self) -> &'static str {
        "capacity-fill"
    }

    fn request_port(&self) -> &'static str {
        PORT_LOAD
    }

    fn release_port(&self) -> &'static str {
        PORT_DEPART
    }

    fn allocate(&self, queues: &mut TransitQueues, now: SimTime) -> Vec<PortEvent> {
        if !queues.waiting_transports().is_empty() && !queues.waiting_containers().is_empty() {
            let filled = queues.load_containers();
            debug!(
                time = now,
                filled,
                remaining = queues.waiting_containers().len(),
                "containers loaded"
            );
        }

        let mut confirmations = Vec::new();
        for id in queues.full_unconfirmed() {
            let Some(transport) = queues.transport(id) else {
                continue;
            };
            confirmations.push(
                PortEvent::new(PORT_LOADED)
                    .with_transport_id(id)
                    .with_content_type(transport.content_type()),
            );
            queues.confirm(id);
        }
        confirmations
    }
}
