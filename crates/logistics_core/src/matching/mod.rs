//! Container-to-transport allocation used by Transit.
//!
//! [`TransitQueues`] owns the waiting pools and the earliest-deadline-first
//! assignment primitives; an [`AllocationPolicy`] decides when to run them
//! and which confirmations to emit.

pub mod capacity_fill;
pub mod policy;
pub mod queues;
pub mod single_match;

pub use capacity_fill::CapacityFill;
pub use policy::AllocationPolicy;
pub use queues::TransitQueues;
pub use single_match::SingleMatch;
