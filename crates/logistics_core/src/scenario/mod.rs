//! Scenario setup: parameter structs and the constructors that turn them
//! into components.

mod build;
mod params;

pub use build::{
    build_arrival_generator, build_decision, build_model, build_transit,
    build_transport_generator, create_batch_departure, create_capacity_fill, create_retirement,
    create_single_match, ComponentKind,
};
pub use params::{
    ArrivalGeneratorParams, DecisionParams, DecisionPolicyKind, StageParams, TransitParams,
    TransitPolicyKind, TransportGeneratorParams,
};
