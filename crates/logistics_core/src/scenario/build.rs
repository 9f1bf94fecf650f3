use std::str::FromStr;

use serde_json::Value;
use tracing::info;

use super::params::{
    ArrivalGeneratorParams, DecisionParams, DecisionPolicyKind, StageParams, TransitParams,
    TransitPolicyKind, TransportGeneratorParams,
};
use crate::decision::{BatchDeparture, Decision, DecisionPolicy, Retirement};
use crate::error::ConfigError;
use crate::generators::{ArrivalGenerator, TransportGenerator};
use crate::matching::{AllocationPolicy, CapacityFill, SingleMatch};
use crate::model::AtomicModel;
use crate::routers::{Dispatch, EntryDispatch, Move};
use crate::split::Split;
use crate::transit::Transit;

pub fn create_batch_departure() -> Box<dyn DecisionPolicy> {
    Box::new(BatchDeparture)
}

pub fn create_retirement() -> Box<dyn DecisionPolicy> {
    Box::new(Retirement)
}

pub fn create_capacity_fill() -> Box<dyn AllocationPolicy> {
    Box::new(CapacityFill)
}

pub fn create_single_match() -> Box<dyn AllocationPolicy> {
    Box::new(SingleMatch)
}

pub fn build_arrival_generator(
    params: ArrivalGeneratorParams,
) -> Result<ArrivalGenerator, ConfigError> {
    ArrivalGenerator::new(params)
}

pub fn build_transport_generator(
    params: TransportGeneratorParams,
) -> Result<TransportGenerator, ConfigError> {
    TransportGenerator::new(params)
}

pub fn build_decision(params: DecisionParams) -> Decision {
    let policy = match params.policy {
        DecisionPolicyKind::BatchDeparture => create_batch_departure(),
        DecisionPolicyKind::Retirement => create_retirement(),
    };
    Decision::new(params.name, policy)
}

pub fn build_transit(params: TransitParams) -> Transit {
    let policy = match params.policy {
        TransitPolicyKind::CapacityFill => create_capacity_fill(),
        TransitPolicyKind::SingleMatch => create_single_match(),
    };
    Transit::new(params.name, policy)
}

/// Component kinds a host can instantiate by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    ArrivalGenerator,
    TransportGenerator,
    Dispatch,
    EntryDispatch,
    Move,
    Split,
    Decision,
    Transit,
}

impl FromStr for ComponentKind {
    type Err = ConfigError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "ArrivalGenerator" => Ok(Self::ArrivalGenerator),
            "TransportGenerator" => Ok(Self::TransportGenerator),
            "Dispatch" => Ok(Self::Dispatch),
            "EntryDispatch" => Ok(Self::EntryDispatch),
            "Move" => Ok(Self::Move),
            "Split" => Ok(Self::Split),
            "Decision" => Ok(Self::Decision),
            "Transit" => Ok(Self::Transit),
            other => Err(ConfigError::UnknownComponent(other.to_string())),
        }
    }
}

/// Builds a component from its kind name and a PascalCase parameter map.
pub fn build_model(kind: &str, params: &Value) -> Result<Box<dyn AtomicModel>, ConfigError> {
    let kind = kind.parse::<ComponentKind>()?;
    let model: Box<dyn AtomicModel> = match kind {
        ComponentKind::ArrivalGenerator => Box::new(build_arrival_generator(
            ArrivalGeneratorParams::from_value(params)?,
        )?),
        ComponentKind::TransportGenerator => Box::new(build_transport_generator(
            TransportGeneratorParams::from_value(params)?,
        )?),
        ComponentKind::Dispatch => Box::new(Dispatch::new(StageParams::from_value(params)?.name)),
        ComponentKind::EntryDispatch => {
            Box::new(EntryDispatch::new(StageParams::from_value(params)?.name))
        }
        ComponentKind::Move => Box::new(Move::new(StageParams::from_value(params)?.name)),
        ComponentKind::Split => Box::new(Split::new(StageParams::from_value(params)?.name)),
        ComponentKind::Decision => Box::new(build_decision(DecisionParams::from_value(params)?)),
        ComponentKind::Transit => Box::new(build_transit(TransitParams::from_value(params)?)),
    };
    info!(kind = ?kind, model = model.name(), "component built");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn policy_kind_selects_implementation() {
        let decision = build_decision(DecisionParams::default().with_policy(DecisionPolicyKind::Retirement));
        assert_eq!(decision.policy().request_port(), "search");

        let transit = build_transit(TransitParams::default());
        assert_eq!(transit.policy().name(), "capacity-fill");
        assert_eq!(transit.policy().request_port(), "load");
    }

    #[test]
    fn build_model_reads_kind_and_parameters() {
        let model = build_model(
            "Transit",
            &json!({ "Name": "food-transit", "Policy": "SingleMatch" }),
        )
        .expect("transit");
        assert_eq!(model.name(), "food-transit");

        let split = build_model("Split", &json!({ "Name": "unbundle" })).expect("split");
        assert_eq!(split.name(), "unbundle");
    }

    #[test]
    fn unknown_kind_is_a_config_error() {
        let err = build_model("Warehouse", &json!({})).err().expect("error");
        assert!(matches!(err, ConfigError::UnknownComponent(kind) if kind == "Warehouse"));
    }

    #[test]
    fn invalid_generator_parameters_fail_to_build() {
        let err = build_model(
            "ArrivalGenerator",
            &json!({ "Names": [], "MinDuration": 1.0, "MaxDuration": 2.0 }),
        )
        .err()
        .expect("error");
        assert!(matches!(
            err,
            ConfigError::Empty(_) | ConfigError::Malformed { .. } | ConfigError::InvalidRange { .. }
        ));
    }
}
