use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::distributions::{UniformCount, UniformRange};
use crate::entities::TransportType;
use crate::error::ConfigError;

/// Which published Decision policy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecisionPolicyKind {
    /// `load` requests, `loaded` confirmations, one `depart` per ready transport.
    #[default]
    BatchDeparture,
    /// `search` requests, `found` confirmations, one `take` per matched transport.
    Retirement,
}

/// Which published Transit allocation policy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransitPolicyKind {
    /// Fill every waiting transport up to capacity, earliest deadline first.
    #[default]
    CapacityFill,
    /// One container per `search` request.
    SingleMatch,
}

fn parse<T: for<'de> Deserialize<'de>>(
    component: &'static str,
    value: &Value,
) -> Result<T, ConfigError> {
    T::deserialize(value).map_err(|source| ConfigError::Malformed { component, source })
}

/// Parameters of a container arrival generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArrivalGeneratorParams {
    pub name: String,
    pub min_capacity: f64,
    pub max_capacity: f64,
    /// Bounds of the interval between two batches.
    pub min_duration: f64,
    pub max_duration: f64,
    pub min_size: u32,
    pub max_size: u32,
    /// Bounds of the delay between generation and exigibility date.
    pub min_travel_duration: f64,
    pub max_travel_duration: f64,
    /// Node names used as sources and destinations.
    pub names: Vec<String>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub first_id: u32,
}

impl Default for ArrivalGeneratorParams {
    fn default() -> Self {
        Self {
            name: "arrival".to_string(),
            min_capacity: 1.0,
            max_capacity: 1.0,
            min_duration: 1.0,
            max_duration: 5.0,
            min_size: 1,
            max_size: 10,
            min_travel_duration: 10.0,
            max_travel_duration: 50.0,
            names: Vec::new(),
            seed: None,
            first_id: 0,
        }
    }
}

impl ArrivalGeneratorParams {
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let params: Self = parse("ArrivalGenerator", value)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capacity_range()?;
        self.interval_range()?;
        self.size_range()?;
        self.travel_range()?;
        if self.names.is_empty() {
            return Err(ConfigError::Empty("Names"));
        }
        Ok(())
    }

    pub fn capacity_range(&self) -> Result<UniformRange, ConfigError> {
        UniformRange::new("Capacity", self.min_capacity, self.max_capacity)
    }

    pub fn interval_range(&self) -> Result<UniformRange, ConfigError> {
        UniformRange::non_negative("Duration", self.min_duration, self.max_duration)
    }

    pub fn size_range(&self) -> Result<UniformCount, ConfigError> {
        UniformCount::new("Size", self.min_size, self.max_size)
    }

    pub fn travel_range(&self) -> Result<UniformRange, ConfigError> {
        UniformRange::non_negative(
            "TravelDuration",
            self.min_travel_duration,
            self.max_travel_duration,
        )
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_first_id(mut self, first_id: u32) -> Self {
        self.first_id = first_id;
        self
    }

    /// Batch size bounds (containers per firing).
    pub fn with_size(mut self, min: u32, max: u32) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    /// Interval bounds between two firings.
    pub fn with_duration(mut self, min: f64, max: f64) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }

    pub fn with_travel_duration(mut self, min: f64, max: f64) -> Self {
        self.min_travel_duration = min;
        self.max_travel_duration = max;
        self
    }
}

/// Parameters of a transport generator.
///
/// Container fields are only read when `container_present` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransportGeneratorParams {
    pub name: String,
    pub container_present: bool,
    #[serde(default)]
    pub transport_type: Option<TransportType>,
    pub min_capacity: u32,
    pub max_capacity: u32,
    pub min_duration: f64,
    pub max_duration: f64,
    /// Bounds of the delay between generation and departure date.
    pub min_stay_duration: f64,
    pub max_stay_duration: f64,
    pub destinations: Vec<String>,
    #[serde(default)]
    pub min_size: u32,
    #[serde(default)]
    pub min_travel_duration: f64,
    #[serde(default)]
    pub max_travel_duration: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub first_transport_id: u32,
    #[serde(default)]
    pub first_container_id: u32,
}

impl Default for TransportGeneratorParams {
    fn default() -> Self {
        Self {
            name: "transport".to_string(),
            container_present: false,
            transport_type: None,
            min_capacity: 1,
            max_capacity: 10,
            min_duration: 5.0,
            max_duration: 20.0,
            min_stay_duration: 5.0,
            max_stay_duration: 30.0,
            destinations: Vec::new(),
            min_size: 0,
            min_travel_duration: 0.0,
            max_travel_duration: 0.0,
            seed: None,
            first_transport_id: 0,
            first_container_id: 0,
        }
    }
}

impl TransportGeneratorParams {
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let params: Self = parse("TransportGenerator", value)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capacity_range()?;
        self.interval_range()?;
        self.stay_range()?;
        if self.container_present {
            self.travel_range()?;
        }
        if self.destinations.is_empty() {
            return Err(ConfigError::Empty("Destinations"));
        }
        Ok(())
    }

    pub fn capacity_range(&self) -> Result<UniformCount, ConfigError> {
        UniformCount::new("Capacity", self.min_capacity, self.max_capacity)
    }

    pub fn interval_range(&self) -> Result<UniformRange, ConfigError> {
        UniformRange::non_negative("Duration", self.min_duration, self.max_duration)
    }

    pub fn stay_range(&self) -> Result<UniformRange, ConfigError> {
        UniformRange::non_negative(
            "StayDuration",
            self.min_stay_duration,
            self.max_stay_duration,
        )
    }

    pub fn travel_range(&self) -> Result<UniformRange, ConfigError> {
        UniformRange::non_negative(
            "TravelDuration",
            self.min_travel_duration,
            self.max_travel_duration,
        )
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_transport_type(mut self, transport_type: TransportType) -> Self {
        self.transport_type = Some(transport_type);
        self
    }

    pub fn with_destinations<S: Into<String>>(
        mut self,
        destinations: impl IntoIterator<Item = S>,
    ) -> Self {
        self.destinations = destinations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_capacity(mut self, min: u32, max: u32) -> Self {
        self.min_capacity = min;
        self.max_capacity = max;
        self
    }

    pub fn with_duration(mut self, min: f64, max: f64) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }

    pub fn with_stay_duration(mut self, min: f64, max: f64) -> Self {
        self.min_stay_duration = min;
        self.max_stay_duration = max;
        self
    }

    /// Pair every transport with a container batch of at least `min_size`.
    pub fn with_containers(mut self, min_size: u32, min_travel: f64, max_travel: f64) -> Self {
        self.container_present = true;
        self.min_size = min_size;
        self.min_travel_duration = min_travel;
        self.max_travel_duration = max_travel;
        self
    }

    pub fn with_first_ids(mut self, transport: u32, container: u32) -> Self {
        self.first_transport_id = transport;
        self.first_container_id = container;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DecisionParams {
    #[serde(default = "default_decision_name")]
    pub name: String,
    #[serde(default)]
    pub policy: DecisionPolicyKind,
}

fn default_decision_name() -> String {
    "decision".to_string()
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            name: default_decision_name(),
            policy: DecisionPolicyKind::default(),
        }
    }
}

impl DecisionParams {
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        parse("Decision", value)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_policy(mut self, policy: DecisionPolicyKind) -> Self {
        self.policy = policy;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransitParams {
    #[serde(default = "default_transit_name")]
    pub name: String,
    #[serde(default)]
    pub policy: TransitPolicyKind,
}

fn default_transit_name() -> String {
    "transit".to_string()
}

impl Default for TransitParams {
    fn default() -> Self {
        Self {
            name: default_transit_name(),
            policy: TransitPolicyKind::default(),
        }
    }
}

impl TransitParams {
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        parse("Transit", value)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_policy(mut self, policy: TransitPolicyKind) -> Self {
        self.policy = policy;
        self
    }
}

/// Parameters of a stage that only needs a name (routers, split).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StageParams {
    #[serde(default)]
    pub name: String,
}

impl StageParams {
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        parse("Stage", value)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn arrival_params_use_pascal_case_names() {
        let value = json!({
            "Name": "north",
            "MinCapacity": 1,
            "MaxCapacity": 2,
            "MinDuration": 1.0,
            "MaxDuration": 3.0,
            "MinSize": 2,
            "MaxSize": 4,
            "MinTravelDuration": 10,
            "MaxTravelDuration": 20,
            "Names": ["A", "B"],
            "Seed": 9,
        });
        let params = ArrivalGeneratorParams::from_value(&value).expect("valid params");
        assert_eq!(params.name, "north");
        assert_eq!(params.max_size, 4);
        assert_eq!(params.seed, Some(9));
        assert_eq!(params.first_id, 0);
    }

    #[test]
    fn missing_parameter_is_fatal() {
        let value = json!({ "Name": "north", "MinCapacity": 1 });
        assert!(matches!(
            ArrivalGeneratorParams::from_value(&value),
            Err(ConfigError::Malformed { component: "ArrivalGenerator", .. })
        ));
    }

    #[test]
    fn inverted_size_range_is_fatal() {
        let params = ArrivalGeneratorParams::default()
            .with_names(["A"])
            .with_size(5, 2);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidRange { name: "Size", .. })
        ));
    }

    #[test]
    fn negative_arrival_durations_are_fatal() {
        let params = ArrivalGeneratorParams::default()
            .with_names(["A"])
            .with_duration(-5.0, -1.0);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidRange { name: "Duration", .. })
        ));

        let params = ArrivalGeneratorParams::default()
            .with_names(["A"])
            .with_travel_duration(-2.0, 4.0);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidRange { name: "TravelDuration", .. })
        ));
    }

    #[test]
    fn negative_transport_durations_are_fatal() {
        let params = TransportGeneratorParams::default()
            .with_destinations(["Paris"])
            .with_duration(-3.0, -2.0);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidRange { name: "Duration", .. })
        ));

        let params = TransportGeneratorParams::default()
            .with_destinations(["Paris"])
            .with_stay_duration(-1.0, 5.0);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidRange { name: "StayDuration", .. })
        ));

        let params = TransportGeneratorParams::default()
            .with_destinations(["Paris"])
            .with_containers(1, -4.0, 2.0);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidRange { name: "TravelDuration", .. })
        ));
    }

    #[test]
    fn empty_destinations_are_fatal() {
        let params = TransportGeneratorParams::default();
        assert!(matches!(params.validate(), Err(ConfigError::Empty("Destinations"))));
    }

    #[test]
    fn transport_type_decodes_from_integer_code() {
        let value = json!({
            "Name": "port",
            "ContainerPresent": false,
            "TransportType": 2,
            "MinCapacity": 1,
            "MaxCapacity": 3,
            "MinDuration": 1.0,
            "MaxDuration": 2.0,
            "MinStayDuration": 4.0,
            "MaxStayDuration": 8.0,
            "Destinations": ["Paris"],
        });
        let params = TransportGeneratorParams::from_value(&value).expect("valid params");
        assert_eq!(params.transport_type, Some(TransportType::Train));
    }

    #[test]
    fn policies_default_to_batch_and_capacity_fill() {
        let decision = DecisionParams::from_value(&json!({})).expect("defaults");
        let transit = TransitParams::from_value(&json!({ "Policy": "SingleMatch" }))
            .expect("valid");
        assert_eq!(decision.policy, DecisionPolicyKind::BatchDeparture);
        assert_eq!(decision.name, "decision");
        assert_eq!(transit.policy, TransitPolicyKind::SingleMatch);
    }
}
