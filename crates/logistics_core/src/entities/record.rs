//! Wire records exchanged inside event attributes.
//!
//! Field names are fixed for interop with the other side of the host:
//! Container `Id, Capacity, Source, Destination, ContentType,
//! ExigibilityDate, Path` and Transport `Id, Type, Capacity, Destination,
//! ContentType, DepartureDate`. Enumerations travel as integer codes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerRecord {
    pub id: u32,
    pub capacity: f64,
    pub source: String,
    pub destination: String,
    pub content_type: i64,
    pub exigibility_date: f64,
    #[serde(default)]
    pub path: Vec<String>,
}

impl ContainerRecord {
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        ContainerRecord::deserialize(value).map_err(|source| DecodeError::Malformed {
            record: "container",
            source,
        })
    }

    pub fn into_value(self) -> Value {
        serde_json::json!(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransportRecord {
    pub id: u32,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub transport_type: Option<i64>,
    pub capacity: f64,
    pub destination: String,
    pub content_type: i64,
    pub departure_date: f64,
}

impl TransportRecord {
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        TransportRecord::deserialize(value).map_err(|source| DecodeError::Malformed {
            record: "transport",
            source,
        })
    }

    pub fn into_value(self) -> Value {
        serde_json::json!(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn container_record_requires_exigibility_date() {
        let value = json!({
            "Id": 1,
            "Capacity": 1.0,
            "Source": "A",
            "Destination": "B",
            "ContentType": 0,
        });
        let err = ContainerRecord::from_value(&value).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { record: "container", .. }));
    }

    #[test]
    fn container_record_path_defaults_to_empty() {
        let value = json!({
            "Id": 1,
            "Capacity": 1.0,
            "Source": "A",
            "Destination": "B",
            "ContentType": 1,
            "ExigibilityDate": 4.0,
        });
        let record = ContainerRecord::from_value(&value).expect("decodes");
        assert!(record.path.is_empty());
    }

    #[test]
    fn untyped_transport_omits_type_field() {
        let record = TransportRecord {
            id: 2,
            transport_type: None,
            capacity: 3.0,
            destination: "B".to_string(),
            content_type: 0,
            departure_date: 9.0,
        };
        let value = record.into_value();
        assert!(value.get("Type").is_none());
        assert_eq!(value["Capacity"], json!(3.0));
    }

    #[test]
    fn encoded_records_use_wire_field_names() {
        let container = ContainerRecord {
            id: 1,
            capacity: 1.0,
            source: "A".to_string(),
            destination: "B".to_string(),
            content_type: 1,
            exigibility_date: 4.0,
            path: vec!["A".to_string()],
        };
        assert_eq!(
            container.into_value(),
            json!({
                "Id": 1,
                "Capacity": 1.0,
                "Source": "A",
                "Destination": "B",
                "ContentType": 1,
                "ExigibilityDate": 4.0,
                "Path": ["A"],
            })
        );

        let transport = TransportRecord {
            id: 2,
            transport_type: Some(2),
            capacity: 3.0,
            destination: "B".to_string(),
            content_type: 0,
            departure_date: 9.0,
        };
        assert_eq!(
            transport.into_value(),
            json!({
                "Id": 2,
                "Type": 2,
                "Capacity": 3.0,
                "Destination": "B",
                "ContentType": 0,
                "DepartureDate": 9.0,
            })
        );
    }

    #[test]
    fn integer_capacity_is_accepted() {
        let value = json!({
            "Id": 2,
            "Type": 1,
            "Capacity": 3,
            "Destination": "B",
            "ContentType": 0,
            "DepartureDate": 9.0,
        });
        let record = TransportRecord::from_value(&value).expect("decodes");
        assert_eq!(record.capacity, 3.0);
        assert_eq!(record.transport_type, Some(1));
    }
}
