//! Stored and decoded vehicle representations
//!
//! The store keeps `images` as a JSON-encoded string. [`StoredVehicle`] is the
//! row as read; [`Vehicle`] is what callers receive, with `images` decoded.
//! [`Vehicle::decode`] is the only way from one to the other.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::ids::{DealerId, VehicleId};
use crate::repository::{RepositoryError, RepositoryOperation};

/// A vehicle row as held by the store
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredVehicle {
    /// Vehicle identifier
    pub id: String,
    /// Owning dealer
    pub dealer_id: String,
    /// When the vehicle was listed
    pub listing_date: DateTime<Utc>,
    /// JSON-encoded image list
    pub images: String,
}

impl StoredVehicle {
    /// Whether `dealer` owns this vehicle
    pub fn is_owned_by(&self, dealer: &DealerId) -> bool {
        self.dealer_id == dealer.as_str()
    }
}

/// A vehicle as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Vehicle identifier
    pub id: VehicleId,
    /// Owning dealer
    #[serde(rename = "dealerID")]
    pub dealer_id: DealerId,
    /// When the vehicle was listed
    #[serde(rename = "listingDate")]
    pub listing_date: DateTime<Utc>,
    /// Decoded image list
    pub images: Value,
}

impl Vehicle {
    /// Decode a stored row, parsing its `images` JSON
    pub fn decode(
        stored: StoredVehicle,
        operation: RepositoryOperation,
    ) -> Result<Self, RepositoryError> {
        let images = serde_json::from_str(&stored.images).map_err(|e| {
            RepositoryError::serialization_error(
                operation,
                format!("images is not valid JSON: {}", e),
            )
            .with_entity("Vehicle", stored.id.as_str())
        })?;

        Ok(Self {
            id: VehicleId::from(stored.id),
            dealer_id: DealerId::from(stored.dealer_id),
            listing_date: stored.listing_date,
            images,
        })
    }
}

/// Payload of a successful `list`
///
/// An empty result serializes as `{}`, a non-empty one as an array.
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleList {
    /// No rows matched
    Empty,
    /// Matching rows, in store order
    Records(Vec<Vehicle>),
}

impl VehicleList {
    /// Build from decoded rows
    pub fn from_records(records: Vec<Vehicle>) -> Self {
        if records.is_empty() {
            Self::Empty
        } else {
            Self::Records(records)
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Records(records) => records.len(),
        }
    }

    /// Whether no records matched
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for VehicleList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_map(Some(0))?.end(),
            Self::Records(records) => records.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn stored(images: &str) -> StoredVehicle {
        StoredVehicle {
            id: "v1".to_string(),
            dealer_id: "d1".to_string(),
            listing_date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            images: images.to_string(),
        }
    }

    #[test]
    fn test_decode_images() {
        let vehicle = Vehicle::decode(
            stored(r#"["a.jpg","b.jpg"]"#),
            RepositoryOperation::FindById,
        )
        .unwrap();
        assert_eq!(vehicle.images, json!(["a.jpg", "b.jpg"]));
        assert_eq!(vehicle.id.as_str(), "v1");
    }

    #[test]
    fn test_decode_empty_list() {
        let vehicle = Vehicle::decode(stored("[]"), RepositoryOperation::FindById).unwrap();
        assert_eq!(vehicle.images, json!([]));
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = Vehicle::decode(stored("not json"), RepositoryOperation::FindAll).unwrap_err();
        assert_eq!(err.operation, RepositoryOperation::FindAll);
        assert_eq!(err.entity_id.as_deref(), Some("v1"));
    }

    #[test]
    fn test_ownership() {
        let row = stored("[]");
        assert!(row.is_owned_by(&DealerId::new("d1")));
        assert!(!row.is_owned_by(&DealerId::new("d2")));
    }

    #[test]
    fn test_vehicle_serializes_with_wire_names() {
        let vehicle = Vehicle::decode(stored("[]"), RepositoryOperation::FindById).unwrap();
        let value = serde_json::to_value(&vehicle).unwrap();
        assert_eq!(value["dealerID"], json!("d1"));
        assert_eq!(value["images"], json!([]));
        assert!(value.get("listingDate").is_some());
    }

    #[test]
    fn test_empty_list_serializes_as_object() {
        let list = VehicleList::from_records(Vec::new());
        assert_eq!(serde_json::to_value(&list).unwrap(), json!({}));
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn test_records_serialize_as_array() {
        let vehicle = Vehicle::decode(stored("[]"), RepositoryOperation::FindAll).unwrap();
        let list = VehicleList::from_records(vec![vehicle]);
        assert!(serde_json::to_value(&list).unwrap().is_array());
        assert_eq!(list.len(), 1);
    }
}
