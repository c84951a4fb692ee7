//! The `read` and `list` operations
//!
//! Both follow the same sequence: resolve parameters, check required fields,
//! query the store, decode images. Each failure maps to exactly one
//! [`ErrorCode`](crate::handlers::ErrorCode):
//!
//! ```text
//! Start -> ParamsResolved -> ValidationFailed                (400003)
//!                         -> StoreQueried -> StoreError      (500001)
//!                                         -> NotFound        (400002, read)
//!                                         -> OwnershipDenied (400001, read)
//!                                         -> Success
//! ```

use crate::handlers::{ApiError, ApiOperation};
use crate::ids::VehicleId;
use crate::params::{missing_required, ListWindow, ParamSources, DEALER_ID, VEHICLE_ID};
use crate::repository::{
    FilterCondition, FindOptions, OrderDirection, ReadRepository, RepositoryOperation,
};

use super::model::{StoredVehicle, Vehicle, VehicleList};

/// Logical name of the listing timestamp, used for ordering
pub const LISTING_DATE: &str = "listingDate";

/// Any store that can read vehicle rows
pub trait VehicleStore: ReadRepository<VehicleId, StoredVehicle> {}

impl<T> VehicleStore for T where T: ReadRepository<VehicleId, StoredVehicle> {}

/// Result of a successful `list`
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleListing {
    /// Decoded vehicles, or [`VehicleList::Empty`]
    pub data: VehicleList,
    /// Number of vehicles returned
    pub count: usize,
}

/// Fetch one vehicle, provided the requesting dealer owns it
pub async fn read<S: VehicleStore>(store: &S, params: &ParamSources) -> Result<Vehicle, ApiError> {
    let vehicle_id = params.vehicle_id();
    let dealer_id = params.dealer_id();

    let missing = missing_required(&[
        (VEHICLE_ID, vehicle_id.is_some()),
        (DEALER_ID, dealer_id.is_some()),
    ]);
    let (Some(vehicle_id), Some(dealer_id)) = (vehicle_id, dealer_id) else {
        tracing::debug!(?missing, "read rejected: missing parameters");
        return Err(ApiError::missing_parameters(&missing).during(ApiOperation::Read));
    };

    tracing::debug!(vehicle_id = %vehicle_id, dealer_id = %dealer_id, "reading vehicle");

    let stored = store.find_by_id(&vehicle_id).await.map_err(|e| {
        tracing::error!(vehicle_id = %vehicle_id, error = %e, "vehicle lookup failed");
        ApiError::storage(&e).during(ApiOperation::Read)
    })?;

    let Some(stored) = stored else {
        return Err(ApiError::vehicle_not_found(&vehicle_id).during(ApiOperation::Read));
    };

    if !stored.is_owned_by(&dealer_id) {
        tracing::warn!(
            vehicle_id = %vehicle_id,
            dealer_id = %dealer_id,
            "dealer does not own vehicle"
        );
        return Err(ApiError::invalid_dealer().during(ApiOperation::Read));
    }

    Vehicle::decode(stored, RepositoryOperation::FindById).map_err(|e| {
        tracing::error!(vehicle_id = %vehicle_id, error = %e, "stored vehicle failed to decode");
        ApiError::storage(&e).during(ApiOperation::Read)
    })
}

/// Fetch a page of a dealer's vehicles, newest listing first
pub async fn list<S: VehicleStore>(
    store: &S,
    params: &ParamSources,
    default_limit: u64,
) -> Result<VehicleListing, ApiError> {
    let window = ListWindow::resolve(params, default_limit).map_err(|e| {
        tracing::debug!(error = %e, "list rejected: bad pagination");
        ApiError::from(e).during(ApiOperation::List)
    })?;

    let Some(dealer_id) = params.dealer_id() else {
        tracing::debug!("list rejected: missing dealerID");
        return Err(ApiError::missing_parameters(&[DEALER_ID]).during(ApiOperation::List));
    };

    let options = FindOptions::new()
        .filter(FilterCondition::eq(DEALER_ID, dealer_id.as_str()))
        .order_by(LISTING_DATE, OrderDirection::Descending)
        .paginate(window.pagination());

    tracing::debug!(
        dealer_id = %dealer_id,
        page = window.page,
        limit = options.pagination.limit,
        offset = options.pagination.offset,
        "listing vehicles"
    );

    let rows = store.find_all(&options).await.map_err(|e| {
        tracing::error!(dealer_id = %dealer_id, error = %e, "vehicle listing failed");
        ApiError::storage(&e).during(ApiOperation::List)
    })?;

    let vehicles = rows
        .into_iter()
        .map(|row| Vehicle::decode(row, RepositoryOperation::FindAll))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            tracing::error!(dealer_id = %dealer_id, error = %e, "stored vehicle failed to decode");
            ApiError::storage(&e).during(ApiOperation::List)
        })?;

    let data = VehicleList::from_records(vehicles);
    let count = data.len();
    Ok(VehicleListing { data, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::ErrorCode;
    use crate::ids::DealerId;
    use crate::params::{DEFAULT_LIMIT, LIMIT, PAGE};
    use crate::repository::Pagination;
    use crate::testing::{vehicle_row, MemoryStore};
    use serde_json::json;

    fn read_params(vehicle: &str, dealer: &str) -> ParamSources {
        ParamSources::new()
            .with_path(VEHICLE_ID, vehicle)
            .with_body(DEALER_ID, dealer)
    }

    #[tokio::test]
    async fn read_returns_owned_vehicle_with_decoded_images() {
        let store = MemoryStore::with_rows(vec![vehicle_row("v1", "d1", 0, "[]")]);
        let vehicle = read(&store, &read_params("v1", "d1")).await.unwrap();
        assert_eq!(vehicle.id.as_str(), "v1");
        assert_eq!(vehicle.images, json!([]));
    }

    #[tokio::test]
    async fn read_rejects_other_dealer() {
        let store = MemoryStore::with_rows(vec![vehicle_row("v1", "d1", 0, "[]")]);
        let err = read(&store, &read_params("v1", "d2")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDealer);
    }

    #[tokio::test]
    async fn read_ownership_checked_before_decoding() {
        let store = MemoryStore::with_rows(vec![vehicle_row("v1", "d1", 0, "{broken")]);
        let err = read(&store, &read_params("v1", "d2")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDealer);
    }

    #[tokio::test]
    async fn read_unknown_vehicle() {
        let store = MemoryStore::default();
        let err = read(&store, &read_params("v404", "d1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::VehicleNotFound);
        assert_eq!(err.message, "The 'vehicleID': 'v404' does not exist.");
    }

    #[tokio::test]
    async fn read_missing_parameters_never_queries() {
        let store = MemoryStore::with_rows(vec![vehicle_row("v1", "d1", 0, "[]")]);

        let err = read(&store, &ParamSources::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingParameters);
        assert_eq!(
            err.message,
            "Required parameters [vehicleID,dealerID] are missing from this request."
        );

        let only_vehicle = ParamSources::new().with_path(VEHICLE_ID, "v1");
        let err = read(&store, &only_vehicle).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingParameters);
        assert!(err.message.contains("[dealerID]"));

        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn read_uses_authenticated_identity() {
        let store = MemoryStore::with_rows(vec![vehicle_row("v1", "d1", 0, "[]")]);
        let params = ParamSources::new()
            .with_path(VEHICLE_ID, "v1")
            .with_identity(Some(DealerId::new("d1")));
        assert!(read(&store, &params).await.is_ok());
    }

    #[tokio::test]
    async fn read_storage_fault() {
        let store = MemoryStore::failing("connection reset");
        let err = read(&store, &read_params("v1", "d1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageFailure);
        assert!(err.message.contains("connection reset"));
    }

    #[tokio::test]
    async fn read_undecodable_images_is_storage_fault() {
        let store = MemoryStore::with_rows(vec![vehicle_row("v1", "d1", 0, "{broken")]);
        let err = read(&store, &read_params("v1", "d1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageFailure);
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let store = MemoryStore::with_rows(vec![
            vehicle_row("old", "d1", 1, r#"["o.jpg"]"#),
            vehicle_row("new", "d1", 3, "[]"),
            vehicle_row("mid", "d1", 2, "[]"),
            vehicle_row("other", "d2", 4, "[]"),
        ]);
        let params = ParamSources::new().with_query(DEALER_ID, "d1");
        let listing = list(&store, &params, DEFAULT_LIMIT).await.unwrap();

        assert_eq!(listing.count, 3);
        let VehicleList::Records(records) = listing.data else {
            panic!("expected records");
        };
        let ids: Vec<_> = records.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert_eq!(records[2].images, json!(["o.jpg"]));
    }

    #[tokio::test]
    async fn list_empty_is_empty_object() {
        let store = MemoryStore::default();
        let params = ParamSources::new().with_query(DEALER_ID, "d1");
        let listing = list(&store, &params, DEFAULT_LIMIT).await.unwrap();
        assert_eq!(listing.count, 0);
        assert_eq!(listing.data, VehicleList::Empty);
        assert_eq!(serde_json::to_value(&listing.data).unwrap(), json!({}));
    }

    #[tokio::test]
    async fn list_missing_dealer_never_queries() {
        let store = MemoryStore::default();
        let err = list(&store, &ParamSources::new(), DEFAULT_LIMIT)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingParameters);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn list_pagination_windows() {
        let store = MemoryStore::default();

        let params = ParamSources::new()
            .with_query(DEALER_ID, "d1")
            .with_query(PAGE, "1")
            .with_query(LIMIT, "10");
        list(&store, &params, DEFAULT_LIMIT).await.unwrap();
        assert_eq!(store.last_options().unwrap().pagination, Pagination::new(0, 10));

        let params = ParamSources::new()
            .with_query(DEALER_ID, "d1")
            .with_query(PAGE, "3")
            .with_query(LIMIT, "10");
        list(&store, &params, DEFAULT_LIMIT).await.unwrap();
        assert_eq!(store.last_options().unwrap().pagination, Pagination::new(20, 10));

        let params = ParamSources::new()
            .with_query(DEALER_ID, "d1")
            .with_query(PAGE, "0")
            .with_query(LIMIT, "0");
        list(&store, &params, DEFAULT_LIMIT).await.unwrap();
        assert_eq!(store.last_options().unwrap().pagination, Pagination::new(0, 100));
    }

    #[tokio::test]
    async fn list_zero_default_limit_still_reads_rows() {
        let store = MemoryStore::with_rows(vec![vehicle_row("v1", "d1", 0, "[]")]);
        let params = ParamSources::new().with_query(DEALER_ID, "d1");
        let listing = list(&store, &params, 0).await.unwrap();
        assert_eq!(store.last_options().unwrap().pagination, Pagination::new(0, 1));
        assert_eq!(listing.count, 1);
    }

    #[tokio::test]
    async fn list_query_shape() {
        let store = MemoryStore::default();
        let params = ParamSources::new().with_body(DEALER_ID, "d7");
        list(&store, &params, DEFAULT_LIMIT).await.unwrap();

        let options = store.last_options().unwrap();
        assert_eq!(options.filters, vec![FilterCondition::eq(DEALER_ID, "d7")]);
        assert_eq!(
            options.order,
            vec![(LISTING_DATE.to_string(), OrderDirection::Descending)]
        );
    }

    #[tokio::test]
    async fn list_applies_window_to_rows() {
        let rows = (1..=5)
            .map(|n| vehicle_row(&format!("v{n}"), "d1", n, "[]"))
            .collect();
        let store = MemoryStore::with_rows(rows);
        let params = ParamSources::new()
            .with_query(DEALER_ID, "d1")
            .with_query(PAGE, "2")
            .with_query(LIMIT, "2");
        let listing = list(&store, &params, DEFAULT_LIMIT).await.unwrap();

        let VehicleList::Records(records) = listing.data else {
            panic!("expected records");
        };
        let ids: Vec<_> = records.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["v3", "v2"]);
        assert_eq!(listing.count, 2);
    }

    #[tokio::test]
    async fn list_malformed_limit() {
        let store = MemoryStore::default();
        let params = ParamSources::new()
            .with_query(DEALER_ID, "d1")
            .with_query(LIMIT, "lots");
        let err = list(&store, &params, DEFAULT_LIMIT).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingParameters);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn list_storage_fault() {
        let store = MemoryStore::failing("timeout");
        let params = ParamSources::new().with_query(DEALER_ID, "d1");
        let err = list(&store, &params, DEFAULT_LIMIT).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageFailure);
        assert!(err.message.contains("timeout"));
    }
}
