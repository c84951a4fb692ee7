//! Per-request context and stage composition
//!
//! A [`RequestContext`] owns one request's parameters and, once a stage has
//! run, that stage's [`StageResult`]. [`RequestContext::run`] only invokes a
//! stage while no result is held, so the first stage to produce a payload or
//! an error decides the response and later stages are skipped.

use std::future::Future;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::handlers::ApiError;
use crate::params::ParamSources;
use crate::vehicles::{Vehicle, VehicleList, VehicleListing};

/// Payload of a successful stage
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    /// A single vehicle
    Vehicle(Box<Vehicle>),
    /// A dealer's vehicles and how many were returned
    Listing(VehicleListing),
}

impl From<Vehicle> for ResponseData {
    fn from(vehicle: Vehicle) -> Self {
        Self::Vehicle(Box::new(vehicle))
    }
}

impl From<VehicleListing> for ResponseData {
    fn from(listing: VehicleListing) -> Self {
        Self::Listing(listing)
    }
}

/// Outcome of a stage: data on success, a coded error on failure
pub type StageResult = Result<ResponseData, ApiError>;

#[derive(Serialize)]
struct ItemEnvelope<'a> {
    data: &'a Vehicle,
}

#[derive(Serialize)]
struct ListEnvelope<'a> {
    data: &'a VehicleList,
    count: usize,
}

/// State carried through one request
#[derive(Debug)]
pub struct RequestContext {
    params: Arc<ParamSources>,
    response: Option<StageResult>,
}

impl RequestContext {
    /// Start a context for the given parameters
    pub fn new(params: ParamSources) -> Self {
        Self {
            params: Arc::new(params),
            response: None,
        }
    }

    /// The request's parameters
    pub fn params(&self) -> &ParamSources {
        &self.params
    }

    /// Whether a stage has already produced a result
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    /// The result held so far
    pub fn response(&self) -> Option<&StageResult> {
        self.response.as_ref()
    }

    /// Record a result directly, e.g. from an upstream check
    ///
    /// Ignored when a result is already held.
    pub fn respond(&mut self, result: StageResult) {
        if self.response.is_none() {
            self.response = Some(result);
        }
    }

    /// Run `stage` unless a result is already held
    pub async fn run<F, Fut>(&mut self, stage: F)
    where
        F: FnOnce(Arc<ParamSources>) -> Fut,
        Fut: Future<Output = StageResult>,
    {
        if self.has_response() {
            tracing::debug!("response already set, skipping stage");
            return;
        }
        let result = stage(Arc::clone(&self.params)).await;
        self.response = Some(result);
    }

    /// Give up the held result
    pub fn into_result(self) -> Option<StageResult> {
        self.response
    }
}

impl IntoResponse for RequestContext {
    fn into_response(self) -> Response {
        match self.response {
            Some(Ok(ResponseData::Vehicle(vehicle))) => {
                (StatusCode::OK, Json(ItemEnvelope { data: &vehicle })).into_response()
            }
            Some(Ok(ResponseData::Listing(listing))) => (
                StatusCode::OK,
                Json(ListEnvelope {
                    data: &listing.data,
                    count: listing.count,
                }),
            )
                .into_response(),
            Some(Err(err)) => {
                tracing::info!(code = %err.code, message = %err.message, "request failed");
                err.into_response()
            }
            None => {
                tracing::error!("no stage produced a response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::ErrorCode;
    use crate::params::{DEALER_ID, DEFAULT_LIMIT, VEHICLE_ID};
    use crate::testing::{vehicle_row, MemoryStore};
    use crate::vehicles;

    fn params() -> ParamSources {
        ParamSources::new()
            .with_path(VEHICLE_ID, "v1")
            .with_query(DEALER_ID, "d1")
    }

    #[tokio::test]
    async fn test_run_records_result() {
        let store = MemoryStore::with_rows(vec![vehicle_row("v1", "d1", 0, "[]")]);
        let mut ctx = RequestContext::new(params());
        ctx.run(|p| async move { vehicles::read(&store, &p).await.map(ResponseData::from) })
            .await;
        assert!(matches!(ctx.response(), Some(Ok(ResponseData::Vehicle(_)))));
    }

    #[tokio::test]
    async fn test_existing_error_skips_read() {
        let store = MemoryStore::with_rows(vec![vehicle_row("v1", "d1", 0, "[]")]);
        let mut ctx = RequestContext::new(params());
        ctx.respond(Err(ApiError::invalid_dealer()));

        ctx.run(|p| {
            let store = store.clone();
            async move { vehicles::read(&store, &p).await.map(ResponseData::from) }
        })
        .await;

        assert_eq!(store.calls(), 0);
        let Some(Err(err)) = ctx.into_result() else {
            panic!("expected the original error");
        };
        assert_eq!(err.code, ErrorCode::InvalidDealer);
    }

    #[tokio::test]
    async fn test_existing_payload_skips_list() {
        let store = MemoryStore::with_rows(vec![vehicle_row("v1", "d1", 0, "[]")]);
        let mut ctx = RequestContext::new(params());
        ctx.run(|p| {
            let store = store.clone();
            async move { vehicles::read(&store, &p).await.map(ResponseData::from) }
        })
        .await;
        assert_eq!(store.calls(), 1);

        ctx.run(|p| {
            let store = store.clone();
            async move {
                vehicles::list(&store, &p, DEFAULT_LIMIT)
                    .await
                    .map(ResponseData::from)
            }
        })
        .await;

        assert_eq!(store.calls(), 1);
        assert!(matches!(ctx.response(), Some(Ok(ResponseData::Vehicle(_)))));
    }

    #[test]
    fn test_respond_keeps_first_result() {
        let mut ctx = RequestContext::new(ParamSources::new());
        ctx.respond(Err(ApiError::invalid_dealer()));
        ctx.respond(Err(ApiError::missing_parameters(&["dealerID"])));
        let Some(Err(err)) = ctx.into_result() else {
            panic!("expected an error");
        };
        assert_eq!(err.code, ErrorCode::InvalidDealer);
    }

    #[test]
    fn test_into_response_without_result_is_500() {
        let response = RequestContext::new(ParamSources::new()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
