//! HTTP handlers for `read` and `list`

use axum::extract::State;

use super::extract::RequestParams;
use crate::context::{RequestContext, ResponseData};
use crate::state::AppState;
use crate::vehicles::{self, VehicleStore};

/// `GET|POST /api/v1/vehicles/{vehicleID}`
pub async fn read_vehicle<S: VehicleStore>(
    State(state): State<AppState<S>>,
    RequestParams(params): RequestParams,
) -> RequestContext {
    let mut ctx = RequestContext::new(params);
    ctx.run(|params| async move {
        vehicles::read(state.store(), &params)
            .await
            .map(ResponseData::from)
    })
    .await;
    ctx
}

/// `GET|POST /api/v1/vehicles[/page/{page}[/limit/{limit}]]`
pub async fn list_vehicles<S: VehicleStore>(
    State(state): State<AppState<S>>,
    RequestParams(params): RequestParams,
) -> RequestContext {
    let mut ctx = RequestContext::new(params);
    ctx.run(|params| async move {
        vehicles::list(state.store(), &params, state.default_limit())
            .await
            .map(ResponseData::from)
    })
    .await;
    ctx
}
