//! Route table

use axum::{middleware, routing::get, Router};

use super::vehicles::{list_vehicles, read_vehicle};
use crate::health::{health, readiness};
use crate::middleware::DealerAuth;
use crate::state::AppState;
use crate::vehicles::VehicleStore;

/// Build the application router
///
/// When `auth` is given, bearer tokens on the vehicle routes are validated and
/// the dealer identity attached. Health routes are never authenticated.
pub fn router<S>(state: AppState<S>, auth: Option<DealerAuth>) -> Router
where
    S: VehicleStore + Clone + 'static,
{
    let api = Router::new()
        .route(
            "/api/v1/vehicles",
            get(list_vehicles::<S>).post(list_vehicles::<S>),
        )
        .route(
            "/api/v1/vehicles/page/{page}",
            get(list_vehicles::<S>).post(list_vehicles::<S>),
        )
        .route(
            "/api/v1/vehicles/page/{page}/limit/{limit}",
            get(list_vehicles::<S>).post(list_vehicles::<S>),
        )
        .route(
            "/api/v1/vehicles/{vehicleID}",
            get(read_vehicle::<S>).post(read_vehicle::<S>),
        );

    let api = match auth {
        Some(auth) => api.route_layer(middleware::from_fn_with_state(auth, DealerAuth::middleware)),
        None => api,
    };

    Router::new()
        .route("/health", get(health::<S>))
        .route("/ready", get(readiness::<S>))
        .merge(api)
        .with_state(state)
}
