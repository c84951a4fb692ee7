//! # vehicle-service
//!
//! Dealer-scoped read and list API over a vehicle inventory store.
//!
//! ## Features
//!
//! - **Tenant scoping**: a vehicle is only returned to the dealer that owns it
//! - **Parameter resolution**: fields are read from the path, JSON body,
//!   headers, query string or the authenticated dealer identity
//! - **Pagination**: page/limit with defaults, newest listing first
//! - **Stable error codes**: 400001, 400002, 400003 and 500001
//! - **Middleware stack**: JWT dealer identity, request IDs, CORS, compression,
//!   timeouts, body limits, panic recovery
//! - **Health checks**: liveness and readiness probes
//!
//! ## Example
//!
//! ```rust,no_run
//! use vehicle_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let store = PgVehicleStore::new(create_pool(config.require_database()?).await?);
//!
//!     let app = router(AppState::new(config.clone(), store), None);
//!     Server::new(config).serve(app).await
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod ids;
pub mod middleware;
pub mod observability;
pub mod params;
pub mod repository;
pub mod server;
pub mod state;
pub mod store;
pub mod vehicles;

#[cfg(test)]
pub(crate) mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AuthConfig, Config, DatabaseConfig};
    pub use crate::context::{RequestContext, ResponseData, StageResult};
    pub use crate::database::create_pool;
    pub use crate::error::{DatabaseError, DatabaseErrorKind, DatabaseOperation, Error, Result};
    pub use crate::handlers::{router, ApiError, ErrorCode, RequestParams};
    pub use crate::health::{health, readiness};
    pub use crate::ids::{DealerId, MakeTypedRequestId, RequestId, VehicleId};
    pub use crate::middleware::{AuthenticatedDealer, DealerAuth};
    pub use crate::observability::init_tracing;
    pub use crate::params::{ListWindow, ParamSources};
    pub use crate::repository::{FindOptions, ReadRepository, RepositoryError};
    pub use crate::server::Server;
    pub use crate::state::AppState;
    pub use crate::store::PgVehicleStore;
    pub use crate::vehicles::{Vehicle, VehicleList, VehicleStore};

    pub use axum::{
        extract::State,
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    pub use tokio;
}
