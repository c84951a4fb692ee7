//! HTTP layer for the vehicle operations
//!
//! - [`RequestParams`] gathers every parameter source of a request
//! - [`read_vehicle`] and [`list_vehicles`] run the operations through a
//!   [`RequestContext`](crate::context::RequestContext)
//! - [`ApiError`] carries the numeric error codes
//! - [`router`] wires it all to paths
//!
//! # Example
//!
//! ```rust,ignore
//! use vehicle_service::prelude::*;
//!
//! let store = PgVehicleStore::new(pool);
//! let app = router(AppState::new(config, store), None);
//! ```

mod error;
mod extract;
mod routes;
mod vehicles;

pub use error::{ApiError, ApiErrorResponse, ApiOperation, ErrorCode};
pub use extract::RequestParams;
pub use routes::router;
pub use vehicles::{list_vehicles, read_vehicle};
