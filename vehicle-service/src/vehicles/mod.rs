//! Vehicle records and the dealer-scoped operations over them

mod model;
mod service;

pub use model::{StoredVehicle, Vehicle, VehicleList};
pub use service::{list, read, VehicleListing, VehicleStore, LISTING_DATE};
