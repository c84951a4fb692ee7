//! Repository trait definitions
//!
//! The service only ever reads, so the trait is limited to lookups by
//! identifier, filtered listings and a reachability check. Methods use RPITIT
//! (Return Position Impl Trait In Traits) so implementations are plain
//! `async fn`s without `async_trait`.
//!
//! # Example
//!
//! ```rust,ignore
//! use vehicle_service::repository::{FindOptions, ReadRepository, RepositoryResult};
//!
//! struct PgVehicleStore { pool: PgPool }
//!
//! impl ReadRepository<VehicleId, StoredVehicle> for PgVehicleStore {
//!     async fn find_by_id(&self, id: &VehicleId) -> RepositoryResult<Option<StoredVehicle>> {
//!         sqlx::query_as("SELECT * FROM vehicles WHERE id = $1")
//!             .bind(id.as_str())
//!             .fetch_optional(&self.pool)
//!             .await
//!             .map_err(|e| RepositoryError::from_database(RepositoryOperation::FindById, e.into()))
//!     }
//!     // ...
//! }
//! ```

use std::future::Future;

use super::error::RepositoryError;
use super::pagination::FindOptions;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Read-only access to a collection of entities
///
/// # Type Parameters
///
/// - `Id`: The identifier type for the entity
/// - `Entity`: The entity type as stored
pub trait ReadRepository<Id, Entity>: Send + Sync {
    /// Find an entity by its unique identifier
    ///
    /// Returns `Ok(Some(entity))` if found, `Ok(None)` if not found.
    fn find_by_id(&self, id: &Id) -> impl Future<Output = RepositoryResult<Option<Entity>>> + Send;

    /// Find all entities matching the filters, in the requested order and window
    fn find_all(
        &self,
        options: &FindOptions,
    ) -> impl Future<Output = RepositoryResult<Vec<Entity>>> + Send;

    /// Check that the backing store answers
    fn ping(&self) -> impl Future<Output = RepositoryResult<()>> + Send;
}
