//! PostgreSQL vehicle store
//!
//! Logical field names used by [`FindOptions`] map to columns through a fixed
//! whitelist; anything else is rejected before a query is built. Filter values
//! and the page window are always bound.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::DatabaseError;
use crate::ids::VehicleId;
use crate::repository::{
    FindOptions, ReadRepository, RepositoryError, RepositoryOperation, RepositoryResult,
};
use crate::vehicles::StoredVehicle;

const SELECT_VEHICLES: &str = "SELECT id, dealer_id, listing_date, images FROM vehicles";

/// Column for a logical field name, if the field is known
fn column(field: &str) -> Option<&'static str> {
    match field {
        "id" => Some("id"),
        "dealerID" => Some("dealer_id"),
        "listingDate" => Some("listing_date"),
        _ => None,
    }
}

fn known_column(field: &str) -> RepositoryResult<&'static str> {
    column(field).ok_or_else(|| {
        RepositoryError::validation_failed(
            RepositoryOperation::FindAll,
            format!("unknown field '{}'", field),
        )
    })
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Build the listing query for `options`
fn build_find_all(options: &FindOptions) -> RepositoryResult<QueryBuilder<'static, Postgres>> {
    let mut query = QueryBuilder::new(SELECT_VEHICLES);

    for (i, condition) in options.filters.iter().enumerate() {
        let column = known_column(&condition.field)?;
        query.push(if i == 0 { " WHERE " } else { " AND " });
        query.push(column).push(" = ").push_bind(condition.value.clone());
    }

    for (i, (field, direction)) in options.order.iter().enumerate() {
        let column = known_column(field)?;
        query.push(if i == 0 { " ORDER BY " } else { ", " });
        query.push(column).push(" ").push(direction.as_sql());
    }

    query
        .push(" LIMIT ")
        .push_bind(to_i64(options.pagination.limit))
        .push(" OFFSET ")
        .push_bind(to_i64(options.pagination.offset));

    Ok(query)
}

/// Vehicle store backed by a `vehicles` table
#[derive(Debug, Clone)]
pub struct PgVehicleStore {
    pool: PgPool,
}

impl PgVehicleStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl ReadRepository<VehicleId, StoredVehicle> for PgVehicleStore {
    async fn find_by_id(&self, id: &VehicleId) -> RepositoryResult<Option<StoredVehicle>> {
        let sql = format!("{} WHERE id = $1", SELECT_VEHICLES);
        sqlx::query_as::<_, StoredVehicle>(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_database(RepositoryOperation::FindById, DatabaseError::from(e))
                    .with_entity("Vehicle", id.as_str())
            })
    }

    async fn find_all(&self, options: &FindOptions) -> RepositoryResult<Vec<StoredVehicle>> {
        let mut query = build_find_all(options)?;
        query
            .build_query_as::<StoredVehicle>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_database(RepositoryOperation::FindAll, DatabaseError::from(e))
            })
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| {
                RepositoryError::from_database(RepositoryOperation::Ping, DatabaseError::from(e))
            })
    }
}
