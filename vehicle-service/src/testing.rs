//! In-memory vehicle store for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};

use crate::ids::VehicleId;
use crate::params::DEALER_ID;
use crate::repository::{
    FindOptions, OrderDirection, ReadRepository, RepositoryError, RepositoryOperation,
    RepositoryResult,
};
use crate::vehicles::{StoredVehicle, LISTING_DATE};

/// A row listed `day` days after 2024-01-01
pub(crate) fn vehicle_row(id: &str, dealer: &str, day: i64, images: &str) -> StoredVehicle {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    StoredVehicle {
        id: id.to_string(),
        dealer_id: dealer.to_string(),
        listing_date: base + Duration::days(day),
        images: images.to_string(),
    }
}

#[derive(Default)]
struct Inner {
    rows: Vec<StoredVehicle>,
    failure: Option<String>,
    calls: AtomicUsize,
    last_options: Mutex<Option<FindOptions>>,
}

/// Vec-backed store that counts calls and can be told to fail
#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub(crate) fn with_rows(rows: Vec<StoredVehicle>) -> Self {
        Self {
            inner: Arc::new(Inner {
                rows,
                ..Inner::default()
            }),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                failure: Some(message.to_string()),
                ..Inner::default()
            }),
        }
    }

    /// Number of find_by_id / find_all calls so far
    pub(crate) fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_options(&self) -> Option<FindOptions> {
        self.inner.last_options.lock().unwrap().clone()
    }

    fn check(&self, operation: RepositoryOperation) -> RepositoryResult<()> {
        match &self.inner.failure {
            Some(message) => Err(RepositoryError::connection_failed(operation, message.clone())),
            None => Ok(()),
        }
    }
}

impl ReadRepository<VehicleId, StoredVehicle> for MemoryStore {
    async fn find_by_id(&self, id: &VehicleId) -> RepositoryResult<Option<StoredVehicle>> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        self.check(RepositoryOperation::FindById)?;
        Ok(self
            .inner
            .rows
            .iter()
            .find(|row| row.id == id.as_str())
            .cloned())
    }

    async fn find_all(&self, options: &FindOptions) -> RepositoryResult<Vec<StoredVehicle>> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        *self.inner.last_options.lock().unwrap() = Some(options.clone());
        self.check(RepositoryOperation::FindAll)?;

        let mut rows: Vec<StoredVehicle> = self
            .inner
            .rows
            .iter()
            .filter(|row| {
                options.filters.iter().all(|filter| match filter.field.as_str() {
                    DEALER_ID => filter.matches(&row.dealer_id),
                    "id" => filter.matches(&row.id),
                    _ => false,
                })
            })
            .cloned()
            .collect();

        for (field, direction) in options.order.iter().rev() {
            if field == LISTING_DATE {
                rows.sort_by_key(|row| row.listing_date);
                if *direction == OrderDirection::Descending {
                    rows.reverse();
                }
            }
        }

        Ok(rows
            .into_iter()
            .skip(options.pagination.offset as usize)
            .take(options.pagination.limit as usize)
            .collect())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.check(RepositoryOperation::Ping)
    }
}
