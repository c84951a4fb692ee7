//! Storage abstraction for vehicle records
//!
//! - [`ReadRepository`]: lookups by id, filtered listings, reachability
//! - [`FindOptions`]: equality filters, ordering and an offset/limit window
//! - [`RepositoryError`]: structured storage-boundary failures

mod error;
mod pagination;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use pagination::{FilterCondition, FindOptions, OrderDirection, Pagination};
pub use traits::{ReadRepository, RepositoryResult};
