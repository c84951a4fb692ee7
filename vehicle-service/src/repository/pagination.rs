//! Filtering, ordering and pagination options for repository queries
//!
//! # Example
//!
//! ```rust
//! use vehicle_service::repository::{FilterCondition, FindOptions, OrderDirection, Pagination};
//!
//! let options = FindOptions::new()
//!     .filter(FilterCondition::eq("dealerID", "d1"))
//!     .order_by("listingDate", OrderDirection::Descending)
//!     .paginate(Pagination::new(20, 10));
//!
//! assert_eq!(options.filters.len(), 1);
//! assert_eq!(options.pagination.offset, 20);
//! ```

use std::fmt;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl OrderDirection {
    /// SQL keyword for this direction
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Pagination parameters for limiting query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    /// Create new pagination parameters
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Create pagination for the first page with the given limit
    #[must_use]
    pub const fn first_page(limit: u64) -> Self {
        Self { offset: 0, limit }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::first_page(100)
    }
}

/// An equality condition on a logical field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    /// The logical field name to filter on
    pub field: String,
    /// The value the field must equal
    pub value: String,
}

impl FilterCondition {
    /// Create an equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether `candidate` satisfies this condition
    pub fn matches(&self, candidate: &str) -> bool {
        self.value == candidate
    }
}

/// Everything a `find_all` query needs: filters, ordering and a window
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FindOptions {
    /// Conditions that must all hold
    pub filters: Vec<FilterCondition>,
    /// Ordering, applied in sequence
    pub order: Vec<(String, OrderDirection)>,
    /// Result window
    pub pagination: Pagination,
}

impl FindOptions {
    /// Options with no filters, no ordering and the default window
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter condition
    #[must_use]
    pub fn filter(mut self, condition: FilterCondition) -> Self {
        self.filters.push(condition);
        self
    }

    /// Append an ordering clause
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.order.push((field.into(), direction));
        self
    }

    /// Set the result window
    #[must_use]
    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }
}
