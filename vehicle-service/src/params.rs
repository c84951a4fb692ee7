//! Request parameter resolution
//!
//! A logical field such as `vehicleID` can arrive in the route path, the JSON
//! body, a header or the query string. [`ParamSources`] holds all four (plus
//! the dealer identity attached by the authentication layer) and resolves a
//! field by walking an ordered list of [`Source`]s, returning the first
//! non-empty value.
//!
//! | Field | Order |
//! |---|---|
//! | `vehicleID` | path, body, header, query |
//! | `dealerID` | body, header, query, authenticated identity |
//! | `page`, `limit` | path, body, header, query |
//!
//! Headers are looked up by the lower-cased field name (`vehicleid`,
//! `dealerid`, `page`, `limit`).
//!
//! Pagination values follow a fixed rule table, see [`coerce_positive`].

use std::collections::HashMap;
use std::num::IntErrorKind;

use serde_json::Value;
use thiserror::Error;

use crate::ids::{DealerId, VehicleId};
use crate::repository::Pagination;

/// Logical name of the vehicle identifier field
pub const VEHICLE_ID: &str = "vehicleID";
/// Logical name of the dealer identifier field
pub const DEALER_ID: &str = "dealerID";
/// Logical name of the page number field
pub const PAGE: &str = "page";
/// Logical name of the page size field
pub const LIMIT: &str = "limit";

/// Page used when none (or one below 1) is supplied
pub const DEFAULT_PAGE: u64 = 1;
/// Page size used when none (or one below 1) is supplied
pub const DEFAULT_LIMIT: u64 = 100;

/// A place a request parameter can be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Route path parameters
    Path,
    /// Top-level scalar members of a JSON object body
    Body,
    /// Request headers, by lower-cased field name
    Header,
    /// Query string parameters
    Query,
    /// Dealer identity attached by the authentication layer
    Identity,
}

const VEHICLE_ID_SOURCES: &[Source] = &[Source::Path, Source::Body, Source::Header, Source::Query];
const DEALER_ID_SOURCES: &[Source] = &[
    Source::Body,
    Source::Header,
    Source::Query,
    Source::Identity,
];
const PAGINATION_SOURCES: &[Source] = &[Source::Path, Source::Body, Source::Header, Source::Query];

/// Raised when a supplied parameter cannot be interpreted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// A pagination value is present but is not an integer
    #[error("Parameter '{field}' must be an integer, got '{value}'.")]
    NotAnInteger {
        /// Logical field name
        field: &'static str,
        /// The raw value as received
        value: String,
    },
}

/// Raw parameters of a single request, grouped by where they came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSources {
    path: HashMap<String, String>,
    body: HashMap<String, String>,
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
    identity: Option<DealerId>,
}

impl ParamSources {
    /// Empty sources
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route path parameter
    #[must_use]
    pub fn with_path(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.insert(name.into(), value.into());
        self
    }

    /// Add a body parameter
    #[must_use]
    pub fn with_body(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.body.insert(name.into(), value.into());
        self
    }

    /// Add a header; the name is stored lower-cased
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Add a query string parameter
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Attach the authenticated dealer identity
    #[must_use]
    pub fn with_identity(mut self, dealer: Option<DealerId>) -> Self {
        self.identity = dealer;
        self
    }

    /// Replace all path parameters
    #[must_use]
    pub fn with_path_params(mut self, params: HashMap<String, String>) -> Self {
        self.path = params;
        self
    }

    /// Replace all query parameters
    #[must_use]
    pub fn with_query_params(mut self, params: HashMap<String, String>) -> Self {
        self.query = params;
        self
    }

    /// Replace the body parameters with the scalar members of a JSON object
    ///
    /// Strings are taken as-is, numbers and `true` in their JSON text form.
    /// `null`, `false`, zero, arrays, nested objects and non-object bodies
    /// contribute nothing, so the field falls through to later sources.
    #[must_use]
    pub fn with_json_body(mut self, body: &Value) -> Self {
        self.body = match body {
            Value::Object(members) => members
                .iter()
                .filter_map(|(name, value)| {
                    let text = match value {
                        Value::String(s) => s.clone(),
                        Value::Number(n) if n.as_f64() == Some(0.0) => return None,
                        Value::Number(n) => n.to_string(),
                        Value::Bool(true) => "true".to_string(),
                        Value::Null | Value::Bool(false) | Value::Array(_) | Value::Object(_) => {
                            return None
                        }
                    };
                    Some((name.clone(), text))
                })
                .collect(),
            _ => HashMap::new(),
        };
        self
    }

    fn lookup(&self, source: Source, field: &str) -> Option<&str> {
        let value = match source {
            Source::Path => self.path.get(field).map(String::as_str),
            Source::Body => self.body.get(field).map(String::as_str),
            Source::Header => self
                .headers
                .get(&field.to_ascii_lowercase())
                .map(String::as_str),
            Source::Query => self.query.get(field).map(String::as_str),
            Source::Identity if field == DEALER_ID => self.identity.as_ref().map(DealerId::as_str),
            Source::Identity => None,
        };
        value.filter(|v| !v.is_empty())
    }

    /// First non-empty value of `field` across `sources`, in order
    pub fn resolve(&self, field: &str, sources: &[Source]) -> Option<&str> {
        sources
            .iter()
            .find_map(|&source| self.lookup(source, field))
    }

    /// Resolve `vehicleID` (path, body, header, query)
    pub fn vehicle_id(&self) -> Option<VehicleId> {
        self.resolve(VEHICLE_ID, VEHICLE_ID_SOURCES)
            .map(VehicleId::from)
    }

    /// Resolve `dealerID` (body, header, query, authenticated identity)
    pub fn dealer_id(&self) -> Option<DealerId> {
        self.resolve(DEALER_ID, DEALER_ID_SOURCES).map(DealerId::from)
    }

    /// Raw `page` value (path, body, header, query)
    pub fn page(&self) -> Option<&str> {
        self.resolve(PAGE, PAGINATION_SOURCES)
    }

    /// Raw `limit` value (path, body, header, query)
    pub fn limit(&self) -> Option<&str> {
        self.resolve(LIMIT, PAGINATION_SOURCES)
    }
}

/// Names of the required fields whose resolved value is absent, in input order
pub fn missing_required<'a>(fields: &[(&'a str, bool)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect()
}

/// Coerce a raw pagination value to a positive integer
///
/// | Raw value | Result |
/// |---|---|
/// | absent | `default` |
/// | integer below 1, however large in magnitude | `default` |
/// | integer of 1 or more | that integer, capped at `i64::MAX` |
/// | other number below 1 (`0.5`, `-1.5`) | `default` |
/// | anything else | [`ParamError::NotAnInteger`] |
pub fn coerce_positive(
    field: &'static str,
    raw: Option<&str>,
    default: u64,
) -> Result<u64, ParamError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(n) => Ok(u64::try_from(n).ok().filter(|&n| n >= 1).unwrap_or(default)),
        Err(e) => match e.kind() {
            IntErrorKind::NegOverflow => Ok(default),
            IntErrorKind::PosOverflow => Ok(i64::MAX.unsigned_abs()),
            _ => match trimmed.parse::<f64>() {
                Ok(x) if x.is_finite() && x < 1.0 => Ok(default),
                _ => Err(ParamError::NotAnInteger {
                    field,
                    value: raw.to_string(),
                }),
            },
        },
    }
}

/// The page/limit pair of a list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    /// 1-indexed page number
    pub page: u64,
    /// Rows per page
    pub limit: u64,
}

impl ListWindow {
    /// Resolve and coerce `page` and `limit` from the request
    ///
    /// A `default_limit` of 0 is treated as 1.
    pub fn resolve(params: &ParamSources, default_limit: u64) -> Result<Self, ParamError> {
        Ok(Self {
            page: coerce_positive(PAGE, params.page(), DEFAULT_PAGE)?,
            limit: coerce_positive(LIMIT, params.limit(), default_limit.max(1))?,
        })
    }

    /// Rows preceding this page: `limit * (page - 1)`
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.limit.saturating_mul(self.page.saturating_sub(1))
    }

    /// Window handed to the store
    ///
    /// The offset is only applied past the first page; page 1 always reads
    /// from offset 0.
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        let offset = if self.page > 1 { self.offset() } else { 0 };
        Pagination::new(offset, self.limit)
    }
}
