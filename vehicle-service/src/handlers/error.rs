//! API error types for the vehicle operations
//!
//! Every failed `read` or `list` produces exactly one [`ApiError`]. Its
//! [`ErrorCode`] is the machine-readable signal; the message is diagnostic.
//!
//! | Code | Meaning | HTTP |
//! |---|---|---|
//! | 400001 | dealer does not own the vehicle | 400 |
//! | 400002 | vehicle does not exist | 400 |
//! | 400003 | required parameter missing or malformed | 400 |
//! | 500001 | storage operation failed | 500 |
//!
//! # Example
//!
//! ```rust
//! use vehicle_service::handlers::{ApiError, ErrorCode};
//!
//! let error = ApiError::missing_parameters(&["vehicleID", "dealerID"]);
//! assert_eq!(error.code, ErrorCode::MissingParameters);
//! assert_eq!(
//!     error.message,
//!     "Required parameters [vehicleID,dealerID] are missing from this request."
//! );
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::ids::VehicleId;
use crate::params::ParamError;
use crate::repository::RepositoryError;

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Reading a single vehicle
    Read,
    /// Listing a dealer's vehicles
    List,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::List => write!(f, "list"),
        }
    }
}

/// Numeric error codes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The supplied dealer does not own the vehicle
    InvalidDealer,
    /// No vehicle has the supplied identifier
    VehicleNotFound,
    /// A required parameter is absent (or a parameter could not be read)
    MissingParameters,
    /// The underlying storage operation failed
    StorageFailure,
}

impl ErrorCode {
    /// The numeric code
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        match self {
            Self::InvalidDealer => 400_001,
            Self::VehicleNotFound => 400_002,
            Self::MissingParameters => 400_003,
            Self::StorageFailure => 500_001,
        }
    }

    /// HTTP status derived from the code's leading three digits
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidDealer | Self::VehicleNotFound | Self::MissingParameters => {
                StatusCode::BAD_REQUEST
            }
            Self::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// A coded failure of a vehicle operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// The operation that failed, when known
    pub operation: Option<ApiOperation>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            operation: None,
        }
    }

    /// Required parameters are absent (400003)
    pub fn missing_parameters(names: &[&str]) -> Self {
        Self::new(
            ErrorCode::MissingParameters,
            format!(
                "Required parameters [{}] are missing from this request.",
                names.join(",")
            ),
        )
    }

    /// No vehicle with this identifier (400002)
    pub fn vehicle_not_found(vehicle_id: &VehicleId) -> Self {
        Self::new(
            ErrorCode::VehicleNotFound,
            format!("The 'vehicleID': '{}' does not exist.", vehicle_id),
        )
    }

    /// The dealer does not own the vehicle (400001)
    pub fn invalid_dealer() -> Self {
        Self::new(
            ErrorCode::InvalidDealer,
            "The 'dealerID' passed is invalid for this vehicle.",
        )
    }

    /// The storage operation failed (500001)
    pub fn storage(err: &RepositoryError) -> Self {
        Self::new(ErrorCode::StorageFailure, err.to_string())
    }

    /// Record which operation failed
    #[must_use]
    pub fn during(mut self, operation: ApiOperation) -> Self {
        self.operation = Some(operation);
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation {
            Some(operation) => write!(f, "{} failed ({}): {}", operation, self.code, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self::storage(&err)
    }
}

impl From<ParamError> for ApiError {
    fn from(err: ParamError) -> Self {
        Self::new(ErrorCode::MissingParameters, err.to_string())
    }
}

/// JSON body of an error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Numeric error code
    pub code: u32,
    /// HTTP status code
    pub status: u16,
}

impl From<&ApiError> for ApiErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.message.clone(),
            code: err.code.as_u32(),
            status: err.code.status_code().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        (status, Json(ApiErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryOperation;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::InvalidDealer.as_u32(), 400001);
        assert_eq!(ErrorCode::VehicleNotFound.as_u32(), 400002);
        assert_eq!(ErrorCode::MissingParameters.as_u32(), 400003);
        assert_eq!(ErrorCode::StorageFailure.as_u32(), 500001);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorCode::InvalidDealer.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::StorageFailure.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::missing_parameters(&["dealerID"]).message,
            "Required parameters [dealerID] are missing from this request."
        );
        assert_eq!(
            ApiError::vehicle_not_found(&VehicleId::new("v9")).message,
            "The 'vehicleID': 'v9' does not exist."
        );
        assert_eq!(
            ApiError::invalid_dealer().message,
            "The 'dealerID' passed is invalid for this vehicle."
        );
    }

    #[test]
    fn test_repository_error_becomes_storage_failure() {
        let repo_err = RepositoryError::database_error(RepositoryOperation::FindAll, "boom");
        let err = ApiError::from(repo_err.clone());
        assert_eq!(err.code, ErrorCode::StorageFailure);
        assert_eq!(err.message, repo_err.to_string());
    }

    #[test]
    fn test_param_error_becomes_missing_parameters() {
        let err = ApiError::from(ParamError::NotAnInteger {
            field: "page",
            value: "x".to_string(),
        });
        assert_eq!(err.code, ErrorCode::MissingParameters);
        assert!(err.message.contains("'page'"));
    }

    #[test]
    fn test_display_with_operation() {
        let err = ApiError::invalid_dealer().during(ApiOperation::Read);
        assert!(err.to_string().starts_with("read failed (400001)"));
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::vehicle_not_found(&VehicleId::new("v1")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
