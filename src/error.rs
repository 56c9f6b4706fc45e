// Error handling module for the discovery surface
// Provides the shared error type and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error};

use crate::geo::InvalidCoordinate;

/// Main error type for the location/discovery endpoints
///
/// Each variant maps to a specific HTTP status code and error response
/// format. The order module carries its own `OrderError`; both share the
/// same response envelope shape.
#[derive(Debug)]
pub enum ApiError {
    /// Validation errors from request validation
    /// Maps to HTTP 400 Bad Request
    ValidationError(validator::ValidationErrors),

    /// Latitude/longitude missing, non-numeric, or out of range
    /// Maps to HTTP 400 Bad Request; never retried
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Resource not found by ID
    /// Maps to HTTP 404 Not Found
    NotFound { resource: String, id: String },

    /// No active outlet currently serves the requested brand
    /// Maps to HTTP 404 Not Found; an availability outcome, not a fault
    BrandNotServed { brand_id: i32 },

    /// Database operation errors
    /// Maps to HTTP 500 Internal Server Error
    /// Sensitive details are filtered from client responses
    DatabaseError(sqlx::Error),

    /// Internal server errors
    /// Maps to HTTP 500 Internal Server Error
    InternalError(String),
}

/// Consistent error response structure
///
/// JSON format for all error responses, providing both machine-readable
/// (error_code) and human-readable (message) information.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "INVALID_COORDINATE")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (e.g. field-level validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logging level tracks severity: error! for 500s, warn! for suspicious
    /// client input, debug! for expected client errors.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);

                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error_code: "VALIDATION_ERROR".to_string(),
                        message: "Request validation failed".to_string(),
                        details: Some(
                            serde_json::to_value(errors).unwrap_or(serde_json::json!({})),
                        ),
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
            ApiError::InvalidCoordinate {
                latitude,
                longitude,
            } => {
                debug!(
                    "Invalid coordinate rejected: lat {}, lon {}",
                    latitude, longitude
                );

                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error_code: "INVALID_COORDINATE".to_string(),
                        message: format!(
                            "Invalid coordinate: latitude {}, longitude {}",
                            latitude, longitude
                        ),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);

                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error_code: "NOT_FOUND".to_string(),
                        message: format!("{} with id {} not found", resource, id),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
            ApiError::BrandNotServed { brand_id } => {
                debug!("No outlet currently serves brand {}", brand_id);

                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error_code: "BRAND_NOT_SERVED".to_string(),
                        message: format!(
                            "No outlet currently serves brand {} at this location",
                            brand_id
                        ),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
            ApiError::DatabaseError(db_error) => {
                // Full detail stays in the logs, never in the response body
                error!("Database error: {:?}", db_error);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error_code: "DATABASE_ERROR".to_string(),
                        message: "A database error occurred".to_string(),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error_code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred".to_string(),
                        details: None,
                        timestamp: Utc::now().to_rfc3339(),
                    },
                )
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCoordinate { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BrandNotServed { .. } => StatusCode::NOT_FOUND,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert sqlx errors to ApiError
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::DatabaseError(error)
    }
}

/// Convert validator errors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

/// Convert coordinate validation failures to ApiError
impl From<InvalidCoordinate> for ApiError {
    fn from(err: InvalidCoordinate) -> Self {
        ApiError::InvalidCoordinate {
            latitude: err.latitude,
            longitude: err.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BrandNotServed { brand_id: 7 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidCoordinate {
                latitude: 999.0,
                longitude: 0.0
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InternalError("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_coordinate_error_conversion() {
        let err = crate::geo::Coordinate::new(95.0, 10.0).unwrap_err();
        let api: ApiError = err.into();
        match api {
            ApiError::InvalidCoordinate { latitude, .. } => assert_eq!(latitude, 95.0),
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
