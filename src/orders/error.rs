use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::geo::InvalidCoordinate;

/// Error types for checkout and order operations
///
/// Resolution and pricing failures carry the offending brand group so a
/// multi-brand checkout failure tells the caller which part was rejected.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Order not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Address {0} not found")]
    AddressNotFound(i32),

    #[error("Address {0} has no usable coordinate")]
    AddressIncomplete(i32),

    #[error("Invalid coordinate: latitude {0}, longitude {1}")]
    InvalidCoordinate(f64, f64),

    #[error("No outlet currently serves brand {brand_id}")]
    BrandNotServed { brand_id: i32 },

    #[error("Outlet {outlet_id} does not serve brand {brand_id}")]
    OutletMismatch { outlet_id: i32, brand_id: i32 },

    #[error("Menu item {menu_item_id} not found for brand group {brand_id}")]
    MenuItemNotFound { menu_item_id: i32, brand_id: i32 },

    #[error("Could not finalize order")]
    PersistenceFailure,
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::DatabaseError(err.to_string())
    }
}

impl From<InvalidCoordinate> for OrderError {
    fn from(err: InvalidCoordinate) -> Self {
        OrderError::InvalidCoordinate(err.latitude, err.longitude)
    }
}

/// Discovery-layer errors surfaced during outlet resolution
impl From<ApiError> for OrderError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::BrandNotServed { brand_id } => OrderError::BrandNotServed { brand_id },
            ApiError::InvalidCoordinate {
                latitude,
                longitude,
            } => OrderError::InvalidCoordinate(latitude, longitude),
            ApiError::DatabaseError(e) => OrderError::DatabaseError(e.to_string()),
            ApiError::ValidationError(e) => OrderError::ValidationError(e.to_string()),
            ApiError::NotFound { resource, id } => {
                OrderError::ValidationError(format!("{} {} not found", resource, id))
            }
            ApiError::InternalError(msg) => OrderError::DatabaseError(msg),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            OrderError::DatabaseError(msg) => {
                tracing::error!("Order database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            OrderError::PersistenceFailure => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            OrderError::NotFound => (StatusCode::NOT_FOUND, "Order not found".to_string()),
            OrderError::BrandNotServed { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            OrderError::AddressNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            OrderError::ValidationError(_)
            | OrderError::InvalidQuantity(_)
            | OrderError::AddressIncomplete(_)
            | OrderError::InvalidCoordinate(_, _)
            | OrderError::OutletMismatch { .. }
            | OrderError::MenuItemNotFound { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_brand_group() {
        let err = OrderError::MenuItemNotFound {
            menu_item_id: 42,
            brand_id: 7,
        };
        assert!(err.to_string().contains("42"));
        assert!(err.to_string().contains("7"));

        let err = OrderError::OutletMismatch {
            outlet_id: 3,
            brand_id: 9,
        };
        assert!(err.to_string().contains("3"));
        assert!(err.to_string().contains("9"));
    }

    #[test]
    fn test_persistence_failure_is_generic() {
        assert_eq!(
            OrderError::PersistenceFailure.to_string(),
            "Could not finalize order"
        );
    }

    #[test]
    fn test_discovery_error_mapping() {
        let mapped: OrderError = ApiError::BrandNotServed { brand_id: 4 }.into();
        match mapped {
            OrderError::BrandNotServed { brand_id } => assert_eq!(brand_id, 4),
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
