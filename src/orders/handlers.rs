// HTTP handlers for checkout endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::orders::{CheckoutResponse, CreateOrderRequest, OrderError, OrderResponse};

/// Handler for POST /api/orders
/// Materializes a multi-brand cart into one order per brand/outlet pair
pub async fn create_order_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), OrderError> {
    request
        .validate()
        .map_err(|e| OrderError::ValidationError(e.to_string()))?;

    tracing::debug!(
        "Checkout requested: user {}, {} cart group(s)",
        request.user_id,
        request.cart_groups.len()
    );

    let response = state.fulfillment.create_checkout(request).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET /api/orders/{order_id}
/// Retrieves a committed order with its display associations
pub async fn get_order_by_id_handler(
    State(state): State<crate::AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, OrderError> {
    let order = state.fulfillment.get_order(order_id).await?;

    Ok(Json(order))
}
