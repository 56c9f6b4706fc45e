use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Order status enum representing the lifecycle of a suborder
///
/// Checkout always creates orders as `Pending`; later transitions belong to
/// the order-lifecycle collaborator, not to this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Convert status to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse status from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "out_for_delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Invalid order status: {}", s)),
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing one persisted suborder (one brand, one outlet)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: i32,
    pub brand_id: i32,
    pub outlet_id: i32,
    pub address_id: i32,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_method: String,
    pub estimated_delivery_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Domain model representing a line item snapshot within an order
///
/// `unit_price` is the price at the time of ordering and never changes when
/// the menu does.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: Uuid,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub special_instructions: Option<String>,
}

/// Request DTO for one line item in a cart group
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CartItemRequest {
    pub menu_item_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub special_instructions: Option<String>,
}

/// Request DTO for the portion of a checkout belonging to one brand
///
/// One cart group produces exactly one persisted order. `outlet_id` is an
/// optional explicit choice; when absent the nearest serving outlet is
/// assigned from the delivery address. `delivery_fee` overrides the resolved
/// link's fee when supplied.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CartGroup {
    pub brand_id: i32,
    pub outlet_id: Option<i32>,
    pub delivery_fee: Option<Decimal>,
    #[validate(length(min = 1, message = "Cart group must contain at least one item"))]
    pub items: Vec<CartItemRequest>,
}

/// Request DTO for creating a multi-brand checkout
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub user_id: i32,
    pub address_id: i32,
    #[validate(custom = "crate::validation::validate_payment_method")]
    pub payment_method: String,
    pub coupon_code: Option<String>,
    #[validate(length(min = 1, message = "Checkout must contain at least one cart group"))]
    pub cart_groups: Vec<CartGroup>,
}

/// Response DTO for an order line item
#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: i32,
    pub menu_item_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            menu_item_id: item.menu_item_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
            special_instructions: item.special_instructions,
        }
    }
}

/// Response DTO for one suborder with display associations
///
/// The name fields come from a read-only hydration step after commit; when
/// that step fails they are simply absent, the order itself is still valid.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: i32,
    pub brand_id: i32,
    pub outlet_id: i32,
    pub address_id: i32,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_method: String,
    pub estimated_delivery_minutes: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
}

/// Aggregate figures across all suborders of one checkout
#[derive(Debug, Serialize)]
pub struct CheckoutSummary {
    pub order_count: usize,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
}

/// Response DTO for POST /api/orders
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub orders: Vec<OrderResponse>,
    pub summary: CheckoutSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::from_str(status.as_str()), Ok(status));
        }
    }

    #[test]
    fn test_status_from_str_rejects_unknown() {
        assert!(OrderStatus::from_str("shipped").is_err());
    }

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_cart_group_validation_rejects_empty_items() {
        let group = CartGroup {
            brand_id: 1,
            outlet_id: None,
            delivery_fee: None,
            items: vec![],
        };
        assert!(group.validate().is_err());
    }

    #[test]
    fn test_checkout_request_validation_rejects_empty_cart() {
        // The length rule on cart_groups serializes the offending value into
        // the error params, so the whole request must validate cleanly
        let request = CreateOrderRequest {
            user_id: 1,
            address_id: 1,
            payment_method: "card".to_string(),
            coupon_code: None,
            cart_groups: vec![],
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("cart_groups"));
    }

    #[test]
    fn test_checkout_request_validation_accepts_populated_cart() {
        let request = CreateOrderRequest {
            user_id: 1,
            address_id: 1,
            payment_method: "upi".to_string(),
            coupon_code: Some("WELCOME10".to_string()),
            cart_groups: vec![CartGroup {
                brand_id: 1,
                outlet_id: None,
                delivery_fee: None,
                items: vec![CartItemRequest {
                    menu_item_id: 1,
                    quantity: 2,
                    special_instructions: None,
                }],
            }],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_cart_item_validation_rejects_zero_quantity() {
        let item = CartItemRequest {
            menu_item_id: 1,
            quantity: 0,
            special_instructions: None,
        };
        assert!(item.validate().is_err());
    }
}
