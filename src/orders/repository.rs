use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Address, MenuItem};
use crate::orders::error::OrderError;
use crate::orders::models::{Order, OrderItem, OrderStatus};

/// Repository for address lookups
#[derive(Clone)]
pub struct AddressRepository {
    pool: PgPool,
}

impl AddressRepository {
    /// Create a new AddressRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an address by id
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Address>, OrderError> {
        let address = sqlx::query_as::<_, Address>(
            "SELECT id, user_id, line1, city, latitude, longitude FROM addresses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }
}

/// Repository for menu item lookups
#[derive(Clone)]
pub struct MenuItemRepository {
    pool: PgPool,
}

impl MenuItemRepository {
    /// Create a new MenuItemRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find multiple active menu items by ids
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<MenuItem>, OrderError> {
        let items = sqlx::query_as::<_, MenuItem>(
            "SELECT id, brand_id, name, price, is_active FROM menu_items \
             WHERE id = ANY($1) AND is_active",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

/// Insert shape for one line item of a new suborder
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub menu_item_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub special_instructions: Option<String>,
}

/// Insert shape for one suborder of a checkout
#[derive(Debug, Clone)]
pub struct NewOrder {
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
    pub payment_method: String,
    pub estimated_delivery_minutes: i32,
    pub items: Vec<NewOrderItem>,
}

const ORDER_COLUMNS: &str = "id, order_number, user_id, brand_id, outlet_id, address_id, \
     subtotal, delivery_fee, tax_amount, discount_amount, total_amount, status, \
     payment_method, estimated_delivery_minutes, created_at, updated_at";

/// Repository for order persistence
#[derive(Clone)]
pub struct OrdersRepository {
    pool: PgPool,
}

impl OrdersRepository {
    /// Create a new OrdersRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist every suborder of one checkout in a single transaction
    ///
    /// All orders and their items are inserted inside one transaction; if
    /// any insert fails the whole batch rolls back (the transaction is
    /// rolled back on drop) and a generic persistence failure surfaces.
    /// Readers never observe a partially committed checkout.
    pub async fn create_checkout(&self, new_orders: Vec<NewOrder>) -> Result<Vec<Order>, OrderError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to open checkout transaction: {}", e);
            OrderError::PersistenceFailure
        })?;

        let mut persisted = Vec::with_capacity(new_orders.len());

        for new_order in new_orders {
            let order = sqlx::query_as::<_, Order>(&format!(
                r#"
                INSERT INTO orders (order_number, user_id, brand_id, outlet_id, address_id,
                                    subtotal, delivery_fee, tax_amount, discount_amount,
                                    total_amount, status, payment_method,
                                    estimated_delivery_minutes)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                RETURNING {ORDER_COLUMNS}
                "#
            ))
            .bind(&new_order.order_number)
            .bind(new_order.user_id)
            .bind(new_order.brand_id)
            .bind(new_order.outlet_id)
            .bind(new_order.address_id)
            .bind(new_order.subtotal)
            .bind(new_order.delivery_fee)
            .bind(new_order.tax_amount)
            .bind(new_order.discount_amount)
            .bind(new_order.total_amount)
            .bind(OrderStatus::Pending)
            .bind(&new_order.payment_method)
            .bind(new_order.estimated_delivery_minutes)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to insert order {} for brand {}: {}",
                    new_order.order_number,
                    new_order.brand_id,
                    e
                );
                OrderError::PersistenceFailure
            })?;

            for item in &new_order.items {
                sqlx::query(
                    r#"
                    INSERT INTO order_items (order_id, menu_item_id, quantity, unit_price,
                                             total_price, special_instructions)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(order.id)
                .bind(item.menu_item_id)
                .bind(item.quantity)
                .bind(item.unit_price)
                .bind(item.total_price)
                .bind(&item.special_instructions)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to insert item {} for order {}: {}",
                        item.menu_item_id,
                        new_order.order_number,
                        e
                    );
                    OrderError::PersistenceFailure
                })?;
            }

            persisted.push(order);
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Checkout transaction commit failed: {}", e);
            OrderError::PersistenceFailure
        })?;

        Ok(persisted)
    }

    /// Find an order by id
    pub async fn find_by_id(&self, order_id: Uuid) -> Result<Option<Order>, OrderError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }
}

/// Repository for order items operations
#[derive(Clone)]
pub struct OrderItemsRepository {
    pool: PgPool,
}

impl OrderItemsRepository {
    /// Create a new OrderItemsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find all items for a given order
    pub async fn find_by_order_id(&self, order_id: Uuid) -> Result<Vec<OrderItem>, OrderError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, menu_item_id, quantity, unit_price, total_price,
                   special_instructions
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
