use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::availability::{AvailabilityIndex, BrandOutletLink};
use crate::discovery::{BrandRepository, OutletRepository, OutletSelector};
use crate::geo;
use crate::models::{Address, Outlet};
use crate::orders::{
    AddressRepository, CartGroup, CheckoutResponse, CheckoutSummary, CreateOrderRequest,
    MenuItemRepository, NewOrder, NewOrderItem, Order, OrderError, OrderItemsRepository,
    OrderNumberGenerator, OrderResponse, OrdersRepository, PriceCalculator,
};
use crate::policy::PricingPolicy;

/// Rough travel-time estimate applied on top of preparation time
const TRAVEL_MINUTES_PER_KM: f64 = 2.0;

/// One cart group after outlet resolution, ready for pricing
struct ResolvedGroup {
    group: CartGroup,
    outlet: Outlet,
    link: BrandOutletLink,
    distance_km: Option<f64>,
}

/// Coordinates a full multi-brand checkout
///
/// A checkout request moves through validation, per-group outlet
/// resolution, pricing, and a single persistence transaction spanning every
/// group. Any failure before persistence short-circuits without side
/// effects; a persistence failure rolls the whole batch back. Nothing here
/// reserves outlet capacity - concurrent checkouts may assign the same
/// outlet freely.
#[derive(Clone)]
pub struct FulfillmentService {
    orders_repo: OrdersRepository,
    order_items_repo: OrderItemsRepository,
    address_repo: AddressRepository,
    menu_repo: MenuItemRepository,
    outlet_repo: OutletRepository,
    brand_repo: BrandRepository,
    availability: AvailabilityIndex,
    selector: OutletSelector,
    pricing: Arc<PricingPolicy>,
}

impl FulfillmentService {
    /// Create a new FulfillmentService
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        orders_repo: OrdersRepository,
        order_items_repo: OrderItemsRepository,
        address_repo: AddressRepository,
        menu_repo: MenuItemRepository,
        outlet_repo: OutletRepository,
        brand_repo: BrandRepository,
        availability: AvailabilityIndex,
        selector: OutletSelector,
        pricing: Arc<PricingPolicy>,
    ) -> Self {
        Self {
            orders_repo,
            order_items_repo,
            address_repo,
            menu_repo,
            outlet_repo,
            brand_repo,
            availability,
            selector,
            pricing,
        }
    }

    /// Create one order per cart group, atomically
    ///
    /// # Validation
    /// - payment method and at least one cart group are required
    /// - every group carries at least one item with a positive quantity
    /// - an explicitly supplied outlet must genuinely serve the group's brand
    /// - groups without an explicit outlet need a geocoded address; the
    ///   nearest serving outlet is assigned
    ///
    /// The checkout is all-or-nothing: if any group fails resolution,
    /// pricing, or persistence, no order from the batch is committed.
    pub async fn create_checkout(
        &self,
        request: CreateOrderRequest,
    ) -> Result<CheckoutResponse, OrderError> {
        // -- Validating --------------------------------------------------
        if request.payment_method.trim().is_empty() {
            return Err(OrderError::ValidationError(
                "Payment method is required".to_string(),
            ));
        }
        if request.cart_groups.is_empty() {
            return Err(OrderError::ValidationError(
                "Checkout must contain at least one cart group".to_string(),
            ));
        }
        for group in &request.cart_groups {
            if group.items.is_empty() {
                return Err(OrderError::ValidationError(format!(
                    "Cart group for brand {} contains no items",
                    group.brand_id
                )));
            }
            for item in &group.items {
                if item.quantity <= 0 {
                    return Err(OrderError::InvalidQuantity(format!(
                        "Quantity must be positive for menu item {} in brand group {}, got {}",
                        item.menu_item_id, group.brand_id, item.quantity
                    )));
                }
            }
        }

        let address = self
            .address_repo
            .find_by_id(request.address_id)
            .await?
            .ok_or(OrderError::AddressNotFound(request.address_id))?;

        // -- Resolving ---------------------------------------------------
        // Groups are independent of each other; resolution order carries no
        // meaning.
        let mut resolved = Vec::with_capacity(request.cart_groups.len());
        for group in &request.cart_groups {
            resolved.push(self.resolve_group(group.clone(), &address).await?);
        }

        // -- Pricing -----------------------------------------------------
        let all_item_ids: Vec<i32> = resolved
            .iter()
            .flat_map(|r| r.group.items.iter().map(|i| i.menu_item_id))
            .collect();
        let menu_items = self.menu_repo.find_by_ids(&all_item_ids).await?;
        let price_by_id: HashMap<i32, Decimal> =
            menu_items.into_iter().map(|m| (m.id, m.price)).collect();

        let mut new_orders = Vec::with_capacity(resolved.len());
        for r in &resolved {
            new_orders.push(self.price_group(r, &request, &price_by_id)?);
        }

        // -- Persisting --------------------------------------------------
        let orders = self.orders_repo.create_checkout(new_orders).await?;

        tracing::info!(
            "Checkout committed: {} suborder(s) for user {}",
            orders.len(),
            request.user_id
        );

        // -- Committed: hydrate for display ------------------------------
        // This is a read-only step; a failure here degrades the response
        // but never rolls back the committed write.
        let mut responses = Vec::with_capacity(orders.len());
        for order in orders {
            responses.push(self.hydrate_order(order).await);
        }

        let summary = CheckoutSummary {
            order_count: responses.len(),
            subtotal: responses.iter().map(|o| o.subtotal).sum(),
            delivery_fee: responses.iter().map(|o| o.delivery_fee).sum(),
            tax_amount: responses.iter().map(|o| o.tax_amount).sum(),
            discount_amount: responses.iter().map(|o| o.discount_amount).sum(),
            total_amount: responses.iter().map(|o| o.total_amount).sum(),
        };

        Ok(CheckoutResponse {
            orders: responses,
            summary,
        })
    }

    /// Resolve the fulfilling outlet for one cart group
    async fn resolve_group(
        &self,
        group: CartGroup,
        address: &Address,
    ) -> Result<ResolvedGroup, OrderError> {
        let brand_id = group.brand_id;

        if let Some(outlet_id) = group.outlet_id {
            // An explicit outlet id must actually serve the brand; anything
            // else is a spoofed or stale client value.
            let link = self
                .availability
                .link_for_pair(outlet_id, brand_id)
                .await?
                .ok_or(OrderError::OutletMismatch {
                    outlet_id,
                    brand_id,
                })?;

            let outlet = self
                .outlet_repo
                .find_by_id(outlet_id)
                .await
                .map_err(OrderError::from)?
                .ok_or(OrderError::OutletMismatch {
                    outlet_id,
                    brand_id,
                })?;

            let distance_km = match (address.coordinate(), outlet.coordinate()) {
                (Some(customer), Some(site)) => Some(geo::distance_km(customer, site)),
                _ => None,
            };

            return Ok(ResolvedGroup {
                group,
                outlet,
                link,
                distance_km,
            });
        }

        let customer = address
            .coordinate()
            .ok_or(OrderError::AddressIncomplete(address.id))?;

        let candidate = self
            .selector
            .nearest_outlet_for_brand(brand_id, customer)
            .await?;

        tracing::debug!(
            "Assigned outlet {} to brand {} at {:.2} km",
            candidate.outlet.id,
            brand_id,
            candidate.distance_km
        );

        Ok(ResolvedGroup {
            group,
            outlet: candidate.outlet,
            link: candidate.link,
            distance_km: Some(candidate.distance_km),
        })
    }

    /// Compute the financials for one resolved group
    fn price_group(
        &self,
        resolved: &ResolvedGroup,
        request: &CreateOrderRequest,
        price_by_id: &HashMap<i32, Decimal>,
    ) -> Result<NewOrder, OrderError> {
        let brand_id = resolved.group.brand_id;

        let mut items = Vec::with_capacity(resolved.group.items.len());
        let mut line_totals = Vec::with_capacity(resolved.group.items.len());
        for item in &resolved.group.items {
            let unit_price =
                *price_by_id
                    .get(&item.menu_item_id)
                    .ok_or(OrderError::MenuItemNotFound {
                        menu_item_id: item.menu_item_id,
                        brand_id,
                    })?;

            let total_price = PriceCalculator::line_total(item.quantity, unit_price);
            line_totals.push(total_price);
            items.push(NewOrderItem {
                menu_item_id: item.menu_item_id,
                quantity: item.quantity,
                unit_price,
                total_price,
                special_instructions: item.special_instructions.clone(),
            });
        }

        let subtotal = PriceCalculator::subtotal(&line_totals);
        let tax_amount = PriceCalculator::tax(subtotal, &self.pricing);
        let discount_amount =
            PriceCalculator::discount(subtotal, request.coupon_code.as_deref(), &self.pricing);
        let delivery_fee = resolved
            .group
            .delivery_fee
            .unwrap_or(resolved.link.delivery_fee);
        let total_amount =
            PriceCalculator::total(subtotal, delivery_fee, tax_amount, discount_amount);

        let travel_minutes = resolved
            .distance_km
            .map(|d| (d * TRAVEL_MINUTES_PER_KM).ceil() as i32)
            .unwrap_or(0);

        Ok(NewOrder {
            order_number: OrderNumberGenerator::next(),
            user_id: request.user_id,
            brand_id,
            outlet_id: resolved.outlet.id,
            address_id: request.address_id,
            subtotal,
            delivery_fee,
            tax_amount,
            discount_amount,
            total_amount,
            payment_method: request.payment_method.clone(),
            estimated_delivery_minutes: resolved.link.preparation_time_minutes + travel_minutes,
            items,
        })
    }

    /// Load the display associations for one committed order
    ///
    /// Each lookup degrades independently on failure: the response then
    /// carries fewer hydrated fields, and a warning is logged.
    pub async fn hydrate_order(&self, order: Order) -> OrderResponse {
        let items = match self.order_items_repo.find_by_order_id(order.id).await {
            Ok(items) => items.into_iter().map(|i| i.into()).collect(),
            Err(e) => {
                tracing::warn!("Could not load items for order {}: {}", order.id, e);
                Vec::new()
            }
        };

        let brand_name = match self.brand_repo.find_by_id(order.brand_id).await {
            Ok(brand) => brand.map(|b| b.name),
            Err(e) => {
                tracing::warn!("Could not load brand for order {}: {}", order.id, e);
                None
            }
        };

        let outlet_name = match self.outlet_repo.find_by_id(order.outlet_id).await {
            Ok(outlet) => outlet.map(|o| o.name),
            Err(e) => {
                tracing::warn!("Could not load outlet for order {}: {}", order.id, e);
                None
            }
        };

        let delivery_address = match self.address_repo.find_by_id(order.address_id).await {
            Ok(address) => address.map(|a| format!("{}, {}", a.line1, a.city)),
            Err(e) => {
                tracing::warn!("Could not load address for order {}: {}", order.id, e);
                None
            }
        };

        OrderResponse {
            id: order.id,
            order_number: order.order_number,
            user_id: order.user_id,
            brand_id: order.brand_id,
            outlet_id: order.outlet_id,
            address_id: order.address_id,
            subtotal: order.subtotal,
            delivery_fee: order.delivery_fee,
            tax_amount: order.tax_amount,
            discount_amount: order.discount_amount,
            total_amount: order.total_amount,
            status: order.status,
            payment_method: order.payment_method,
            estimated_delivery_minutes: order.estimated_delivery_minutes,
            brand_name,
            outlet_name,
            delivery_address,
            items,
            created_at: order.created_at,
        }
    }

    /// Fetch one committed order with its display associations
    pub async fn get_order(&self, order_id: uuid::Uuid) -> Result<OrderResponse, OrderError> {
        let order = self
            .orders_repo
            .find_by_id(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        Ok(self.hydrate_order(order).await)
    }
}
