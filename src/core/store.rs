//! Persistence contract for orders and their items

use crate::core::error::OrderResult;
use crate::core::order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Store for orders and order items
///
/// Implementations must keep the order/item pair consistent: an item never
/// exists without its order, and a failed multi-row write leaves nothing
/// behind.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert an order and all of its items as one atomic unit
    ///
    /// Fails with `Persistence` on a constraint violation (duplicate id) or
    /// connectivity loss, in which case no row of the unit is visible.
    async fn insert_order_with_items(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> OrderResult<()>;

    /// Get an order row by ID, without items
    ///
    /// Fails with `NotFound` if absent.
    async fn fetch_order(&self, id: Uuid) -> OrderResult<Order>;

    /// Items of one order in storage order (possibly empty)
    async fn fetch_items(&self, order_id: Uuid) -> OrderResult<Vec<OrderItem>>;

    /// Items of several orders, grouped by order ID
    ///
    /// Orders without items have no entry in the map.
    async fn fetch_items_for_orders(
        &self,
        order_ids: &[Uuid],
    ) -> OrderResult<HashMap<Uuid, Vec<OrderItem>>>;

    /// Orders of a user, newest `created_at` first, without items
    async fn fetch_orders_by_user(&self, user_id: i32) -> OrderResult<Vec<Order>>;

    /// Set the status and refresh `updated_at`
    ///
    /// Succeeds whenever the row exists, even if the status is unchanged.
    /// Fails with `NotFound` when no row matched.
    async fn update_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<()>;
}
