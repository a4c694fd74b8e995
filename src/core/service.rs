//! Order business operations
//!
//! [`OrderService`] sits between the HTTP layer and the [`OrderStore`]. It
//! generates identifiers, computes totals, and announces every successful
//! write on the injected [`EventPublisher`] without waiting for it.

use crate::core::error::{FieldValidationError, OrderResult, ValidationError};
use crate::core::events::{EventEnvelope, EventPublisher, OrderEventType};
use crate::core::order::{
    AMOUNT_LIMIT, NewOrder, NewOrderItem, Order, OrderStatus, compute_total, is_storable_amount,
};
use crate::core::store::OrderStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Input of [`OrderService::create_order`]
///
/// `items` is expected to be non-empty; the HTTP layer enforces it.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub user_id: i32,
    pub items: Vec<NewOrderItem>,
    /// Caller-supplied total; `None` or zero means "compute from items"
    pub total_amount: Option<Decimal>,
}

/// Stateless order service, cheap to clone
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    publisher: Arc<dyn EventPublisher>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }

    /// Create an order with its items in one atomic write
    ///
    /// Returns the order as re-read from the store, items included. A total
    /// too large for the amount column is rejected before anything is written.
    pub async fn create_order(&self, request: CreateOrder) -> OrderResult<Order> {
        let total_amount = match request.total_amount {
            Some(total) if !total.is_zero() => total,
            _ => compute_total(&request.items),
        };

        if !is_storable_amount(total_amount) {
            return Err(ValidationError::FieldErrors(vec![FieldValidationError {
                field: "total_amount".to_string(),
                message: format!("must be less than {}", AMOUNT_LIMIT),
            }])
            .into());
        }

        let order = NewOrder {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            status: OrderStatus::Pending,
            total_amount,
        };

        self.store
            .insert_order_with_items(&order, &request.items)
            .await?;

        tracing::info!(
            order_id = %order.id,
            user_id = order.user_id,
            items = request.items.len(),
            total_amount = %order.total_amount,
            "order created"
        );
        self.notify(order.id, OrderEventType::Created);

        self.get_order(order.id).await
    }

    /// Get an order with its items
    pub async fn get_order(&self, id: Uuid) -> OrderResult<Order> {
        let order = self.store.fetch_order(id).await?;
        let items = self.store.fetch_items(id).await?;
        Ok(order.with_items(items))
    }

    /// All orders of a user, newest first, each with its items
    pub async fn get_user_orders(&self, user_id: i32) -> OrderResult<Vec<Order>> {
        let orders = self.store.fetch_orders_by_user(user_id).await?;
        if orders.is_empty() {
            return Ok(orders);
        }

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let mut items = self.store.fetch_items_for_orders(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let order_items = items.remove(&order.id).unwrap_or_default();
                order.with_items(order_items)
            })
            .collect())
    }

    /// Set a new status and return the refreshed order
    pub async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<Order> {
        self.store.update_status(id, status).await?;

        tracing::info!(order_id = %id, status = %status, "order status updated");
        self.notify(id, OrderEventType::StatusUpdated);

        self.get_order(id).await
    }

    /// Hand the event to the publisher on a detached task
    fn notify(&self, order_id: Uuid, event_type: OrderEventType) {
        let publisher = Arc::clone(&self.publisher);
        let envelope = EventEnvelope::new(order_id, event_type);

        tokio::spawn(async move {
            if let Err(e) = publisher.publish(envelope).await {
                tracing::warn!(
                    order_id = %order_id,
                    event_type = event_type.as_str(),
                    error = %e,
                    "failed to publish order event"
                );
            }
        });
    }
}
