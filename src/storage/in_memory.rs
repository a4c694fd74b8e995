//! In-memory implementation of OrderStore for testing and development

use crate::core::error::{OrderError, OrderResult, StorageError};
use crate::core::order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, round_to_cents};
use crate::core::store::OrderStore;
use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Default)]
struct State {
    orders: HashMap<Uuid, StoredOrder>,
    /// All items, ascending by id
    items: Vec<OrderItem>,
    next_item_id: i32,
    next_seq: u64,
}

struct StoredOrder {
    order: Order,
    /// Insertion sequence, breaks `created_at` ties
    seq: u64,
}

/// In-memory order store
///
/// Useful for testing and development. A single `RwLock` guards orders and
/// items together, so the order/items insert is one atomic step.
/// Amounts are kept at two decimal places and timestamps at microsecond
/// precision, like the PostgreSQL columns.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryOrderStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> OrderResult<std::sync::RwLockReadGuard<'_, State>> {
        self.state.read().map_err(|e| {
            OrderError::Persistence(StorageError::Connection {
                message: format!("Failed to acquire read lock: {}", e),
            })
        })
    }

    fn write(&self) -> OrderResult<std::sync::RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(|e| {
            OrderError::Persistence(StorageError::Connection {
                message: format!("Failed to acquire write lock: {}", e),
            })
        })
    }
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert_order_with_items(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> OrderResult<()> {
        let mut state = self.write()?;

        if state.orders.contains_key(&order.id) {
            return Err(StorageError::Integrity {
                message: format!("duplicate key value: order '{}' already exists", order.id),
            }
            .into());
        }

        let created_at = now();
        let first_item_id = state.next_item_id + 1;
        let staged: Vec<OrderItem> = items
            .iter()
            .zip(first_item_id..)
            .map(|(item, id)| OrderItem {
                id,
                order_id: order.id,
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                price: round_to_cents(item.price),
            })
            .collect();

        let seq = state.next_seq;
        state.next_seq += 1;
        state.next_item_id += staged.len() as i32;
        state.items.extend(staged);
        state.orders.insert(
            order.id,
            StoredOrder {
                order: Order {
                    id: order.id,
                    user_id: order.user_id,
                    status: order.status,
                    total_amount: round_to_cents(order.total_amount),
                    items: Vec::new(),
                    created_at,
                    updated_at: created_at,
                },
                seq,
            },
        );

        Ok(())
    }

    async fn fetch_order(&self, id: Uuid) -> OrderResult<Order> {
        let state = self.read()?;

        state
            .orders
            .get(&id)
            .map(|stored| stored.order.clone())
            .ok_or_else(|| OrderError::not_found(id))
    }

    async fn fetch_items(&self, order_id: Uuid) -> OrderResult<Vec<OrderItem>> {
        let state = self.read()?;

        Ok(state
            .items
            .iter()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn fetch_items_for_orders(
        &self,
        order_ids: &[Uuid],
    ) -> OrderResult<HashMap<Uuid, Vec<OrderItem>>> {
        let state = self.read()?;

        let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for item in state
            .items
            .iter()
            .filter(|item| order_ids.contains(&item.order_id))
        {
            grouped.entry(item.order_id).or_default().push(item.clone());
        }

        Ok(grouped)
    }

    async fn fetch_orders_by_user(&self, user_id: i32) -> OrderResult<Vec<Order>> {
        let state = self.read()?;

        let mut stored: Vec<&StoredOrder> = state
            .orders
            .values()
            .filter(|stored| stored.order.user_id == user_id)
            .collect();
        stored.sort_by(|a, b| {
            b.order
                .created_at
                .cmp(&a.order.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        Ok(stored.into_iter().map(|s| s.order.clone()).collect())
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<()> {
        let mut state = self.write()?;

        let stored = state
            .orders
            .get_mut(&id)
            .ok_or_else(|| OrderError::not_found(id))?;

        let previous = stored.order.updated_at;
        stored.order.status = status;
        stored.order.updated_at = now().max(previous + Duration::microseconds(1));

        Ok(())
    }
}
