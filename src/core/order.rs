//! Order and order item data model

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::error::ValidationError;

/// Lifecycle status of an order
///
/// Any value is reachable from any other; the service does not enforce a
/// forward-only progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every accepted status, in lifecycle order
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    /// Exact, lowercase match only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidStatus {
                value: s.to_string(),
            })
    }
}

/// A user's purchase record
///
/// Rows read through [`OrderStore::fetch_order`](crate::core::store::OrderStore::fetch_order)
/// carry an empty `items` list; the service hydrates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: i32,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn with_items(mut self, items: Vec<OrderItem>) -> Self {
        self.items = items;
        self
    }
}

/// One product line within an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Store-assigned, sequential
    pub id: i32,
    pub order_id: Uuid,
    pub product_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub quantity: i32,
    /// Per-unit price
    pub price: Decimal,
}

/// Order row to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub id: Uuid,
    pub user_id: i32,
    pub status: OrderStatus,
    pub total_amount: Decimal,
}

/// Item line to insert alongside its order
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_id: i32,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
}

impl NewOrderItem {
    /// Line amount at the price the store will keep
    pub fn line_total(&self) -> Decimal {
        round_to_cents(self.price) * Decimal::from(self.quantity)
    }
}

/// Exclusive upper bound of a `NUMERIC(10,2)` amount
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Round to two decimals, halves away from zero (PostgreSQL `NUMERIC` rounding)
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether the amount fits a `NUMERIC(10,2)` column once rounded
pub fn is_storable_amount(amount: Decimal) -> bool {
    round_to_cents(amount).abs() < AMOUNT_LIMIT
}

/// Σ(price × quantity) over the given lines, prices taken in cents
pub fn compute_total(items: &[NewOrderItem]) -> Decimal {
    items.iter().map(NewOrderItem::line_total).sum()
}
