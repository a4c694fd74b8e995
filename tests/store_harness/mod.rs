//! Shared test harness for order store testing
//!
//! Provides builders for `NewOrder` / `NewOrderItem` values and the
//! `order_store_tests!` contract suite.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//!
//! order_store_tests!(InMemoryOrderStore::new());
//! ```

#![allow(dead_code)]

#[macro_use]
mod order_store_tests;

use order_service::core::order::{NewOrder, NewOrderItem, OrderItem, OrderStatus};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A pending order row for `user_id` with the given total
pub fn new_order(user_id: i32, total_amount: Decimal) -> NewOrder {
    NewOrder {
        id: Uuid::new_v4(),
        user_id,
        status: OrderStatus::Pending,
        total_amount,
    }
}

pub fn new_item(product_id: i32, name: Option<&str>, quantity: i32, price: Decimal) -> NewOrderItem {
    NewOrderItem {
        product_id,
        product_name: name.map(str::to_string),
        quantity,
        price,
    }
}

/// Assert a stored item carries the submitted line's values
pub fn assert_item_matches(stored: &OrderItem, submitted: &NewOrderItem, order_id: Uuid) {
    assert_eq!(stored.order_id, order_id);
    assert_eq!(stored.product_id, submitted.product_id);
    assert_eq!(stored.product_name, submitted.product_name);
    assert_eq!(stored.quantity, submitted.quantity);
    assert_eq!(stored.price, submitted.price);
}
