//! Request and response bodies of the HTTP API

use crate::core::order::{NewOrderItem, Order};
use crate::core::service::CreateOrder;
use crate::core::validation::validators::storable_amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Body of `POST /api/orders`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub user_id: i32,

    #[validate(length(min = 1, message = "must contain at least one item"), nested)]
    pub items: Vec<OrderItemRequest>,

    /// Omitted or `0` lets the service compute the total
    #[serde(default)]
    #[validate(custom(function = "storable_amount"))]
    pub total_amount: Option<Decimal>,
}

/// One line of a [`CreateOrderRequest`]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemRequest {
    pub product_id: i32,

    #[serde(default)]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub product_name: Option<String>,

    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: i32,

    #[validate(custom(function = "storable_amount"))]
    pub price: Decimal,
}

fn default_quantity() -> i32 {
    1
}

impl From<OrderItemRequest> for NewOrderItem {
    fn from(item: OrderItemRequest) -> Self {
        NewOrderItem {
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

impl From<CreateOrderRequest> for CreateOrder {
    fn from(request: CreateOrderRequest) -> Self {
        CreateOrder {
            user_id: request.user_id,
            items: request.items.into_iter().map(NewOrderItem::from).collect(),
            total_amount: request.total_amount,
        }
    }
}

/// Body of `PATCH /api/orders/{id}/status`
///
/// The value is checked against the status enumeration by the handler so an
/// unknown status gets its own error code.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Query of `GET /api/orders`
///
/// Kept as text so a missing and a malformed `user_id` can be told apart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: Uuid,
    pub order: Order,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ListOrdersResponse {
    pub orders: Vec<Order>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub order: Order,
    pub message: &'static str,
}
