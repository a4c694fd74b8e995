//! HTTP handlers for order operations
//!
//! Handlers only decode input and shape output; every failure is an
//! [`OrderError`] rendered by its `IntoResponse` implementation.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use super::dto::{
    CreateOrderRequest, CreateOrderResponse, ListOrdersQuery, ListOrdersResponse,
    StatusUpdateRequest, UpdateStatusResponse,
};
use super::state::AppState;
use crate::core::error::{OrderError, ValidationError};
use crate::core::order::{Order, OrderStatus};
use crate::core::validation::ValidatedJson;

/// An id that is not a UUID cannot name an existing order.
fn parse_order_id(raw: &str) -> Result<Uuid, OrderError> {
    Uuid::parse_str(raw).map_err(|_| OrderError::not_found(raw))
}

/// `POST /api/orders`
pub async fn create_order(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, OrderError> {
    let order = state.service.create_order(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order_id: order.id,
            order,
            message: "Order created successfully",
        }),
    ))
}

/// `GET /api/orders?user_id=<int>`
pub async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<ListOrdersQuery>, QueryRejection>,
) -> Result<Json<ListOrdersResponse>, OrderError> {
    let Query(query) = query.map_err(|e| {
        OrderError::Validation(ValidationError::InvalidArgument {
            argument: "query".to_string(),
            value: e.body_text(),
        })
    })?;

    let raw = query
        .user_id
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ValidationError::MissingArgument {
            argument: "user_id".to_string(),
        })?;
    let user_id: i32 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidArgument {
            argument: "user_id".to_string(),
            value: raw.clone(),
        })?;

    let orders = state.service.get_user_orders(user_id).await?;

    Ok(Json(ListOrdersResponse {
        total: orders.len(),
        orders,
    }))
}

/// `GET /api/orders/{id}`
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, OrderError> {
    let id = parse_order_id(&id)?;
    let order = state.service.get_order(id).await?;
    Ok(Json(order))
}

/// `PATCH /api/orders/{id}/status`
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<StatusUpdateRequest>,
) -> Result<Json<UpdateStatusResponse>, OrderError> {
    let status: OrderStatus = request.status.parse()?;
    let id = parse_order_id(&id)?;

    let order = state.service.update_order_status(id, status).await?;

    Ok(Json(UpdateStatusResponse {
        order,
        message: "Order status updated",
    }))
}
