//! Route table and cross-cutting HTTP layers

use axum::{
    Router,
    extract::{Request, State},
    http::{Method, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, patch},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{create_order, get_order, list_orders, update_order_status};
use super::health::{health, metrics};
use super::state::AppState;

/// Build the complete application router
///
/// - GET /health - liveness probe
/// - GET /metrics - Prometheus counters
/// - POST /api/orders - create an order
/// - GET /api/orders?user_id= - list a user's orders
/// - GET /api/orders/{id} - fetch one order
/// - PATCH /api/orders/{id}/status - change status
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", patch(update_order_status));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer())
                .layer(middleware::from_fn_with_state(state.clone(), count_requests)),
        )
        .with_state(state)
}

/// Any origin; preflight results cached for a day
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(86400))
}

async fn count_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.metrics.record_request();
    next.run(request).await
}
