//! # Order Service
//!
//! A small order-management microservice: orders are created with their
//! line items in one transaction, read back by id or by user, and moved
//! through a fixed set of statuses. Each successful write is announced on an
//! [`EventPublisher`](crate::core::events::EventPublisher) without blocking the
//! request.
//!
//! ## Layers
//!
//! - **core**: order model, [`OrderError`](crate::core::error::OrderError),
//!   the [`OrderStore`](crate::core::store::OrderStore) contract and
//!   [`OrderService`](crate::core::service::OrderService)
//! - **storage**: in-memory and PostgreSQL stores
//! - **server**: axum routes, request validation, error mapping
//! - **config**: defaults, YAML file and environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use order_service::prelude::*;
//! use std::sync::Arc;
//!
//! let service = OrderService::new(
//!     Arc::new(InMemoryOrderStore::new()),
//!     Arc::new(EventBus::default()),
//! );
//! let app = build_router(AppState::new(service));
//! order_service::server::serve(app, "0.0.0.0:8003").await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::config::{DatabaseConfig, ServiceConfig};
    pub use crate::core::{
        CreateOrder, EventBus, EventEnvelope, EventPublisher, LogEventPublisher, NewOrder,
        NewOrderItem, Order, OrderError, OrderEventType, OrderItem, OrderResult, OrderService,
        OrderStatus, OrderStore, StorageError, ValidationError,
    };
    pub use crate::server::{AppState, build_router};
    pub use crate::storage::InMemoryOrderStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresOrderStore;
}
