//! Core domain: order model, errors, persistence contract, events and service

pub mod error;
pub mod events;
pub mod order;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{OrderError, OrderResult, StorageError, ValidationError};
pub use events::{EventBus, EventEnvelope, EventPublisher, LogEventPublisher, OrderEventType};
pub use order::{
    AMOUNT_LIMIT, NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, compute_total,
    is_storable_amount, round_to_cents,
};
pub use service::{CreateOrder, OrderService};
pub use store::OrderStore;
