//! Shared application state

use crate::core::service::OrderService;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: OrderService,
    pub metrics: Arc<RequestMetrics>,
}

impl AppState {
    pub fn new(service: OrderService) -> Self {
        Self {
            service,
            metrics: Arc::new(RequestMetrics::default()),
        }
    }
}

/// Process-wide request counter exported on `/metrics`
#[derive(Debug, Default)]
pub struct RequestMetrics {
    requests_total: AtomicU64,
}

impl RequestMetrics {
    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    /// Prometheus text exposition format
    pub fn render(&self) -> String {
        format!(
            "# HELP order_service_requests_total Total requests\n\
             # TYPE order_service_requests_total counter\n\
             order_service_requests_total {}\n",
            self.requests_total()
        )
    }
}
