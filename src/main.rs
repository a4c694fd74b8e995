use anyhow::Result;
use order_service::config::ServiceConfig;
use order_service::core::{LogEventPublisher, OrderService};
use order_service::server::{self, AppState};
use order_service::storage::PostgresOrderStore;
use order_service::storage::postgres::{connect_with_retry, ensure_schema};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = ServiceConfig::load()?;

    let pool = connect_with_retry(&config.database).await?;
    ensure_schema(&pool).await?;

    let store = Arc::new(PostgresOrderStore::new(pool.clone()));
    let publisher = Arc::new(LogEventPublisher::new(&config.broker_url));
    tracing::info!(broker = %publisher.destination(), "event publisher ready");

    let service = OrderService::new(store, publisher);
    let app = server::build_router(AppState::new(service));

    server::serve(app, &config.bind_addr()).await?;

    pool.close().await;
    Ok(())
}
