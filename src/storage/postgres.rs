//! PostgreSQL storage backend using sqlx.
//!
//! Provides [`PostgresOrderStore`], an [`OrderStore`] backed by a
//! `sqlx::PgPool`, plus the bootstrap helpers used at process start:
//! [`connect_with_retry`] and [`ensure_schema`].
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag (enabled by
//! default).
//!
//! # Schema
//!
//! - `orders`: one row per order, `NUMERIC(10,2)` total, `TIMESTAMPTZ`
//!   timestamps
//! - `order_items`: `SERIAL` id, foreign key to `orders(id)`

use crate::config::DatabaseConfig;
use crate::core::error::{OrderError, OrderResult, StorageError};
use crate::core::order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
use crate::core::store::OrderStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPoolOptions};
use std::collections::HashMap;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Statements run one by one; prepared statements cannot hold several.
const SCHEMA: &[(&str, &str)] = &[
    (
        "orders table",
        "CREATE TABLE IF NOT EXISTS orders (
            id UUID PRIMARY KEY,
            user_id INTEGER NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            total_amount NUMERIC(10,2) NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "order_items table",
        "CREATE TABLE IF NOT EXISTS order_items (
            id SERIAL PRIMARY KEY,
            order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
            product_id INTEGER NOT NULL,
            product_name VARCHAR(200),
            quantity INTEGER NOT NULL DEFAULT 1,
            price NUMERIC(10,2) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "orders user_id index",
        "CREATE INDEX IF NOT EXISTS idx_orders_user_id ON orders(user_id)",
    ),
    (
        "orders status index",
        "CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status)",
    ),
    (
        "order_items order_id index",
        "CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items(order_id)",
    ),
];

/// Apply the required tables and indexes (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for (name, statement) in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| anyhow!("Failed to create {}: {}", name, e))?;
    }

    tracing::info!("database schema ready");
    Ok(())
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Build the pool, retrying while the database is not reachable yet
///
/// Gives up after `connect_attempts` tries spaced by
/// `connect_retry_interval_secs`.
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool> {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.username)
        .password(&config.password)
        .database(&config.name);

    let attempts = config.connect_attempts.max(1);
    let mut attempt = 1;
    loop {
        let result = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .max_lifetime(config.max_lifetime())
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options.clone())
            .await;

        match result {
            Ok(pool) => {
                tracing::info!(
                    host = %config.host,
                    database = %config.name,
                    attempt,
                    "connected to database"
                );
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "database not ready, retrying"
                );
                attempt += 1;
                tokio::time::sleep(config.connect_retry_interval()).await;
            }
            Err(e) => {
                return Err(anyhow!(
                    "Failed to connect to database after {} attempts: {}",
                    attempts,
                    e
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: i32,
    status: String,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = OrderError;

    fn try_from(row: OrderRow) -> OrderResult<Self> {
        let status = row.status.parse::<OrderStatus>().map_err(|_| {
            StorageError::Integrity {
                message: format!("order '{}' has unknown status '{}'", row.id, row.status),
            }
        })?;

        Ok(Order {
            id: row.id,
            user_id: row.user_id,
            status,
            total_amount: row.total_amount,
            items: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: Uuid,
    product_id: i32,
    product_name: Option<String>,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, status, total_amount, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, quantity, price";

fn transaction_error(e: sqlx::Error) -> OrderError {
    OrderError::Persistence(StorageError::Transaction {
        message: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// PostgresOrderStore
// ---------------------------------------------------------------------------

/// Order store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// use order_service::storage::postgres::{connect_with_retry, ensure_schema};
/// use order_service::storage::PostgresOrderStore;
///
/// let pool = connect_with_retry(&config.database).await?;
/// ensure_schema(&pool).await?;
/// let store = PostgresOrderStore::new(pool);
/// ```
#[derive(Clone, Debug)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Create a new `PostgresOrderStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert the order row on an open connection or transaction
    pub async fn insert_order(conn: &mut PgConnection, order: &NewOrder) -> OrderResult<()> {
        sqlx::query(
            "INSERT INTO orders (id, user_id, status, total_amount)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(order.status.as_str())
        .bind(order.total_amount)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Insert one item row; fails with an integrity error if the order is absent
    pub async fn insert_item(
        conn: &mut PgConnection,
        order_id: Uuid,
        item: &NewOrderItem,
    ) -> OrderResult<()> {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, product_name, quantity, price)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.product_name.as_deref())
        .bind(item.quantity)
        .bind(item.price)
        .execute(conn)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert_order_with_items(
        &self,
        order: &NewOrder,
        items: &[NewOrderItem],
    ) -> OrderResult<()> {
        let mut tx = self.pool.begin().await.map_err(transaction_error)?;

        // Dropping `tx` on an early return rolls the whole unit back.
        Self::insert_order(&mut *tx, order).await?;
        for item in items {
            Self::insert_item(&mut *tx, order.id, item).await?;
        }

        tx.commit().await.map_err(transaction_error)?;
        Ok(())
    }

    async fn fetch_order(&self, id: Uuid) -> OrderResult<Order> {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| OrderError::not_found(id))?;

        row.try_into()
    }

    async fn fetch_items(&self, order_id: Uuid) -> OrderResult<Vec<OrderItem>> {
        let sql = format!(
            "SELECT {} FROM order_items WHERE order_id = $1 ORDER BY id",
            ITEM_COLUMNS
        );
        let rows = sqlx::query_as::<_, OrderItemRow>(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn fetch_items_for_orders(
        &self,
        order_ids: &[Uuid],
    ) -> OrderResult<HashMap<Uuid, Vec<OrderItem>>> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {} FROM order_items WHERE order_id = ANY($1) ORDER BY id",
            ITEM_COLUMNS
        );
        let rows = sqlx::query_as::<_, OrderItemRow>(&sql)
            .bind(order_ids)
            .fetch_all(&self.pool)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            grouped.entry(row.order_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    async fn fetch_orders_by_user(&self, user_id: i32) -> OrderResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        );
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> OrderResult<()> {
        let result = sqlx::query(
            "UPDATE orders
             SET status = $1,
                 updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')
             WHERE id = $2",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(OrderError::not_found(id));
        }
        Ok(())
    }
}
