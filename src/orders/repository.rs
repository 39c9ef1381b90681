//! Repository layer for order persistence
//!
//! [`OrderRepository`] isolates the service from storage mechanics. Every
//! implementation logs a failure once, tagged with the operation name, and
//! hands the error back unchanged.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::error::StorageError;
use super::models::Order;

/// Length of the "recent orders" window
pub const RECENT_WINDOW_HOURS: i64 = 24;

/// Lower bound (exclusive) of the recent-orders window ending at `now`
pub fn recent_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(RECENT_WINDOW_HOURS)
}

/// Log a storage failure for `operation` and return it unchanged
pub(crate) fn log_failure(operation: &'static str, err: StorageError) -> StorageError {
    tracing::error!(
        operation = %format!("OrderRepository.{}", operation),
        error = %err,
        "Order storage operation failed"
    );
    err
}

// ============================================================================
// Order Repository
// ============================================================================

/// Repository trait for Order data access
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a fully populated order
    async fn add_order(&self, order: &Order) -> Result<(), StorageError>;

    /// Non-deleted orders with `entry_date > now - 24h`, newest first
    async fn get_recent_orders(&self) -> Result<Vec<Order>, StorageError>;

    /// Non-deleted orders with `start_date <= entry_date <= end_date`, newest first
    ///
    /// The bounds are passed to the store as given; an inverted range simply
    /// matches nothing.
    async fn get_orders_in_range(
        &self,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<Order>, StorageError>;

    /// Cheap liveness probe used by the health endpoint
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

// ============================================================================
// PostgreSQL Implementation
// ============================================================================

/// PostgreSQL-backed order repository
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_order(row: &PgRow) -> Result<Order, sqlx::Error> {
        Ok(Order::from_storage(
            row.try_get("id")?,
            row.try_get("name")?,
            row.try_get("description")?,
            row.try_get("entry_date")?,
            row.try_get("invoiced")?,
            row.try_get("deleted")?,
        ))
    }

    fn rows_to_orders(rows: &[PgRow]) -> Result<Vec<Order>, StorageError> {
        rows.iter()
            .map(|row| Self::row_to_order(row).map_err(StorageError::from))
            .collect()
    }
}

/// Unique-key violations are reported as rejected writes
fn classify_write_error(err: sqlx::Error) -> StorageError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StorageError::Rejected(db_err.message().to_string())
        }
        _ => StorageError::Database(err),
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn add_order(&self, order: &Order) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO orders_tb (id, name, description, entry_date, invoiced, deleted)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.id())
        .bind(&order.name)
        .bind(&order.description)
        .bind(order.entry_date)
        .bind(order.invoiced)
        .bind(order.deleted)
        .execute(&self.pool)
        .await
        .map_err(|e| log_failure("add_order", classify_write_error(e)))?;

        tracing::debug!(order_id = %order.id(), "Order inserted");
        Ok(())
    }

    async fn get_recent_orders(&self) -> Result<Vec<Order>, StorageError> {
        let cutoff = recent_cutoff(Utc::now());
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, entry_date, invoiced, deleted
            FROM orders_tb
            WHERE entry_date > $1 AND NOT deleted
            ORDER BY entry_date DESC
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| log_failure("get_recent_orders", e.into()))?;

        Self::rows_to_orders(&rows).map_err(|e| log_failure("get_recent_orders", e))
    }

    async fn get_orders_in_range(
        &self,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<Order>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, entry_date, invoiced, deleted
            FROM orders_tb
            WHERE entry_date >= $1 AND entry_date <= $2 AND NOT deleted
            ORDER BY entry_date DESC
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| log_failure("get_orders_in_range", e.into()))?;

        Self::rows_to_orders(&rows).map_err(|e| log_failure("get_orders_in_range", e))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
