//! In-memory implementation of OrderRepository for testing and development

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, RwLock};

use super::error::StorageError;
use super::models::Order;
use super::repository::{OrderRepository, log_failure, recent_cutoff};

/// In-memory order store
///
/// Keeps orders in insertion order behind a `RwLock`. Duplicate ids are
/// rejected the same way the primary key rejects them in PostgreSQL.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<Order>>,
    fault: Mutex<Option<String>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an order as-is, bypassing fault injection (soft-deleted rows included)
    pub fn insert_raw(&self, order: Order) {
        if let Ok(mut orders) = self.orders.write() {
            orders.push(order);
        }
    }

    /// Make the next repository call fail with `Unavailable(message)`
    pub fn fail_next_with(&self, message: impl Into<String>) {
        if let Ok(mut fault) = self.fault.lock() {
            *fault = Some(message.into());
        }
    }

    pub fn len(&self) -> usize {
        self.orders.read().map(|orders| orders.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_fault(&self) -> Result<(), StorageError> {
        let mut fault = self
            .fault
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("Failed to acquire lock: {}", e)))?;
        match fault.take() {
            Some(message) => Err(StorageError::Unavailable(message)),
            None => Ok(()),
        }
    }

    fn select<F>(&self, keep: F) -> Result<Vec<Order>, StorageError>
    where
        F: Fn(&Order) -> bool,
    {
        self.take_fault()?;
        let orders = self
            .orders
            .read()
            .map_err(|e| StorageError::Unavailable(format!("Failed to acquire read lock: {}", e)))?;

        let mut selected: Vec<Order> = orders
            .iter()
            .filter(|&o| !o.deleted && keep(o))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
        Ok(selected)
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn add_order(&self, order: &Order) -> Result<(), StorageError> {
        let result = self.take_fault().and_then(|_| {
            let mut orders = self.orders.write().map_err(|e| {
                StorageError::Unavailable(format!("Failed to acquire write lock: {}", e))
            })?;
            if orders.iter().any(|o| o.id() == order.id()) {
                return Err(StorageError::Rejected(format!(
                    "duplicate order id {}",
                    order.id()
                )));
            }
            orders.push(order.clone());
            Ok(())
        });
        result.map_err(|e| log_failure("add_order", e))
    }

    async fn get_recent_orders(&self) -> Result<Vec<Order>, StorageError> {
        let cutoff = recent_cutoff(Utc::now());
        self.select(|o| o.entry_date > cutoff)
            .map_err(|e| log_failure("get_recent_orders", e))
    }

    async fn get_orders_in_range(
        &self,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Vec<Order>, StorageError> {
        self.select(|o| o.entry_date >= start_date && o.entry_date <= end_date)
            .map_err(|e| log_failure("get_orders_in_range", e))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.take_fault()
    }
}
