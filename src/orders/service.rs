//! Order Service - Business rules for order intake and retrieval
//!
//! Owns the business-day window computation and the "order must be present"
//! rule; persistence is delegated to an [`OrderRepository`].

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

use super::error::OrderError;
use super::models::Order;
use super::repository::OrderRepository;
use super::validation::{self, ValidationError};

/// Largest `days` value accepted for a business-day window (about a century)
pub const MAX_WINDOW_DAYS: i32 = 36_500;

/// Inclusive date range queried for business-day lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A business day is any day that is not Saturday or Sunday
pub fn is_business_day(day: Weekday) -> bool {
    !matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Window of `days` calendar days back from `now`, with the end pushed
/// forward one day at a time until `days` business days have been counted.
///
/// For `days <= 0` the end stays at `now`, which leaves a zero-length or
/// inverted window.
pub fn business_day_window(now: DateTime<Utc>, days: i32) -> DateWindow {
    let start = now - Duration::days(days.into());

    let mut end = now;
    let mut remaining = days;
    while remaining > 0 {
        end += Duration::days(1);
        if is_business_day(end.weekday()) {
            remaining -= 1;
        }
    }

    DateWindow { start, end }
}

/// Order Service - handles all order-related business logic
pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
    clock: Box<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl OrderService {
    /// Create a new OrderService reading the system clock
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self::with_clock(repository, Utc::now)
    }

    /// Create a new OrderService with a custom time source
    pub fn with_clock(
        repository: Arc<dyn OrderRepository>,
        clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        Self {
            repository,
            clock: Box::new(clock),
        }
    }

    pub fn repository(&self) -> &Arc<dyn OrderRepository> {
        &self.repository
    }

    /// Persist a new order
    ///
    /// Only checks that an order was supplied; field-level rules are the
    /// caller's job. Storage failures are already logged by the repository.
    pub async fn add_order(&self, order: Option<Order>) -> Result<Order, OrderError> {
        let order = validation::require_present(order).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected order in OrderService.add_order");
        })?;

        self.repository.add_order(&order).await?;
        tracing::info!(order_id = %order.id(), "Order accepted");
        Ok(order)
    }

    /// Non-deleted orders in a window spanning at least `days` business days
    pub async fn get_recent_orders_excluding_non_business_days(
        &self,
        days: i32,
    ) -> Result<Vec<Order>, OrderError> {
        if days.unsigned_abs() > MAX_WINDOW_DAYS.unsigned_abs() {
            return Err(ValidationError::WindowTooLarge {
                max: MAX_WINDOW_DAYS,
            }
            .into());
        }

        let window = business_day_window((self.clock)(), days);
        tracing::debug!(
            days,
            start = %window.start,
            end = %window.end,
            "Querying business-day window"
        );

        let orders = self
            .repository
            .get_orders_in_range(window.start, window.end)
            .await?;
        Ok(orders)
    }
}
