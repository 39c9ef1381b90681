//! HTTP handlers
//!
//! Thin adapters: decode the request, run transport-level checks, delegate
//! to the order service or repository and map errors to [`super::types::ApiError`].

pub mod health;
pub mod orders;

pub use health::{HealthResponse, health_check};
pub use orders::{
    BusinessDaysQuery, RECENT_ORDERS_PATH, list_recent_orders,
    list_recent_orders_excluding_non_business_days, submit_order,
};

