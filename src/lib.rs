//! Orders API - order intake over HTTP
//!
//! # Modules
//!
//! - [`orders`] - Order entity, validation, service and repositories
//! - [`gateway`] - axum router, handlers, OpenAPI docs
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod orders;

// Convenient re-exports at crate root
pub use orders::{
    InMemoryOrderRepository, Order, OrderError, OrderRepository, OrderService,
    PgOrderRepository, StorageError, SubmitOrderRequest, ValidationError,
};
