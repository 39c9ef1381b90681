//! Order management module
//!
//! Entity, validation rules, business service and repositories for orders.

pub mod error;
pub mod in_memory;
pub mod models;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use error::{OrderError, StorageError};
pub use in_memory::InMemoryOrderRepository;
pub use models::{Order, SubmitOrderRequest};
pub use repository::{OrderRepository, PgOrderRepository};
pub use service::{DateWindow, OrderService, business_day_window, is_business_day};
pub use validation::ValidationError;
