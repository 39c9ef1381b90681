use std::sync::Arc;

use crate::orders::{OrderRepository, OrderService};

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    /// Order store, read directly by the list-recent endpoint
    pub orders: Arc<dyn OrderRepository>,
    /// Business rules on top of the same store
    pub order_service: Arc<OrderService>,
}

impl AppState {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self::with_service(OrderService::new(repository))
    }

    /// Build state around an already configured service (custom clock in tests)
    pub fn with_service(service: OrderService) -> Self {
        Self {
            orders: service.repository().clone(),
            order_service: Arc::new(service),
        }
    }
}
