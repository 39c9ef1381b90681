//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::orders::{Order, SubmitOrderRequest};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Orders API",
        version = "0.1.0",
        description = "Submit orders and list recent ones, optionally over a business-day window.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::orders::list_recent_orders,
        crate::gateway::handlers::orders::submit_order,
        crate::gateway::handlers::orders::list_recent_orders_excluding_non_business_days,
    ),
    components(schemas(Order, SubmitOrderRequest, HealthResponse)),
    tags(
        (name = "Orders", description = "Order intake and retrieval"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;
