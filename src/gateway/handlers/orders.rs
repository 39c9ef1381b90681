//! Order endpoints (list recent, submit, business-day window)

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult};
use crate::orders::validation::{self, ValidationError};
use crate::orders::{Order, SubmitOrderRequest};

/// Path of the list-recent endpoint, referenced by submit responses
pub const RECENT_ORDERS_PATH: &str = "/orders/recent";

/// Query string of the business-day endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct BusinessDaysQuery {
    /// Number of business days the window must cover
    #[param(example = 7)]
    pub days: i32,
}

/// Decode a submit body; an empty body or JSON `null` means no order was sent
pub fn parse_submit_payload(body: &[u8]) -> ApiResult<Option<SubmitOrderRequest>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid order payload: {}", e)))
}

/// List recent orders
///
/// GET /orders/recent
#[utoipa::path(
    get,
    path = "/orders/recent",
    responses(
        (status = 200, description = "Non-deleted orders from the last 24 hours, newest first", body = Vec<Order>),
        (status = 500, description = "Storage failure", body = String)
    ),
    tag = "Orders"
)]
pub async fn list_recent_orders(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Order>>> {
    let orders = state
        .orders
        .get_recent_orders()
        .await
        .map_err(ApiError::internal)?;

    tracing::debug!(count = orders.len(), "Listed recent orders");
    Ok(Json(orders))
}

/// Submit a new order
///
/// POST /orders/submit
#[utoipa::path(
    post,
    path = "/orders/submit",
    request_body = SubmitOrderRequest,
    responses(
        (status = 201, description = "Order created", body = Order,
            headers(("Location" = String, description = "List-recent endpoint"))),
        (status = 400, description = "Missing or invalid order data", body = String),
        (status = 500, description = "Storage failure", body = String)
    ),
    tag = "Orders"
)]
pub async fn submit_order(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, [(header::HeaderName, &'static str); 1], Json<Order>)> {
    let Some(req) = parse_submit_payload(&body)? else {
        return ApiError::bad_request(ValidationError::MissingOrder).into_err();
    };

    validation::validate_submit(&req).map_err(ApiError::bad_request)?;

    let order = state
        .order_service
        .add_order(Some(req.into_order(Utc::now())))
        .await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, RECENT_ORDERS_PATH)],
        Json(order),
    ))
}

/// List orders in a window covering at least `days` business days
///
/// GET /orders/recent/excludenonbusinessdays?days={int}
#[utoipa::path(
    get,
    path = "/orders/recent/excludenonbusinessdays",
    params(BusinessDaysQuery),
    responses(
        (status = 200, description = "Non-deleted orders in the business-day window, newest first", body = Vec<Order>),
        (status = 400, description = "Missing or out-of-range days", body = String),
        (status = 500, description = "Storage failure", body = String)
    ),
    tag = "Orders"
)]
pub async fn list_recent_orders_excluding_non_business_days(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BusinessDaysQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Order>>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let orders = state
        .order_service
        .get_recent_orders_excluding_non_business_days(query.days)
        .await?;
    Ok(Json(orders))
}
