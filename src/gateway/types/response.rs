//! HTTP error mapping
//!
//! Success bodies are the payload itself (an `Order` or an array of them);
//! error bodies are a single JSON string carrying the reason.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::orders::OrderError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned from a handler: status code plus a human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 with `reason` as the body
    pub fn bad_request(reason: impl ToString) -> Self {
        Self::new(StatusCode::BAD_REQUEST, reason.to_string())
    }

    /// 500 carrying the failure message
    pub fn internal(message: impl ToString) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
    }

    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.message)).into_response()
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(e) => ApiError::bad_request(e),
            OrderError::Storage(e) => ApiError::internal(e),
        }
    }
}
