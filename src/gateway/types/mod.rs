//! Gateway types module
//!
//! - [`response`]: `ApiError` / `ApiResult` and their HTTP mapping

pub mod response;

pub use response::{ApiError, ApiResult};
