//! Order input validation
//!
//! Validation is a list of ordered checks; the first failing check decides
//! the reason reported to the caller. The Service only checks that an order
//! is present at all, the Handler runs [`SUBMIT_CHECKS`] on the payload.

use validator::Validate;

use super::models::{MAX_TEXT_LEN, SubmitOrderRequest};

// ============================================================================
// Validation Errors
// ============================================================================

/// Caller-supplied data breaks a business rule
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Order data is missing")]
    MissingOrder,

    #[error("Order name and description are required")]
    MissingNameOrDescription,

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("days must be between -{max} and {max}")]
    WindowTooLarge { max: i32 },
}

// ============================================================================
// Checks
// ============================================================================

/// A single validation rule
pub type Check<T> = fn(&T) -> Result<(), ValidationError>;

/// Run `checks` in order and stop at the first failure
pub fn first_failure<T>(value: &T, checks: &[Check<T>]) -> Result<(), ValidationError> {
    checks.iter().try_for_each(|check| check(value))
}

/// Checks applied to a submit payload, in reporting order
pub const SUBMIT_CHECKS: &[Check<SubmitOrderRequest>] = &[
    require_name_and_description,
    text_within_limits,
];

pub fn validate_submit(req: &SubmitOrderRequest) -> Result<(), ValidationError> {
    first_failure(req, SUBMIT_CHECKS)
}

/// Enforce that the order itself was supplied
pub fn require_present<T>(value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingOrder)
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn require_name_and_description(req: &SubmitOrderRequest) -> Result<(), ValidationError> {
    if is_blank(&req.name) || is_blank(&req.description) {
        return Err(ValidationError::MissingNameOrDescription);
    }
    Ok(())
}

/// Length rules declared on [`SubmitOrderRequest`], name reported before description
const LENGTH_FIELDS: [(&str, &str); 2] = [("name", "Name"), ("description", "Description")];

fn text_within_limits(req: &SubmitOrderRequest) -> Result<(), ValidationError> {
    let Err(errors) = req.validate() else {
        return Ok(());
    };
    let failed = errors.field_errors();

    match LENGTH_FIELDS.iter().find(|(key, _)| failed.contains_key(key)) {
        Some(&(_, field)) => Err(ValidationError::TooLong {
            field,
            max: MAX_TEXT_LEN,
        }),
        None => Ok(()),
    }
}
