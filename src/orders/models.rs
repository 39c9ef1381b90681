//! Data models for order intake

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Maximum length of `name` and `description`
pub const MAX_TEXT_LEN: usize = 100;

/// Fractional-second digits kept on `entry_date` (TIMESTAMPTZ resolution)
const ENTRY_DATE_PRECISION: u16 = 6;

// ============================================================================
// Order
// ============================================================================

/// Order record
///
/// `id` is generated once in [`Order::new`] and has no setter. `deleted` is a
/// soft-delete flag: nothing in this service sets it, but every read filters
/// on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[schema(example = "6f1c3a52-8a0e-4c5e-9f53-0d1b7c6e2a41")]
    id: String,
    #[schema(example = "Test Order", max_length = 100)]
    pub name: Option<String>,
    #[schema(example = "Test Description", max_length = 100)]
    pub description: Option<String>,
    pub entry_date: DateTime<Utc>,
    pub invoiced: bool,
    pub deleted: bool,
}

impl Order {
    /// Create a new order recorded at `entry_date`, truncated to microseconds
    pub fn new(
        name: Option<String>,
        description: Option<String>,
        entry_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            entry_date: entry_date.trunc_subsecs(ENTRY_DATE_PRECISION),
            invoiced: true,
            deleted: false,
        }
    }

    /// Rebuild an order read back from storage, keeping its stored id
    pub(crate) fn from_storage(
        id: String,
        name: Option<String>,
        description: Option<String>,
        entry_date: DateTime<Utc>,
        invoiced: bool,
        deleted: bool,
    ) -> Self {
        Self {
            id,
            name,
            description,
            entry_date,
            invoiced,
            deleted,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Submit payload
// ============================================================================

/// Body of `POST /orders/submit`
///
/// Unknown keys (including a caller-supplied `id` or `deleted`) are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    #[validate(length(max = 100))]
    #[schema(example = "Test Order")]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    #[schema(example = "Test Description")]
    pub description: Option<String>,
    /// Defaults to the time the order is received
    pub entry_date: Option<DateTime<Utc>>,
    /// Defaults to `true`
    pub invoiced: Option<bool>,
}

impl SubmitOrderRequest {
    pub fn into_order(self, now: DateTime<Utc>) -> Order {
        let mut order = Order::new(self.name, self.description, self.entry_date.unwrap_or(now));
        if let Some(invoiced) = self.invoiced {
            order.invoiced = invoiced;
        }
        order
    }
}
