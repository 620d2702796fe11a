use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One requested line: reserve `quantity` units of `product_id` at `price`.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationItem {
    pub product_id: i64,
    pub quantity: i32,
    pub price: f64,
}

impl Default for ReservationItem {
    fn default() -> Self {
        Self {
            product_id: 0,
            quantity: 0,
            price: 0.0,
        }
    }
}

/// Why a single line was rejected. Never surfaces as an HTTP error on its
/// own; it is data inside the result envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    NotFound,
    ProductInactive,
    ProductNotStockeable,
    OutOfStock,
    InsufficientAvailable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    AllSuccess,
    Partial,
    AllFailed,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSuccess {
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFailure {
    pub product_id: i64,
    pub quantity: i32,
    pub reason: FailureReason,
}

/// Aggregate outcome of one reserve-and-add request. `successes` and
/// `failures` partition the input lines and preserve ascending product-id
/// order.
#[derive(Clone, Debug)]
pub struct ReservationResult {
    pub status: ReservationStatus,
    pub order_id: u64,
    pub total_price: f64,
    pub successes: Vec<ItemSuccess>,
    pub failures: Vec<ItemFailure>,
}

// =========================
// HTTP wire shapes
// =========================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReserveAndAddRequest {
    pub company_id: i64,
    pub items: Vec<ReservationItem>,
}

impl Default for ReserveAndAddRequest {
    fn default() -> Self {
        Self {
            company_id: 0,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveAndAddResponse {
    pub trace_id: String,
    pub order_id: u64,
    pub status: ReservationStatus,
    pub total_price: f64,
    pub added_items: Vec<i64>,
    pub successes: Vec<ItemSuccess>,
    pub failures: Vec<ItemFailure>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveAndAddErrorResponse {
    pub trace_id: String,
    pub status: u16,
    pub code: String,
    pub message: String,
    pub order_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}
