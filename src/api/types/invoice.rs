//! Invoice types for the BTCPay REST API.
//!
//! Invoices are kept as raw JSON objects. The client only needs `price` to be
//! numeric when creating one; every other field is passed through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::error::{ApiError, ApiResult};

/// An invoice as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Invoice(Map<String, Value>);

impl Invoice {
    /// Create an empty invoice payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, builder style.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Invoice id assigned by the server.
    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_str)
    }

    /// Invoice status (e.g. "new", "paid").
    pub fn status(&self) -> Option<&str> {
        self.get("status").and_then(Value::as_str)
    }

    /// Checkout page URL.
    pub fn url(&self) -> Option<&str> {
        self.get("url").and_then(Value::as_str)
    }

    /// `price` coerced to a float, if present and numeric.
    pub fn price(&self) -> Option<f64> {
        self.get("price").and_then(coerce_f64)
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Unwrap into the underlying JSON object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Check that `price` can be read as a float.
    pub(crate) fn validate_price(&self) -> ApiResult<f64> {
        self.price()
            .ok_or_else(|| ApiError::Validation("Price must be a float".to_string()))
    }
}

impl From<Map<String, Value>> for Invoice {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Invoice {
    type Error = ApiError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ApiError::InvalidParameter(format!(
                "invoice must be a JSON object, got {}",
                other
            ))),
        }
    }
}

/// Float coercion: numbers, numeric strings (surrounding whitespace and
/// single `_` separators between digits allowed) and booleans as 0/1.
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_str(s.trim()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn parse_float_str(s: &str) -> Option<f64> {
    if !s.contains('_') {
        return s.parse::<f64>().ok();
    }
    let bytes = s.as_bytes();
    let separators_ok = bytes.iter().enumerate().all(|(i, b)| {
        *b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    if !separators_ok {
        return None;
    }
    s.replace('_', "").parse::<f64>().ok()
}

/// Query parameters for GET /invoices.
///
/// Unset filters are left out of the query string entirely.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    /// Invoice status (e.g. "new", "paid", "confirmed", "complete", "expired", "invalid")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Merchant order id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Merchant item code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,
    /// Earliest invoice date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_start: Option<String>,
    /// Latest invoice date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
    /// Max results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Number of results to skip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl InvoiceFilter {
    /// Create a filter with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by invoice status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Filter by merchant order id.
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Filter by merchant item code.
    pub fn with_item_code(mut self, item_code: impl Into<String>) -> Self {
        self.item_code = Some(item_code.into());
        self
    }

    /// Set the earliest invoice date.
    pub fn with_date_start(mut self, date_start: impl Into<String>) -> Self {
        self.date_start = Some(date_start.into());
        self
    }

    /// Set the latest invoice date.
    pub fn with_date_end(mut self, date_end: impl Into<String>) -> Self {
        self.date_end = Some(date_end.into());
        self
    }

    /// Set both ends of the date range.
    pub fn with_date_range(self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.with_date_start(start).with_date_end(end)
    }

    /// Set result limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set number of results to skip.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}
