//! API request and response types for the BTCPay REST API.

pub mod invoice;
pub mod rate;

pub use invoice::*;
pub use rate::*;

use serde::Deserialize;

/// Success envelope: every response body is `{"data": <payload>}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}
