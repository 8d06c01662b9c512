//! Exchange rate types for the BTCPay REST API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Crypto code used when none is given.
pub const DEFAULT_CRYPTO_CODE: &str = "BTC";

/// Exchange rate of one fiat or crypto currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rate {
    /// Currency symbol (e.g. "USD")
    pub code: String,
    /// Display name, when the server sends one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Units of `code` per one unit of the crypto currency
    pub rate: Decimal,
}

/// Query parameters for GET /rates/.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatesParams {
    /// Crypto currency to quote against
    #[serde(rename = "cryptoCode")]
    pub crypto_code: String,
    /// Store whose rate source should be used
    #[serde(rename = "storeID", skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

impl Default for RatesParams {
    fn default() -> Self {
        Self::new(DEFAULT_CRYPTO_CODE)
    }
}

impl RatesParams {
    /// Create params for the given crypto code.
    pub fn new(crypto_code: impl Into<String>) -> Self {
        Self {
            crypto_code: crypto_code.into(),
            store_id: None,
        }
    }

    /// Scope the rates to a store. An empty id leaves the filter unset.
    pub fn with_store_id(mut self, store_id: impl Into<String>) -> Self {
        let store_id = store_id.into();
        self.store_id = if store_id.is_empty() {
            None
        } else {
            Some(store_id)
        };
        self
    }
}

/// First rate whose code equals `currency` uppercased.
pub fn select_rate<'a>(rates: &'a [Rate], currency: &str) -> Option<&'a Rate> {
    let code = currency.to_uppercase();
    rates.iter().find(|r| r.code == code)
}
