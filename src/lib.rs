//! # BTCPay Rust SDK
//!
//! A Rust client for the BTCPay Server legacy (BitPay-compatible) REST API.
//!
//! ## Modules
//!
//! - [`api`]: REST API client for exchange rates and invoices
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use btcpay::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BtcPayClient::new("https://btcpay.example.com", "base64-token")?;
//!
//!     // Current BTC/USD rate
//!     let rate = client.get_rate("USD", RatesParams::default()).await?;
//!     println!("BTC/USD: {}", rate);
//!
//!     // Create an invoice
//!     let invoice = Invoice::new()
//!         .field("price", "10.5")
//!         .field("currency", "USD")
//!         .field("orderId", "order-42");
//!     let created = client.create_invoice(&invoice).await?;
//!     println!("Invoice {:?}", created.id());
//!
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// REST API client module for rates and invoices.
pub mod api;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use btcpay::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        ApiError, ApiResult, BtcPayClient, BtcPayClientBuilder, Invoice, InvoiceFilter, Rate,
        RatesParams, API_VERSION, DEFAULT_CRYPTO_CODE,
    };
}
