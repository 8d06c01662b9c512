//! REST API client module for BTCPay Server.
//!
//! This module provides a type-safe HTTP client for the legacy
//! (BitPay-compatible) BTCPay API: exchange rates and invoices.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use btcpay::api::{BtcPayClient, RatesParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BtcPayClient::new("https://btcpay.example.com", "base64-token")?;
//!
//!     let rates = client.get_rates(RatesParams::new("BTC")).await?;
//!     println!("Found {} rates", rates.len());
//!
//!     let invoice = client.get_invoice("Ke3Ug5ytDCeA1zQ6S8jPAy").await?;
//!     println!("Status: {:?}", invoice.status());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Client Configuration
//!
//! ```rust,ignore
//! use btcpay::api::BtcPayClient;
//! use std::time::Duration;
//!
//! let client = BtcPayClient::builder("https://btcpay.example.com", "base64-token")
//!     .timeout(Duration::from_secs(60))
//!     .header("X-Custom-Header", "value")
//!     .build()?;
//! ```
//!
//! # Error Handling
//!
//! All methods return `ApiResult<T>`, an alias for `Result<T, ApiError>`:
//!
//! ```rust,ignore
//! use btcpay::api::ApiError;
//!
//! match client.get_invoice("bad-id").await {
//!     Ok(invoice) => println!("Found invoice {:?}", invoice.id()),
//!     Err(ApiError::Client { status: 404, .. }) => println!("No such invoice"),
//!     Err(ApiError::Server { status, body, .. }) => println!("Server failed ({}): {}", status, body),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::{BtcPayClient, BtcPayClientBuilder, API_VERSION, DEFAULT_TIMEOUT_SECS};
pub use error::{ApiError, ApiResult};
pub use types::*;
