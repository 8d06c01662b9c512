//! BTCPay REST API client implementation.
//!
//! The [`BtcPayClient`] talks to the legacy (BitPay-compatible) BTCPay Server
//! API. Every call goes through one of three request strategies:
//!
//! - **signed GET**: `Authorization: Basic <token>` plus query parameters
//! - **signed POST**: `Authorization: Basic <token>` plus a JSON body
//! - **unsigned**: no auth header, POST when a payload is given, GET otherwise
//!
//! All successful responses are wrapped as `{"data": ...}`; only the payload
//! is returned.
//!
//! # Example
//!
//! ```rust,ignore
//! use btcpay::api::{BtcPayClient, Invoice, InvoiceFilter, RatesParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BtcPayClient::new("https://btcpay.example.com", "base64-token")?;
//!
//!     let usd = client.get_rate("usd", RatesParams::default()).await?;
//!     println!("1 BTC = {} USD", usd);
//!
//!     let invoice = Invoice::new().field("price", 10).field("currency", "USD");
//!     let created = client.create_invoice(&invoice).await?;
//!     println!("Pay at {:?}", created.url());
//!
//!     let paid = client
//!         .get_invoices(&InvoiceFilter::new().with_status("paid").with_limit(5))
//!         .await?;
//!     println!("{} paid invoices", paid.len());
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::api::types::*;

/// Value sent in the `X-Accept-Version` header.
pub const API_VERSION: &str = "2.0.0";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ACCEPT_VERSION: HeaderName = HeaderName::from_static("x-accept-version");

/// How a non-success status is turned into an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusPolicy {
    /// 4xx → `Client`, 5xx → `Server`
    Classify,
    /// Always `Transport`
    Generic,
}

/// Builder for configuring [`BtcPayClient`].
#[derive(Clone)]
pub struct BtcPayClientBuilder {
    host: String,
    token: String,
    insecure: bool,
    timeout: Duration,
    user_agent: String,
    default_headers: Vec<(String, String)>,
}

impl BtcPayClientBuilder {
    /// Create a new builder for the given host and token.
    ///
    /// The token is sent verbatim as `Authorization: Basic <token>`, so it
    /// must already be encoded the way the server expects.
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            token: token.into(),
            insecure: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("btcpay-rs/{}", env!("CARGO_PKG_VERSION")),
            default_headers: Vec::new(),
        }
    }

    /// Mark the connection as insecure.
    ///
    /// The flag is recorded and reported by [`BtcPayClient::is_insecure`];
    /// it does not change TLS verification.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    pub fn build(self) -> ApiResult<BtcPayClient> {
        let mut auth_header = HeaderValue::from_str(&format!("Basic {}", self.token))
            .map_err(|e| ApiError::InvalidParameter(format!("Invalid token: {}", e)))?;
        auth_header.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_VERSION, HeaderValue::from_static(API_VERSION));

        for (name, value) in self.default_headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| {
                ApiError::InvalidParameter(format!("Invalid header name '{}': {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(&value).map_err(|e| {
                ApiError::InvalidParameter(format!("Invalid header value for '{}': {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }

        let http_client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .default_headers(headers)
            .pool_max_idle_per_host(10)
            .build()?;

        if self.insecure {
            tracing::debug!(host = %self.host, "Client created with insecure flag set");
        }

        Ok(BtcPayClient {
            http_client,
            host: self.host,
            auth_header,
            insecure: self.insecure,
        })
    }
}

impl std::fmt::Debug for BtcPayClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BtcPayClientBuilder")
            .field("host", &self.host)
            .field("insecure", &self.insecure)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// BTCPay REST API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct BtcPayClient {
    http_client: Client,
    host: String,
    auth_header: HeaderValue,
    insecure: bool,
}

impl BtcPayClient {
    /// Create a new client with default settings (30s timeout, connection pooling).
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value,
    /// or if the HTTP client cannot be initialized.
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> ApiResult<Self> {
        BtcPayClientBuilder::new(host, token).build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder(host: impl Into<String>, token: impl Into<String>) -> BtcPayClientBuilder {
        BtcPayClientBuilder::new(host, token)
    }

    /// Base URL, without a trailing slash.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether the client was built with the insecure flag.
    pub fn is_insecure(&self) -> bool {
        self.insecure
    }

    // =========================================================================
    // Rate endpoints
    // =========================================================================

    /// Get exchange rates for a crypto currency.
    pub async fn get_rates(&self, params: RatesParams) -> ApiResult<Vec<Rate>> {
        self.signed_get("/rates/", Some(&params)).await
    }

    /// Get the rate of one currency against a crypto currency.
    ///
    /// `currency` is uppercased before matching; the first matching entry wins.
    pub async fn get_rate(&self, currency: &str, params: RatesParams) -> ApiResult<Decimal> {
        let rates = self.get_rates(params).await?;
        select_rate(&rates, currency)
            .map(|r| r.rate)
            .ok_or_else(|| ApiError::RateNotFound {
                currency: currency.to_uppercase(),
            })
    }

    // =========================================================================
    // Invoice endpoints
    // =========================================================================

    /// Create an invoice.
    ///
    /// `price` must be readable as a float; otherwise this fails with
    /// [`ApiError::Validation`] and nothing is sent.
    pub async fn create_invoice(&self, payload: &Invoice) -> ApiResult<Invoice> {
        payload.validate_price()?;
        self.signed_post("/invoices/", payload).await
    }

    /// Get a single invoice by id.
    pub async fn get_invoice(&self, invoice_id: &str) -> ApiResult<Invoice> {
        if invoice_id.is_empty() {
            return Err(ApiError::InvalidParameter("invoice_id cannot be empty".to_string()));
        }
        let path = format!("/invoices/{}", urlencoding::encode(invoice_id));
        self.signed_get(&path, None::<&()>).await
    }

    /// List invoices matching a filter.
    pub async fn get_invoices(&self, filter: &InvoiceFilter) -> ApiResult<Vec<Invoice>> {
        self.signed_get("/invoices", Some(filter)).await
    }

    // =========================================================================
    // Unsigned passthrough
    // =========================================================================

    /// Call an arbitrary path without authentication.
    ///
    /// A truthy `payload` is POSTed as JSON; `None` or an empty/zero/null
    /// payload issues a GET. Error statuses become [`ApiError::Transport`].
    pub async fn unsigned_request<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: Option<&Value>,
    ) -> ApiResult<T> {
        let url = self.url(path, None::<&()>)?;
        let request = match payload.filter(|p| is_truthy(p)) {
            Some(body) => self.request(Method::POST, &url, false).json(body),
            None => self.request(Method::GET, &url, false),
        };
        self.send(request, StatusPolicy::Generic).await
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Signed GET with optional query parameters.
    async fn signed_get<T, Q>(&self, path: &str, params: Option<&Q>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path, params)?;
        let request = self.request(Method::GET, &url, true);
        self.send(request, StatusPolicy::Classify).await
    }

    /// Signed POST with a JSON body.
    async fn signed_post<T, B>(&self, path: &str, payload: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path, None::<&()>)?;
        let request = self.request(Method::POST, &url, true).json(payload);
        self.send(request, StatusPolicy::Classify).await
    }

    /// Join host, path and the encoded query.
    fn url<Q: Serialize + ?Sized>(&self, path: &str, params: Option<&Q>) -> ApiResult<String> {
        let mut url = format!("{}{}", self.host, path);
        if let Some(params) = params {
            let query = serde_urlencoded::to_string(params)
                .map_err(|e| ApiError::InvalidParameter(format!("Invalid query: {}", e)))?;
            if !query.is_empty() {
                url.push(if url.contains('?') { '&' } else { '?' });
                url.push_str(&query);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: &str, signed: bool) -> RequestBuilder {
        tracing::debug!(method = %method, url = %url, signed, "Sending request");
        let request = self.http_client.request(method, url);
        if signed {
            request.header(AUTHORIZATION, self.auth_header.clone())
        } else {
            request
        }
    }

    /// Send a request and unwrap the `data` envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        policy: StatusPolicy,
    ) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "Received response");

        if status.as_u16() >= 400 {
            return Err(Self::error_for_status(response, policy).await);
        }

        let envelope = response.json::<DataEnvelope<T>>().await.map_err(|e| {
            ApiError::Deserialize(format!("Failed to deserialize response: {}", e))
        })?;
        Ok(envelope.data)
    }

    /// Build the error for a failed response, keeping the body text.
    async fn error_for_status(response: reqwest::Response, policy: StatusPolicy) -> ApiError {
        let status = response.status();
        let url = response.url().to_string();
        let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read error response body: {}", e);
                String::new()
            }
        };

        tracing::warn!(status = status.as_u16(), url = %url, "Request failed");

        let code = status.as_u16();
        match (policy, code) {
            (StatusPolicy::Classify, 400..=499) => ApiError::Client {
                status: code,
                reason,
                url,
                body,
            },
            (StatusPolicy::Classify, 500..=599) => ApiError::Server {
                status: code,
                reason,
                url,
                body,
            },
            _ => ApiError::Transport {
                status: code,
                reason,
                url,
                body,
            },
        }
    }
}

impl std::fmt::Debug for BtcPayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BtcPayClient").field(&self.host).finish()
    }
}

/// Payload truthiness for unsigned requests: null, false, zero and empty
/// strings/arrays/objects do not count as a body.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = BtcPayClient::new("https://btcpay.example.com", "dG9rZW4=").unwrap();
        assert_eq!(client.host(), "https://btcpay.example.com");
        assert!(!client.is_insecure());
    }

    #[test]
    fn test_client_builder() {
        let client = BtcPayClient::builder("https://btcpay.example.com/", "dG9rZW4=")
            .timeout_secs(60)
            .user_agent("my-shop/1.0")
            .header("X-Custom", "test")
            .insecure(true)
            .build()
            .unwrap();

        // Base URL should have trailing slash removed
        assert_eq!(client.host(), "https://btcpay.example.com");
        assert!(client.is_insecure());
    }

    #[test]
    fn test_builder_accepts_empty_token() {
        let client = BtcPayClient::new("https://btcpay.example.com", "").unwrap();
        assert_eq!(client.host(), "https://btcpay.example.com");
    }

    #[test]
    fn test_builder_rejects_invalid_token() {
        let err = BtcPayClient::new("https://btcpay.example.com", "bad\ntoken").unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }

    #[test]
    fn test_builder_rejects_invalid_header() {
        let err = BtcPayClient::builder("https://btcpay.example.com", "dG9rZW4=")
            .header("bad header", "value")
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = BtcPayClient::new("https://btcpay.example.com", "c2VjcmV0").unwrap();
        let debug = format!("{:?}", client);
        assert_eq!(debug, r#"BtcPayClient("https://btcpay.example.com")"#);

        let builder = BtcPayClient::builder("https://btcpay.example.com", "c2VjcmV0");
        assert!(!format!("{:?}", builder).contains("c2VjcmV0"));
    }

    #[test]
    fn test_url_building() {
        let client = BtcPayClient::new("https://btcpay.example.com", "dG9rZW4=").unwrap();

        assert_eq!(
            client.url("/invoices/abc", None::<&()>).unwrap(),
            "https://btcpay.example.com/invoices/abc"
        );
        assert_eq!(
            client.url("/rates/", Some(&RatesParams::default())).unwrap(),
            "https://btcpay.example.com/rates/?cryptoCode=BTC"
        );
        assert_eq!(
            client.url("/invoices", Some(&InvoiceFilter::new())).unwrap(),
            "https://btcpay.example.com/invoices"
        );
        assert_eq!(
            client
                .url("/invoices", Some(&InvoiceFilter::new().with_status("paid").with_limit(5)))
                .unwrap(),
            "https://btcpay.example.com/invoices?status=paid&limit=5"
        );
    }

    #[test]
    fn test_payload_truthiness() {
        assert!(is_truthy(&json!({"price": 1})));
        assert!(is_truthy(&json!([0])));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(1.5)));
        assert!(is_truthy(&json!(true)));

        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&Value::Null));
    }
}
