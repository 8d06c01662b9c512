//! API error types for the BTCPay REST API client.

use thiserror::Error;

/// API-specific error type for the BTCPay REST API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP/network error from reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request payload rejected locally, before anything was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// 4xx response to a signed request
    #[error("{status} Client Error: {reason} for url: {url} | body: {body}")]
    Client {
        status: u16,
        reason: String,
        url: String,
        body: String,
    },

    /// 5xx response to a signed request
    #[error("{status} Server Error: {reason} for url: {url} | body: {body}")]
    Server {
        status: u16,
        reason: String,
        url: String,
        body: String,
    },

    /// Error status without client/server attribution (unsigned requests)
    #[error("{status} Error: {reason} for url: {url} | body: {body}")]
    Transport {
        status: u16,
        reason: String,
        url: String,
        body: String,
    },

    /// No rate returned for the requested currency code
    #[error("Rate not found for currency: {currency}")]
    RateNotFound { currency: String },

    /// JSON deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// Invalid parameter provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Client { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::Transport { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for 4xx responses to signed requests.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::Client { .. })
    }

    /// Returns `true` for 5xx responses to signed requests.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Server { .. })
    }

    /// Returns `true` for a 404 from any request strategy or a missing rate.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::RateNotFound { .. }) || self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_error() -> ApiError {
        ApiError::Client {
            status: 404,
            reason: "Not Found".to_string(),
            url: "https://btcpay.example.com/invoices/bad-id".to_string(),
            body: r#"{"error":"Object not found"}"#.to_string(),
        }
    }

    #[test]
    fn test_client_error_display() {
        let msg = client_error().to_string();
        assert_eq!(
            msg,
            r#"404 Client Error: Not Found for url: https://btcpay.example.com/invoices/bad-id | body: {"error":"Object not found"}"#
        );
    }

    #[test]
    fn test_server_error_display() {
        let err = ApiError::Server {
            status: 503,
            reason: "Service Unavailable".to_string(),
            url: "https://btcpay.example.com/invoices/".to_string(),
            body: "maintenance".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("503 Server Error: Service Unavailable"));
        assert!(msg.ends_with("| body: maintenance"));
    }

    #[test]
    fn test_classification() {
        let err = client_error();
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));

        let transport = ApiError::Transport {
            status: 500,
            reason: "Internal Server Error".to_string(),
            url: "https://btcpay.example.com/api".to_string(),
            body: String::new(),
        };
        assert!(!transport.is_client_error());
        assert!(!transport.is_server_error());
        assert_eq!(transport.status(), Some(500));
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        let err = ApiError::Validation("Price must be a float".to_string());
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());

        let err = ApiError::RateNotFound {
            currency: "XYZ".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Rate not found for currency: XYZ");
    }
}
