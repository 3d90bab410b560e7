//! Error handling for the gateway
//!
//! This module defines all error types used throughout the gateway.

use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors (fatal, surfaced at startup or first pool use)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Attempt budget exhausted across the provider pool
    #[error("All providers failed after {attempts} attempts. Last error: {last_error}")]
    AllProvidersFailed {
        /// Number of invocation attempts performed
        attempts: u32,
        /// Message of the last underlying failure
        last_error: String,
    },

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single provider invocation.
///
/// These never cross the rotation manager's boundary; the manager catches
/// and classifies them, and only [`GatewayError`] (or a success) escapes.
/// Quota vs. generic is decided by inspecting the rendered message, not by
/// variant, since provider error formats are not contractual.
#[derive(Error, Debug)]
pub enum InvokeError {
    /// Non-2xx HTTP response from the provider endpoint
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, truncated for diagnostics
        message: String,
    },

    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the configured deadline
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// The provider answered 2xx but the body was not usable
    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider family is compiled out or otherwise unusable
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_providers_failed_message() {
        let err = GatewayError::AllProvidersFailed {
            attempts: 3,
            last_error: "HTTP 500: boom".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("3 attempts"));
        assert!(rendered.contains("HTTP 500: boom"));
    }

    #[test]
    fn test_invoke_error_http_rendering() {
        let err = InvokeError::Http {
            status: 429,
            message: "Too Many Requests".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 429: Too Many Requests");
    }

    #[test]
    fn test_timeout_rendering() {
        assert_eq!(
            InvokeError::Timeout(30).to_string(),
            "Request timed out after 30s"
        );
    }
}
