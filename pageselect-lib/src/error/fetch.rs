//! Page fetch error types

use std::time::Duration;

/// Errors that can occur while fetching a page from a [`PagedSource`].
///
/// None of these are fatal: the session resolves a failed fetch to an empty
/// page and keeps any pending bulk selection for a later load.
///
/// [`PagedSource`]: crate::source::PagedSource
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The provider answered but the body could not be parsed.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// Non-success response from the provider.
    #[error("HTTP {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// An in-process source could not serve the page.
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// Creates a new server error.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is a server error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for non-success responses from the provider.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Returns `true` if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Server { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(e) => !e.is_decode(),
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_retryable() {
        assert!(FetchError::server(503, "Service Unavailable").is_retryable());
        assert!(FetchError::server(429, "Too Many Requests").is_retryable());
        assert!(!FetchError::server(404, "Not Found").is_retryable());
    }

    #[test]
    fn test_parse_error_not_retryable() {
        let err = FetchError::parse_with_body("missing field `data`", "{}");
        assert!(!err.is_retryable());
        assert!(!err.is_server_error());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FetchError::server(500, "boom").to_string(), "HTTP 500: boom");
        assert_eq!(
            FetchError::Timeout(Duration::from_secs(2)).to_string(),
            "Timeout after 2s"
        );
    }
}
