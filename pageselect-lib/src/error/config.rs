//! Configuration error types

/// Errors raised while building a source or session configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Invalid provider URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A page size of zero was requested.
    #[error("Page size must be at least 1")]
    ZeroPageSize,

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// A configuration value could not be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// The configuration key.
        key: String,
        /// The rejected value.
        value: String,
    },
}

impl ConfigError {
    /// Creates a new invalid value error.
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}
