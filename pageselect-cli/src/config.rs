//! Runtime configuration from environment variables.

use std::env;

use pageselect_lib::SessionConfig;
use pageselect_lib::error::ConfigError;
use simplelog::LevelFilter;

/// Provider used when `PAGESELECT_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://api.artic.edu/api/v1/artworks";

const API_URL: &str = "PAGESELECT_API_URL";
const PAGE_SIZE: &str = "PAGESELECT_PAGE_SIZE";
const LOG_LEVEL: &str = "PAGESELECT_LOG";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub session: SessionConfig,
    pub log_level: LevelFilter,
}

impl AppConfig {
    /// Load configuration from the process environment (and `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup(API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session = match lookup(PAGE_SIZE) {
            Some(raw) => {
                let size: usize = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::invalid_value(PAGE_SIZE, raw.as_str()))?;
                SessionConfig::new(size)?
            }
            None => SessionConfig::default(),
        };

        let log_level = match lookup(LOG_LEVEL) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_value(LOG_LEVEL, raw.as_str()))?,
            None => LevelFilter::Debug,
        };

        Ok(Self {
            api_url,
            session,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.session.page_size.get(), 12);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            (API_URL, "http://localhost:9000/items"),
            (PAGE_SIZE, "25"),
            (LOG_LEVEL, "warn"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:9000/items");
        assert_eq!(config.session.page_size.get(), 25);
        assert_eq!(config.log_level, LevelFilter::Warn);
    }

    #[test]
    fn test_invalid_page_size() {
        assert_eq!(load(&[(PAGE_SIZE, "0")]), Err(ConfigError::ZeroPageSize));
        assert_eq!(
            load(&[(PAGE_SIZE, "lots")]),
            Err(ConfigError::invalid_value(PAGE_SIZE, "lots"))
        );
    }
}
