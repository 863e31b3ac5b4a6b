//! API client configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, validated once at startup.

use std::env;

use serde::{Deserialize, Serialize};
use url::Url;

/// Fixed upper bound on any single HTTP request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the upstream REST API, including the `/api` prefix.
    pub base_url: String,

    /// Request timeout in seconds; a request past this bound is failed.
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let base_url = env::var("TECHSTORE_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string());

        // Validate early; the client concatenates paths onto this string.
        Url::parse(&base_url).map_err(|_| ConfigError::InvalidValue("TECHSTORE_API_URL".to_string()))?;

        let timeout_secs = env::var("TECHSTORE_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("TECHSTORE_HTTP_TIMEOUT_SECS".to_string()))?;

        Ok(ApiConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    /// Configuration pointing at an explicit base URL (tests, overrides).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ApiConfig {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let config = ApiConfig::with_base_url("http://localhost:5000/api/");
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
