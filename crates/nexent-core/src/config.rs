//! Configuration structures for marketplace clients.
//!
//! This module provides configuration types for connecting to the Nexent
//! catalog API, including catalog caching and validation.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Production API base URL.
pub const PRODUCTION_API_URL: &str = "https://api.cloud.nexent.dev/v1/";

/// Local development API base URL.
pub const DEVELOPMENT_API_URL: &str = "http://127.0.0.1:8000/v1/";

/// Deployment environment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiEnvironment {
    /// Public production API over HTTPS
    Production,
    /// Local API server
    Development,
}

impl ApiEnvironment {
    /// Base URL for the environment.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_API_URL,
            Self::Development => DEVELOPMENT_API_URL,
        }
    }
}

/// Configuration for a marketplace client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NexentClientConfig {
    /// API base URL
    #[validate(url)]
    pub api_url: String,

    /// Optional bearer token for authenticated catalog requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of retry attempts
    #[validate(range(min = 0, max = 10))]
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Catalog cache configuration
    #[validate(nested)]
    #[serde(default)]
    pub catalog_cache: CatalogCacheConfig,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    20
}

const fn default_max_retries() -> u32 {
    3
}

impl NexentClientConfig {
    /// Create a new client configuration for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(api_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_url: api_url.into(),
            api_token: None,
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            catalog_cache: CatalogCacheConfig::default(),
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Create a configuration for a known environment.
    #[must_use]
    pub fn for_environment(environment: ApiEnvironment) -> Self {
        Self {
            api_url: environment.base_url().to_string(),
            ..Self::default()
        }
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set maximum retry attempts.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set catalog cache configuration.
    #[must_use]
    pub const fn with_catalog_cache(mut self, config: CatalogCacheConfig) -> Self {
        self.catalog_cache = config;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parse and validate the API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_api_url(&self) -> Result<Url, Error> {
        Url::parse(&self.api_url).map_err(|e| Error::ConfigError(format!("Invalid API URL: {e}")))
    }
}

impl Default for NexentClientConfig {
    fn default() -> Self {
        Self {
            api_url: PRODUCTION_API_URL.to_string(),
            api_token: None,
            tls_verify: default_tls_verify(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            catalog_cache: CatalogCacheConfig::default(),
        }
    }
}

/// Configuration for the catalog freshness cache.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct CatalogCacheConfig {
    /// How long a fetched catalog stays fresh, in seconds
    #[validate(range(min = 1, max = 86400))]
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,

    /// Whether front ends should refetch when the window regains focus
    #[serde(default)]
    pub refresh_on_focus: bool,
}

const fn default_cache_ttl_secs() -> u64 {
    30 * 60
}

impl CatalogCacheConfig {
    /// Create a cache configuration with defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            refresh_on_focus: false,
        }
    }

    /// Set cache TTL in seconds.
    #[must_use]
    pub const fn with_ttl(mut self, seconds: u64) -> Self {
        self.ttl_secs = seconds;
        self
    }

    /// Enable or disable refetch on focus.
    #[must_use]
    pub const fn with_refresh_on_focus(mut self, enabled: bool) -> Self {
        self.refresh_on_focus = enabled;
        self
    }

    /// Get cache TTL as a Duration.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CatalogCacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_new() {
        let config = NexentClientConfig::new("https://api.example.com/v1/").unwrap();
        assert_eq!(config.api_url, "https://api.example.com/v1/");
        assert!(config.tls_verify);
        assert_eq!(config.request_timeout_secs, 20);
        assert_eq!(config.max_retries, 3);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_client_config_invalid_url() {
        let result = NexentClientConfig::new("not-a-url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_client_config_builder() {
        let config = NexentClientConfig::new("https://api.example.com")
            .unwrap()
            .with_api_token("secret")
            .with_tls_verify(false)
            .with_timeout(60)
            .with_max_retries(5)
            .with_catalog_cache(CatalogCacheConfig::new().with_ttl(60));

        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert!(!config.tls_verify);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.catalog_cache.ttl_secs, 60);
    }

    #[test]
    fn test_environment_presets() {
        let prod = NexentClientConfig::for_environment(ApiEnvironment::Production);
        assert_eq!(prod.api_url, PRODUCTION_API_URL);
        assert_eq!(prod.parse_api_url().unwrap().scheme(), "https");

        let dev = NexentClientConfig::for_environment(ApiEnvironment::Development);
        let url = dev.parse_api_url().unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
        assert_eq!(url.port(), Some(8000));
    }

    #[test]
    fn test_catalog_cache_defaults() {
        let config = CatalogCacheConfig::default();
        assert_eq!(config.ttl(), Duration::from_secs(1800));
        assert!(!config.refresh_on_focus);
    }

    #[test]
    fn test_config_deserialization_applies_defaults() {
        let config: NexentClientConfig =
            serde_json::from_str(r#"{"api_url": "http://localhost:9000/v1/"}"#).unwrap();

        assert!(config.tls_verify);
        assert_eq!(config.request_timeout_secs, 20);
        assert_eq!(config.catalog_cache.ttl_secs, 1800);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_skips_missing_token() {
        let config = NexentClientConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("api_token"));
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = NexentClientConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 301;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_retries_range() {
        let mut config = NexentClientConfig::default();
        config.max_retries = 11;
        assert!(config.validate().is_err());

        config.max_retries = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cache_config_validation_ttl_range() {
        let mut config = CatalogCacheConfig::default();
        config.ttl_secs = 0;
        assert!(config.validate().is_err());

        config.ttl_secs = 86_401;
        assert!(config.validate().is_err());

        let mut client = NexentClientConfig::default();
        client.catalog_cache.ttl_secs = 0;
        assert!(client.validate().is_err());
    }
}
