//! HTTP client utilities and retry logic.
//!
//! This module provides HTTP client configuration, retry policies and the
//! [`ServiceClient`] that service-specific clients build on.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};

/// Default timeout for catalog API requests (in seconds)
pub const CATALOG_DEFAULT_TIMEOUT: u64 = 20;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const POOL_MAX_IDLE_PER_HOST: usize = 4;

/// How transient failures are retried.
///
/// Retry `n` (1-based) waits `base_delay * 2^(n-1)`, capped at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub base_delay: Duration,
    /// Upper bound on any single wait.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Three retries starting at 250ms, capped at 4s.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }

    /// Single attempt, no retries.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Set the number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the first wait and the cap.
    #[must_use]
    pub const fn with_delays(mut self, base: Duration, max: Duration) -> Self {
        self.base_delay = base;
        self.max_delay = max;
        self
    }

    /// Wait before retry number `retry`; zero for the initial attempt.
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let factor = 1_u32.checked_shl(retry - 1).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Whether retry number `retry` may still be sent.
    #[must_use]
    pub const fn allows(&self, retry: u32) -> bool {
        retry <= self.max_retries
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings for the underlying `reqwest` client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Retry behaviour.
    pub retry_policy: RetryPolicy,
    /// Idle connections kept per host.
    pub pool_max_idle_per_host: usize,
    /// Verify TLS certificates.
    pub tls_verify: bool,
}

impl ClientConfig {
    /// Catalog defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(CATALOG_DEFAULT_TIMEOUT),
            retry_policy: RetryPolicy::new(),
            pool_max_idle_per_host: POOL_MAX_IDLE_PER_HOST,
            tls_verify: true,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Set how many idle connections are pooled per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    service: &'static str,
    base_url: Url,
    http_config: ClientConfig,
    user_agent: Option<String>,
    token: Option<Arc<SecretString>>,
}

impl ServiceClientBuilder {
    /// Create a builder for a named service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed.
    pub fn new(service: &'static str, base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid {service} base URL: {err}"))
        })?;

        // Url::join drops the last segment unless the path ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            service,
            base_url,
            http_config: ClientConfig::new().with_timeout(timeout),
            user_agent: None,
            token: None,
        })
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.http_config.retry_policy = retry;
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Send an `Authorization: Bearer` token with every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Arc::new(SecretString::from(token.into())));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let config = &self.http_config;
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(CONNECT_TIMEOUT);

        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        if !config.tls_verify {
            warn!(service = self.service, "TLS verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!(
                "Failed to build {} HTTP client: {err}",
                self.service
            ))
        })?;

        Ok(ServiceClient {
            http,
            service: self.service,
            base_url: self.base_url,
            retry_policy: self.http_config.retry_policy,
            token: self.token,
        })
    }
}

/// Shared HTTP client with retry handling for a single remote service.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    service: &'static str,
    base_url: Url,
    retry_policy: RetryPolicy,
    token: Option<Arc<SecretString>>,
}

impl ServiceClient {
    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the service name used in logs and errors.
    #[must_use]
    pub const fn service(&self) -> &'static str {
        self.service
    }

    /// Return the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid {} path `{path}`: {err}", self.service))
        })
    }

    /// Send a request, retrying transient failures according to the retry policy.
    ///
    /// `customize` decorates each attempt's request; `map_status` turns a
    /// non-success status and body into an [`Error`]. Mapped errors other than
    /// [`Error::ServiceUnavailable`] are returned without retrying.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted.
    pub async fn execute_with_retry<F, M>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        customize: F,
        map_status: M,
    ) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
        M: Fn(StatusCode, String) -> Error,
    {
        let url = self.build_url(path)?;
        let mut attempt = 0;
        let mut last_error: Option<Error> = None;

        loop {
            let mut request = self.http.request(method.clone(), url.clone()).query(params);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token.expose_secret());
            }
            request = customize(request);

            debug!(service = self.service, %method, path = %path, attempt, "Sending request");

            match request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());

                    let error = map_status(status, message);
                    if !matches!(error, Error::ServiceUnavailable(_)) {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(err) => {
                    let error = Error::from(err);
                    if !matches!(
                        error,
                        Error::Timeout(_) | Error::ServiceUnavailable(_) | Error::HttpError(_)
                    ) {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
            }

            attempt += 1;
            if !self.retry_policy.allows(attempt) {
                break;
            }

            let delay = self.retry_policy.backoff(attempt);
            debug!(service = self.service, ?delay, attempt, "Retrying request");
            if !delay.is_zero() {
                sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::ServiceUnavailable(format!("{} request failed after retries", self.service))
        }))
    }
}
