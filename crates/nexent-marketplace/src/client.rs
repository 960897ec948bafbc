//! Asynchronous catalog API client implementation.

use crate::models::{AppTemplate, AppTemplateListParams, DataEnvelope};
use crate::source::CatalogSource;
use crate::Result;
use async_trait::async_trait;
use nexent_core::client::{
    ClientConfig, RetryPolicy, ServiceClient, ServiceClientBuilder, CATALOG_DEFAULT_TIMEOUT,
};
use nexent_core::config::NexentClientConfig;
use nexent_core::Error;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const USER_AGENT: &str = concat!("nexent-marketplace/", env!("CARGO_PKG_VERSION"));
const SERVICE_NAME: &str = "catalog";
const APP_TEMPLATES_PATH: &str = "marketplace/app-templates/";

/// Builder for [`MarketplaceClient`].
#[derive(Debug, Clone)]
pub struct MarketplaceClientBuilder {
    inner: ServiceClientBuilder,
}

impl MarketplaceClientBuilder {
    /// Create a builder for the specified base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(
            SERVICE_NAME,
            base_url,
            Duration::from_secs(CATALOG_DEFAULT_TIMEOUT),
        )?
        .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Create a builder from a validated client configuration.
    pub fn from_config(config: &NexentClientConfig) -> Result<Self> {
        let base_url = config.parse_api_url()?;
        let http_config = ClientConfig::new()
            .with_timeout(config.timeout())
            .with_tls_verify(config.tls_verify)
            .with_retry_policy(RetryPolicy::new().with_max_retries(config.max_retries));

        let mut builder = Self::new(base_url)?.with_http_config(http_config);
        if let Some(token) = &config.api_token {
            builder = builder.with_token(token.clone());
        }
        Ok(builder)
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(retry);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Configure a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_token(token);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<MarketplaceClient> {
        let inner = self.inner.build()?;
        Ok(MarketplaceClient { inner })
    }
}

/// Asynchronous client for the remote app-template catalog.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    inner: ServiceClient,
}

impl MarketplaceClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        MarketplaceClientBuilder::new(base_url)?.build()
    }

    /// Construct a client from a validated configuration.
    pub fn from_config(config: &NexentClientConfig) -> Result<Self> {
        MarketplaceClientBuilder::from_config(config)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// List app templates, unwrapping the response envelope.
    pub async fn list_app_templates(
        &self,
        params: &AppTemplateListParams,
    ) -> Result<Vec<AppTemplate>> {
        let envelope: DataEnvelope<Vec<AppTemplate>> = self
            .get_json(APP_TEMPLATES_PATH, &params.to_pairs())
            .await?;
        Ok(envelope.data)
    }

    async fn get_json<R>(&self, path: &str, params: &[(&'static str, String)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .execute_with_retry(
                Method::GET,
                path,
                params,
                |request| request.header("Accept", "application/json"),
                map_status_to_error,
            )
            .await?;

        let body = response.bytes().await.map_err(Error::from)?;
        serde_json::from_slice(&body).map_err(|err| {
            Error::ParseError(format!("Failed to parse catalog response for `{path}`: {err}"))
        })
    }
}

#[async_trait]
impl CatalogSource for MarketplaceClient {
    async fn fetch(&self, featured_only: bool) -> Result<Vec<AppTemplate>> {
        let params = AppTemplateListParams {
            featured: featured_only,
        };
        match self.list_app_templates(&params).await {
            Ok(templates) => {
                info!(featured_only, count = templates.len(), "Fetched app templates");
                Ok(templates)
            }
            Err(err) => {
                warn!(featured_only, error = %err, "App template fetch failed");
                Err(Error::SourceUnavailable(err.to_string()))
            }
        }
    }
}

fn map_status_to_error(status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::BAD_REQUEST => Error::InvalidRequest(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::InvalidRequest(format!("Catalog authentication failed: {text}"))
        }
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("Catalog temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("Catalog server error {status}: {text}"))
        }
        _ => Error::HttpError(format!("Catalog error {status}: {text}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexent_core::AppId;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> MarketplaceClient {
        MarketplaceClientBuilder::new(server.uri())
            .unwrap()
            .with_retry_policy(RetryPolicy::no_retry())
            .build()
            .unwrap()
    }

    fn template_json(uid: &str, name: &str) -> serde_json::Value {
        json!({
            "uid": uid,
            "name": name,
            "logo_url": "https://cdn.example.com/logo.png",
            "description": "Long description",
            "short_description": "Short",
            "is_active": true,
            "is_public": true,
            "setup_time_minutes": 3,
            "billing_cycle": "monthly",
            "price": 12.5,
            "created_at": "2025-01-10T12:00:00Z",
            "updated_at": "2025-02-01T08:30:00Z",
            "minimum_requirements": [
                { "name": "cpu", "quantity": 2, "unit": "cores", "display_name": "CPU", "cost": 10 }
            ],
            "categories": ["CMS"],
            "features": [{ "name": "Auto SSL", "description": "Certificates" }]
        })
    }

    #[tokio::test]
    async fn list_app_templates_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketplace/app-templates/"))
            .and(query_param("featured-apps", "false"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [template_json("wp", "WordPress"), template_json("gh", "Ghost")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let templates = client
            .list_app_templates(&AppTemplateListParams::default())
            .await
            .unwrap();

        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].uid, AppId::new("wp"));
        assert_eq!(templates[0].price, Some(12.5));
        assert_eq!(templates[1].name, "Ghost");
    }

    #[tokio::test]
    async fn fetch_featured_sends_flag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketplace/app-templates/"))
            .and(query_param("featured-apps", "true"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": [template_json("wp", "WordPress")] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let templates = client.fetch(true).await.unwrap();
        assert_eq!(templates.len(), 1);
    }

    #[tokio::test]
    async fn base_url_path_is_preserved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/marketplace/app-templates/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = MarketplaceClient::new(format!("{}/v1", server.uri())).unwrap();
        let templates = client.fetch(false).await.unwrap();
        assert!(templates.is_empty());
    }

    #[tokio::test]
    async fn server_error_becomes_source_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketplace/app-templates/"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = test_client(&server);

        let err = client
            .list_app_templates(&AppTemplateListParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));

        let err = client.fetch(false).await.unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn malformed_body_becomes_source_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketplace/app-templates/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .mount(&server)
            .await;

        let client = test_client(&server);

        let err = client
            .list_app_templates(&AppTemplateListParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));

        let err = client.fetch(false).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse catalog response"));
    }

    #[test]
    fn from_config_rejects_bad_url() {
        let mut config = NexentClientConfig::default();
        config.api_url = "::nope".to_string();
        assert!(matches!(
            MarketplaceClient::from_config(&config),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            map_status_to_error(StatusCode::NOT_FOUND, String::new()),
            Error::NotFound(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::FORBIDDEN, String::new()),
            Error::InvalidRequest(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            Error::ServiceUnavailable(_)
        ));
        assert!(matches!(
            map_status_to_error(StatusCode::IM_A_TEAPOT, String::new()),
            Error::HttpError(_)
        ));
    }
}
