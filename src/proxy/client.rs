//! ConnectionProxy trait and the HTTP broker client implementation

use crate::config::BrokerConfig;
use crate::error::{EngineError, Result};
use crate::proxy::types::{HttpMethod, ProxyRequest, ProxyResponse};
use async_trait::async_trait;
use serde_json::Value;
use tokio::time::{timeout as tokio_timeout, Duration};
use tracing::debug;

/// Derive the broker connection id for a workspace. Pure string operation;
/// the default workspace is "1".
pub fn connection_id_for(workspace_id: Option<&str>) -> String {
    format!("workspace_{}", workspace_id.unwrap_or("1"))
}

/// Authenticated-proxy call primitive owned by the connection broker.
///
/// Implementations must propagate downstream HTTP status faithfully inside
/// `Ok(ProxyResponse)` (including 405) and reserve `Err` for transport
/// failures of the broker itself.
#[async_trait]
pub trait ConnectionProxy: Send + Sync {
    /// Execute one proxied call against the downstream service
    async fn call(&self, request: ProxyRequest) -> Result<ProxyResponse>;

    /// Check whether the broker holds a connection record for this
    /// (provider, connection_id) pair
    async fn connection_exists(&self, provider: &str, connection_id: &str) -> Result<bool>;
}

/// HTTP client for a Nango-style connection broker
pub struct HttpBrokerProxy {
    base_url: url::Url,
    secret_key: String,
    default_timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpBrokerProxy {
    /// Create a broker client from configuration
    pub fn new(config: &BrokerConfig) -> Result<Self> {
        let base_url = url::Url::parse(&config.base_url)
            .map_err(|e| EngineError::config(format!("Invalid broker base URL: {}", e)))?;

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| EngineError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            secret_key: config.secret_key.clone(),
            default_timeout_secs: config.timeout_secs,
            client,
        })
    }

    /// Broker URL for a proxied endpoint path
    fn proxy_url(&self, endpoint: &str) -> Result<url::Url> {
        let path = format!("proxy{}", endpoint);
        self.base_url
            .join(&path)
            .map_err(|e| EngineError::config(format!("Invalid proxy endpoint '{}': {}", endpoint, e)))
    }

    /// Flatten a JSON object into query-string pairs
    fn query_pairs(params: &Value) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(map) = params.as_object() {
            for (key, value) in map {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                pairs.push((key.clone(), rendered));
            }
        }
        pairs
    }
}

#[async_trait]
impl ConnectionProxy for HttpBrokerProxy {
    async fn call(&self, request: ProxyRequest) -> Result<ProxyResponse> {
        let url = self.proxy_url(&request.endpoint)?;
        let timeout_secs = request.timeout_secs.unwrap_or(self.default_timeout_secs);
        let timeout_duration = Duration::from_secs(timeout_secs);

        debug!(
            "Proxying {} {} for {} via {}",
            request.method, request.endpoint, request.provider_config_key, url
        );

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
            HttpMethod::Patch => self.client.patch(url),
        };

        builder = builder
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .header("Connection-Id", &request.connection_id)
            .header("Provider-Config-Key", &request.provider_config_key)
            .timeout(timeout_duration);

        if let Some(headers) = &request.headers {
            for (key, value) in headers {
                builder = builder.header(key, value);
            }
        }

        if let Some(params) = &request.params {
            builder = builder.query(&Self::query_pairs(params));
        }

        if let Some(data) = &request.data {
            builder = builder.json(data);
        }

        // Outer timeout guards against a hung broker; the reqwest timeout
        // covers the downstream call itself.
        let outcome = tokio_timeout(timeout_duration + Duration::from_secs(1), builder.send())
            .await
            .map_err(|_| {
                EngineError::timeout(format!(
                    "proxy call {} {} after {}s",
                    request.method, request.endpoint, timeout_secs
                ))
            })?;

        let response = outcome.map_err(|e| {
            EngineError::transport(format!(
                "broker call failed for {} {}: {}",
                request.method, request.endpoint, e
            ))
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            EngineError::transport(format!("failed to read broker response body: {}", e))
        })?;

        let data = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).unwrap_or(Value::String(body))
        };

        Ok(ProxyResponse { status, data })
    }

    async fn connection_exists(&self, provider: &str, connection_id: &str) -> Result<bool> {
        let path = format!("connection/{}", connection_id);
        let url = self
            .base_url
            .join(&path)
            .map_err(|e| EngineError::config(format!("Invalid connection URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .query(&[("provider_config_key", provider)])
            .timeout(Duration::from_secs(self.default_timeout_secs))
            .send()
            .await
            .map_err(|e| EngineError::transport(format!("broker connection check failed: {}", e)))?;

        Ok(response.status().is_success())
    }
}
