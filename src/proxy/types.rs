//! Proxy call types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// HTTP methods supported by the proxy primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Uppercase wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Lowercase representation used in tool grouping keys
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
        }
    }

    /// Parse a schema verb. Unrecognized verbs (head, options, trace) are
    /// skipped by the schema parser, so this returns None rather than erroring.
    pub fn parse(verb: &str) -> Option<Self> {
        match verb.to_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            _ => None,
        }
    }

    /// The opposite of the common GET/POST convention, used when a probe
    /// receives 405 Method Not Allowed.
    pub fn flipped(&self) -> Self {
        match self {
            HttpMethod::Get => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single proxied call through the connection broker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyRequest {
    /// HTTP method for the downstream service call
    pub method: HttpMethod,
    /// Service-relative endpoint path (e.g. "/conversations.list")
    pub endpoint: String,
    /// Broker connection identifier ("workspace_<id>")
    pub connection_id: String,
    /// Provider configuration key known to the broker (e.g. "slack")
    pub provider_config_key: String,
    /// Query parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Request body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Extra headers for the downstream call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Per-call timeout in seconds; falls back to the broker default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ProxyRequest {
    /// Create a minimal proxy request
    pub fn new(
        method: HttpMethod,
        endpoint: impl Into<String>,
        connection_id: impl Into<String>,
        provider_config_key: impl Into<String>,
    ) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            connection_id: connection_id.into(),
            provider_config_key: provider_config_key.into(),
            params: None,
            data: None,
            headers: None,
            timeout_secs: None,
        }
    }

    /// Set query parameters
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Set request body
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Set per-call timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// Result of a proxied call. HTTP-level failures are carried here with their
/// status; only broker-unreachable failures surface as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyResponse {
    /// Downstream HTTP status, propagated faithfully (including 405)
    pub status: u16,
    /// Response body, parsed as JSON when possible
    pub data: Value,
}

impl ProxyResponse {
    /// Whether the downstream call succeeded
    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(HttpMethod::parse("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("options"), None);
        assert_eq!(HttpMethod::parse("trace"), None);
    }

    #[test]
    fn test_method_flip() {
        assert_eq!(HttpMethod::Get.flipped(), HttpMethod::Post);
        assert_eq!(HttpMethod::Post.flipped(), HttpMethod::Get);
        assert_eq!(HttpMethod::Put.flipped(), HttpMethod::Get);
    }

    #[test]
    fn test_response_success() {
        let ok = ProxyResponse {
            status: 200,
            data: serde_json::json!({}),
        };
        let not_allowed = ProxyResponse {
            status: 405,
            data: serde_json::Value::Null,
        };
        assert!(ok.is_success());
        assert!(!not_allowed.is_success());
    }
}
