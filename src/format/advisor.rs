//! Error advisory
//!
//! Classifies failed API calls by HTTP status and produces actionable
//! remediation text instead of a raw error. Advisories are soft failures:
//! this module never returns an error itself. Transport failures of the
//! broker are a different class and never reach here.

use crate::proxy::HttpMethod;
use serde_json::Value;

/// A failed downstream API call, carried with enough context for a
/// diagnosable advisory.
#[derive(Debug, Clone)]
pub struct ApiFailure {
    /// HTTP status of the failed call
    pub status: u16,
    /// Method that was attempted
    pub method: HttpMethod,
    /// Endpoint path that was attempted
    pub path: String,
    /// Provider the call targeted
    pub provider: String,
    /// Raw error body or message, if any
    pub detail: Option<String>,
}

impl ApiFailure {
    /// Build a failure record from a non-success proxy response
    pub fn from_response(
        status: u16,
        method: HttpMethod,
        path: impl Into<String>,
        provider: impl Into<String>,
        body: &Value,
    ) -> Self {
        let detail = match body {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        };
        Self {
            status,
            method,
            path: path.into(),
            provider: provider.into(),
            detail,
        }
    }

    /// Produce remediation text for this failure. Always names the
    /// attempted method, endpoint and provider.
    pub fn advise(&self) -> String {
        let attempted = format!(
            "{} {} on {} failed with status {}",
            self.method, self.path, self.provider, self.status
        );

        let remedy = match self.status {
            404 => format!(
                "The endpoint was not found. Re-run capability discovery for {} \
                 and try versioned path variants (e.g. /v1{} or /v2{}).",
                self.provider, self.path, self.path
            ),
            401 | 403 => format!(
                "Permission or authentication problem. Reconnect the {} service \
                 so the broker can re-authenticate; the connection may also be \
                 missing required OAuth scopes for this operation.",
                self.provider
            ),
            400 => "The service rejected the request parameters. Retry with only the \
                    minimal required parameters, then add fields back one at a time."
                .to_string(),
            _ => match &self.detail {
                Some(detail) => format!("The call failed: {}", detail),
                None => "The call failed with no further detail from the service.".to_string(),
            },
        };

        match (&self.detail, self.status) {
            // Generic arm already embeds the detail
            (Some(detail), 400 | 401 | 403 | 404) => {
                format!("{}. {} (service said: {})", attempted, remedy, detail)
            }
            _ => format!("{}. {}", attempted, remedy),
        }
    }
}
