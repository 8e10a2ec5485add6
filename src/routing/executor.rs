//! Request execution
//!
//! Performs the single proxied call for a resolved endpoint, applying
//! best-effort payload shaping for the known social-post and
//! messaging-send path shapes. Shaping is a lookup over known provider and
//! path patterns, not a per-category rule: newly discovered endpoints that
//! merely share a category pass their data through unchanged.

use crate::discovery::types::{Endpoint, Tool};
use crate::error::Result;
use crate::proxy::{ConnectionProxy, HttpMethod, ProxyRequest, ProxyResponse};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Executes resolved endpoints through the connection broker. Exactly one
/// proxy call per invocation; no retries, no compensation.
pub struct RequestExecutor {
    default_timeout_secs: u64,
}

impl RequestExecutor {
    /// Create an executor with a default per-call timeout
    pub fn new(default_timeout_secs: u64) -> Self {
        Self {
            default_timeout_secs,
        }
    }

    /// Execute one call for the resolved endpoint
    pub async fn execute(
        &self,
        proxy: &dyn ConnectionProxy,
        tool: &Tool,
        endpoint: &Endpoint,
        data: Value,
        provider: &str,
        connection_id: &str,
    ) -> Result<ProxyResponse> {
        let shaped = shape_payload(provider, endpoint, data);

        let mut request = ProxyRequest::new(
            endpoint.method,
            endpoint.path.clone(),
            connection_id,
            provider,
        )
        .with_timeout(self.default_timeout_secs);

        request = match endpoint.method {
            HttpMethod::Get => {
                if is_empty_object(&shaped) {
                    request
                } else {
                    request.with_params(shaped)
                }
            }
            _ => request.with_data(shaped),
        };

        debug!(
            "Executing {} via {} {} on {}",
            tool.name, endpoint.method, endpoint.path, provider
        );
        proxy.call(request).await
    }
}

fn is_empty_object(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// First string value among the free-form content keys
fn free_text(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| data.get(*k))
        .filter_map(|v| v.as_str())
        .map(|s| s.to_string())
        .next()
}

/// Known post-creation path shapes on LinkedIn-style providers
fn is_linkedin_post(provider: &str, endpoint: &Endpoint) -> bool {
    provider.contains("linkedin")
        && endpoint.method == HttpMethod::Post
        && (endpoint.path.contains("ugcPosts")
            || endpoint.path.contains("/shares")
            || endpoint.path.ends_with("/posts"))
}

/// Known message-send path shapes on Slack-style providers
fn is_slack_message(provider: &str, endpoint: &Endpoint) -> bool {
    endpoint.method == HttpMethod::Post
        && (endpoint.path.contains("chat.postMessage")
            || (provider.contains("slack") && endpoint.path.contains("/messages")))
}

/// Apply provider-specific payload shaping when the endpoint matches a
/// known shape; otherwise pass the data through unchanged.
pub fn shape_payload(provider: &str, endpoint: &Endpoint, data: Value) -> Value {
    if is_linkedin_post(provider, endpoint) {
        // Already enveloped payloads pass through untouched
        if data.get("specificContent").is_some() {
            return data;
        }
        if let Some(text) = free_text(&data, &["text", "content", "message"]) {
            debug!("Shaping payload into share envelope for {}", endpoint.path);
            let author = data
                .get("author")
                .and_then(|a| a.as_str())
                .unwrap_or("urn:li:person:me");
            return json!({
                "author": author,
                "lifecycleState": "PUBLISHED",
                "specificContent": {
                    "com.linkedin.ugc.ShareContent": {
                        "shareCommentary": {"text": text},
                        "shareMediaCategory": "NONE"
                    }
                },
                "visibility": {
                    "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC"
                }
            });
        }
        return data;
    }

    if is_slack_message(provider, endpoint) {
        let channel = free_text(&data, &["channel", "to"]);
        let text = free_text(&data, &["text", "message", "content"]);
        if let (Some(channel), Some(text)) = (channel, text) {
            debug!("Shaping payload into channel/text for {}", endpoint.path);
            let mut shaped = Map::new();
            shaped.insert("channel".to_string(), Value::String(channel));
            shaped.insert("text".to_string(), Value::String(text));
            return Value::Object(shaped);
        }
        return data;
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::types::Category;

    fn endpoint(method: HttpMethod, path: &str, category: Category) -> Endpoint {
        Endpoint::new(method, path, category)
    }

    #[test]
    fn test_linkedin_post_envelope() {
        let ep = endpoint(HttpMethod::Post, "/v2/ugcPosts", Category::SocialAction);
        let shaped = shape_payload("linkedin", &ep, json!({"text": "hello world"}));
        assert_eq!(shaped["lifecycleState"], "PUBLISHED");
        assert_eq!(
            shaped["specificContent"]["com.linkedin.ugc.ShareContent"]["shareCommentary"]["text"],
            "hello world"
        );
        assert_eq!(
            shaped["visibility"]["com.linkedin.ugc.MemberNetworkVisibility"],
            "PUBLIC"
        );
    }

    #[test]
    fn test_already_enveloped_passes_through() {
        let ep = endpoint(HttpMethod::Post, "/v2/ugcPosts", Category::SocialAction);
        let envelope = json!({"specificContent": {"x": 1}, "author": "urn:li:person:abc"});
        let shaped = shape_payload("linkedin", &ep, envelope.clone());
        assert_eq!(shaped, envelope);
    }

    #[test]
    fn test_slack_channel_text_mapping() {
        let ep = endpoint(HttpMethod::Post, "/chat.postMessage", Category::MessagingAction);
        let shaped = shape_payload(
            "slack",
            &ep,
            json!({"to": "#general", "message": "hi", "extra": true}),
        );
        assert_eq!(shaped, json!({"channel": "#general", "text": "hi"}));
    }

    #[test]
    fn test_slack_incomplete_payload_passes_through() {
        let ep = endpoint(HttpMethod::Post, "/messages/send", Category::MessagingAction);
        let data = json!({"text": "no channel given"});
        assert_eq!(shape_payload("slack", &ep, data.clone()), data);
    }

    #[test]
    fn test_unknown_provider_passes_through() {
        // Same category, unknown service: best-effort lookup does not guess
        let ep = endpoint(HttpMethod::Post, "/statuses", Category::SocialAction);
        let data = json!({"text": "hello"});
        assert_eq!(shape_payload("mastodon", &ep, data.clone()), data);
    }

    #[test]
    fn test_get_category_never_shaped() {
        let ep = endpoint(HttpMethod::Get, "/ugcPosts", Category::Social);
        let data = json!({"text": "hello"});
        assert_eq!(shape_payload("linkedin", &ep, data.clone()), data);
    }
}
