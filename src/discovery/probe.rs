//! Heuristic endpoint probing
//!
//! When no schema document is available, the prober issues low-cost trial
//! calls against a curated table of conventional REST paths and records the
//! ones that answer with a success status or an explicit 405 signal.
//! Ambiguous failures (404, timeout, transport error) record nothing, so
//! false positives cannot occur.

use crate::config::DiscoveryConfig;
use crate::discovery::types::{Category, Endpoint};
use crate::proxy::{ConnectionProxy, HttpMethod, ProxyRequest};
use futures_util::future::join_all;
use serde_json::{json, Value};
use tokio::time::{timeout as tokio_timeout, Duration};
use tracing::debug;

/// Curated probe table spanning profile, messaging, social, contacts,
/// search, calendar and files. Categories here are fixed by the table, not
/// re-derived by the classifier; `/conversations.list` is a channel/member
/// listing on Slack-shaped services, hence `Contacts`.
const PROBE_TABLE: &[(HttpMethod, &str, Category)] = &[
    (HttpMethod::Get, "/me", Category::Profile),
    (HttpMethod::Get, "/v1/me", Category::Profile),
    (HttpMethod::Get, "/users/me", Category::Profile),
    (HttpMethod::Get, "/userinfo", Category::Profile),
    (HttpMethod::Get, "/messages", Category::Messaging),
    (HttpMethod::Get, "/conversations", Category::Messaging),
    (HttpMethod::Get, "/messages/send", Category::MessagingAction),
    (HttpMethod::Post, "/chat.postMessage", Category::MessagingAction),
    (HttpMethod::Get, "/posts", Category::Social),
    (HttpMethod::Get, "/feed", Category::Social),
    (HttpMethod::Post, "/posts", Category::SocialAction),
    (HttpMethod::Post, "/ugcPosts", Category::SocialAction),
    (HttpMethod::Get, "/contacts", Category::Contacts),
    (HttpMethod::Get, "/connections", Category::Contacts),
    (HttpMethod::Get, "/conversations.list", Category::Contacts),
    (HttpMethod::Get, "/users.list", Category::Contacts),
    (HttpMethod::Get, "/search", Category::Search),
    (HttpMethod::Get, "/calendar/events", Category::Calendar),
    (HttpMethod::Post, "/calendar/events", Category::CalendarAction),
    (HttpMethod::Get, "/events", Category::Calendar),
    (HttpMethod::Get, "/files", Category::Files),
    (HttpMethod::Get, "/files.list", Category::Files),
    (HttpMethod::Post, "/files/upload", Category::FileOrganization),
];

/// Number of top-level keys captured from a sampled object response
const SAMPLE_KEY_LIMIT: usize = 5;

/// Probe the conventional paths concurrently. Each probe carries its own
/// timeout; results are aggregated after all probes settle and keep table
/// order (set semantics, deterministic output).
pub async fn probe_endpoints(
    proxy: &dyn ConnectionProxy,
    config: &DiscoveryConfig,
    provider: &str,
    connection_id: &str,
) -> Vec<Endpoint> {
    let probes = PROBE_TABLE.iter().map(|(method, path, category)| {
        run_probe(proxy, config, provider, connection_id, *method, path, *category)
    });

    let results = join_all(probes).await;
    let endpoints: Vec<Endpoint> = results.into_iter().flatten().collect();
    debug!(
        "Probing {} recorded {}/{} endpoints",
        provider,
        endpoints.len(),
        PROBE_TABLE.len()
    );
    endpoints
}

async fn run_probe(
    proxy: &dyn ConnectionProxy,
    config: &DiscoveryConfig,
    provider: &str,
    connection_id: &str,
    method: HttpMethod,
    path: &str,
    category: Category,
) -> Option<Endpoint> {
    let mut request = ProxyRequest::new(method, path, connection_id, provider)
        .with_timeout(config.probe_timeout_secs);
    request = match method {
        HttpMethod::Get => request.with_params(json!({"limit": 1})),
        _ => request.with_data(json!({})),
    };

    // Outer guard so a proxy implementation that ignores the per-call
    // timeout still cannot block sibling probes past the budget.
    let budget = Duration::from_secs(config.probe_timeout_secs + 1);
    let outcome = match tokio_timeout(budget, proxy.call(request)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            debug!("Probe {} {} timed out", method, path);
            return None;
        }
    };

    match outcome {
        Ok(response) if response.is_success() => {
            let sample_response = match method {
                HttpMethod::Get => sample_keys(&response.data),
                _ => None,
            };
            debug!("Probe {} {} responded {}", method, path, response.status);
            Some(Endpoint {
                method,
                path: path.to_string(),
                category,
                description: None,
                parameters: Vec::new(),
                responsive: true,
                sample_response,
            })
        }
        // 405 means the path exists but wants the opposite method
        Ok(response) if response.status == 405 => {
            debug!("Probe {} {} got 405, recording {}", method, path, method.flipped());
            Some(Endpoint {
                method: method.flipped(),
                path: path.to_string(),
                category,
                description: None,
                parameters: Vec::new(),
                responsive: false,
                sample_response: None,
            })
        }
        Ok(response) => {
            debug!("Probe {} {} discarded (status {})", method, path, response.status);
            None
        }
        Err(e) => {
            debug!("Probe {} {} discarded ({})", method, path, e);
            None
        }
    }
}

fn sample_keys(data: &Value) -> Option<Vec<String>> {
    data.as_object().map(|map| {
        map.keys()
            .take(SAMPLE_KEY_LIMIT)
            .cloned()
            .collect()
    })
}
