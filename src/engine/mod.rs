//! Engine facade
//!
//! Public operations exposed to the agent/tool-invocation layer:
//! capability discovery, free-text action invocation and the
//! connected-services listing.

use crate::config::Config;
use crate::discovery::{Capabilities, CapabilityCache, DiscoveryService, ServiceStatus};
use crate::error::Result;
use crate::format::{format_response, ApiFailure};
use crate::proxy::{connection_id_for, ConnectionProxy};
use crate::routing::{resolve_action, RequestExecutor};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a free-text invocation. API-semantic failures come back as
/// advisory text with `is_error` set; only broker transport failures
/// surface as `Err` from `invoke`.
#[derive(Debug, Clone)]
pub struct InvokeOutcome {
    /// Human-readable result or advisory text
    pub text: String,
    /// Whether the invocation failed
    pub is_error: bool,
}

impl InvokeOutcome {
    fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }
}

/// Capability discovery and invocation engine for OAuth-connected REST
/// services. Owns its cache explicitly; no ambient global state.
pub struct Engine {
    proxy: Arc<dyn ConnectionProxy>,
    discovery: DiscoveryService,
    executor: RequestExecutor,
    config: Config,
}

impl Engine {
    /// Create an engine over a connection proxy
    pub fn new(proxy: Arc<dyn ConnectionProxy>, config: Config) -> Self {
        let cache = Arc::new(CapabilityCache::new());
        Self::with_cache(proxy, cache, config)
    }

    /// Create an engine with an externally owned cache (useful for tests
    /// and for sharing a cache between engines)
    pub fn with_cache(
        proxy: Arc<dyn ConnectionProxy>,
        cache: Arc<CapabilityCache>,
        config: Config,
    ) -> Self {
        let discovery = DiscoveryService::new(proxy.clone(), cache, config.discovery.clone());
        let executor = RequestExecutor::new(config.broker.timeout_secs);
        Self {
            proxy,
            discovery,
            executor,
            config,
        }
    }

    /// Discover capabilities for a provider and workspace. Idempotent with
    /// a warm cache; never fails for discovery problems — the worst case
    /// is an empty-endpoint record.
    pub async fn discover_capabilities(&self, provider: &str, workspace_id: &str) -> Capabilities {
        self.discovery.discover(provider, workspace_id).await
    }

    /// Invoke a natural-language action against a provider. The only
    /// errors returned are transport failures of the broker itself.
    pub async fn invoke(
        &self,
        provider: &str,
        workspace_id: &str,
        action: &str,
        data: Value,
    ) -> Result<InvokeOutcome> {
        let capabilities = self.discover_capabilities(provider, workspace_id).await;

        if capabilities.tools.is_empty() {
            return Ok(InvokeOutcome::error(format!(
                "No capabilities discovered for {} yet. The service may be \
                 unreachable or expose no recognizable endpoints.",
                provider
            )));
        }

        let (tool, endpoint) = match resolve_action(action, &capabilities) {
            Some(resolved) => resolved,
            None => {
                debug!("Action '{}' unresolved for {}", action, provider);
                return Ok(InvokeOutcome::error(format!(
                    "No tool matches \"{}\" on {}. Available actions: {}.",
                    action,
                    provider,
                    capabilities.available_actions().join(", ")
                )));
            }
        };

        let connection_id = connection_id_for(Some(workspace_id));
        let response = self
            .executor
            .execute(
                self.proxy.as_ref(),
                tool,
                endpoint,
                data,
                provider,
                &connection_id,
            )
            .await?;

        if response.is_success() {
            Ok(InvokeOutcome::ok(format_response(Some(response.data))))
        } else {
            let failure = ApiFailure::from_response(
                response.status,
                endpoint.method,
                endpoint.path.clone(),
                provider,
                &response.data,
            );
            Ok(InvokeOutcome::error(failure.advise()))
        }
    }

    /// Probe the well-known provider keys for existing broker connections.
    /// A broker error for one provider marks it disconnected rather than
    /// failing the whole listing.
    pub async fn list_connected_services(&self, workspace_id: &str) -> Vec<ServiceStatus> {
        let connection_id = connection_id_for(Some(workspace_id));
        let mut statuses = Vec::new();

        for provider in &self.config.providers.known {
            let connected = match self.proxy.connection_exists(provider, &connection_id).await {
                Ok(connected) => connected,
                Err(e) => {
                    warn!("Connection check failed for {}: {}", provider, e);
                    false
                }
            };
            statuses.push(ServiceStatus {
                name: provider.clone(),
                connected,
            });
        }

        statuses
    }
}
