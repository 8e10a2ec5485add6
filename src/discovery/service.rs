//! Discovery orchestration
//!
//! One strategy object owns the whole discovery pipeline: cache check,
//! schema fetch and parse, probe fallback, tool synthesis, cache write.
//! Discovery never fails hard; anything that goes wrong degrades to an
//! empty or partial capability record.

use crate::config::DiscoveryConfig;
use crate::discovery::cache::CapabilityCache;
use crate::discovery::probe::probe_endpoints;
use crate::discovery::schema::{fetch_schema, parse_schema};
use crate::discovery::synthesize::synthesize_tools;
use crate::discovery::types::{Capabilities, Endpoint};
use crate::proxy::{connection_id_for, ConnectionProxy};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Capability discovery service for OAuth-connected providers
pub struct DiscoveryService {
    proxy: Arc<dyn ConnectionProxy>,
    cache: Arc<CapabilityCache>,
    config: DiscoveryConfig,
}

impl DiscoveryService {
    /// Create a discovery service
    pub fn new(
        proxy: Arc<dyn ConnectionProxy>,
        cache: Arc<CapabilityCache>,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            proxy,
            cache,
            config,
        }
    }

    /// Discover capabilities for a (provider, workspace) pair. Returns the
    /// cached record when present; otherwise runs the full pipeline and
    /// caches the result. Always returns a record, possibly with no
    /// endpoints.
    pub async fn discover(&self, provider: &str, workspace_id: &str) -> Capabilities {
        if let Some(cached) = self.cache.get(provider, workspace_id).await {
            return cached;
        }

        let connection_id = connection_id_for(Some(workspace_id));
        let endpoints = self.resolve_endpoints(provider, &connection_id).await;
        let tools = synthesize_tools(&endpoints);

        info!(
            "Discovered {} endpoints / {} tools for {} (workspace {})",
            endpoints.len(),
            tools.len(),
            provider,
            workspace_id
        );

        let capabilities = Capabilities {
            provider: provider.to_string(),
            discovered_at: Utc::now(),
            endpoints,
            tools,
        };

        self.cache
            .set(provider, workspace_id, capabilities.clone())
            .await;
        capabilities
    }

    /// Resolve the endpoint set for a provider: schema-first, probing as
    /// the fallback. A fetched document that parses to nothing callable is
    /// treated the same as no document at all.
    pub async fn resolve_endpoints(&self, provider: &str, connection_id: &str) -> Vec<Endpoint> {
        if let Some(doc) = fetch_schema(self.proxy.as_ref(), &self.config, provider, connection_id).await
        {
            let endpoints = parse_schema(&doc);
            if !endpoints.is_empty() {
                debug!("Schema parsing yielded {} endpoints for {}", endpoints.len(), provider);
                return endpoints;
            }
            debug!("Fetched document for {} yielded no endpoints, probing", provider);
        }

        probe_endpoints(self.proxy.as_ref(), &self.config, provider, connection_id).await
    }
}
