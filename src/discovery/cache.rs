//! Capability cache
//!
//! Memoizes discovered capabilities per (provider, workspace) pair for the
//! lifetime of the process. There is no TTL, no eviction and no
//! persistence: freshness is cold-start-only by design. Entries are read
//! and written as whole records, so concurrent discoveries for the same key
//! settle as last-writer-wins without torn reads.

use crate::discovery::types::Capabilities;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Hit/miss counters for diagnostics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Process-lifetime capability store keyed by "<provider>_<workspace_id>"
pub struct CapabilityCache {
    entries: RwLock<HashMap<String, Capabilities>>,
    stats: RwLock<CacheStats>,
}

impl CapabilityCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Cache key for a (provider, workspace) pair
    pub fn key(provider: &str, workspace_id: &str) -> String {
        format!("{}_{}", provider, workspace_id)
    }

    /// Look up a capability record, cloning the whole entry out
    pub async fn get(&self, provider: &str, workspace_id: &str) -> Option<Capabilities> {
        let key = Self::key(provider, workspace_id);
        let found = self.entries.read().await.get(&key).cloned();

        let mut stats = self.stats.write().await;
        if found.is_some() {
            stats.hits += 1;
            debug!("Capability cache hit for {}", key);
        } else {
            stats.misses += 1;
            debug!("Capability cache miss for {}", key);
        }
        found
    }

    /// Store a capability record, replacing any previous entry whole
    pub async fn set(&self, provider: &str, workspace_id: &str, capabilities: Capabilities) {
        let key = Self::key(provider, workspace_id);
        self.entries.write().await.insert(key, capabilities);
    }

    /// Number of cached records
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no records
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Snapshot of the hit/miss counters
    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }
}

impl Default for CapabilityCache {
    fn default() -> Self {
        Self::new()
    }
}
