//! Schema fetching and parsing
//!
//! Attempts to retrieve a machine-readable API description from a short
//! list of conventional discovery paths, then normalizes OpenAPI 3.x and
//! Swagger 2.x documents into `Endpoint` records.
//!
//! Documents fetched from arbitrary services at runtime are loosely shaped,
//! so parsing uses tolerant hand-rolled structures and degrades per
//! operation instead of rejecting the whole document.

use crate::config::DiscoveryConfig;
use crate::discovery::classify::classify;
use crate::discovery::types::{Endpoint, ParamSpec};
use crate::proxy::{ConnectionProxy, HttpMethod, ProxyRequest};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Operation entry inside a path item. Shared between OpenAPI 3.x and
/// Swagger 2.x; the fields that differ between the two families are all
/// optional.
#[derive(Debug, Clone, Default, Deserialize)]
struct OperationDoc {
    summary: Option<String>,
    description: Option<String>,
    parameters: Option<Vec<ParameterDoc>>,
}

/// Parameter entry. OpenAPI 3.x nests the type under `schema`; Swagger 2.x
/// carries it inline as `type`.
#[derive(Debug, Clone, Deserialize)]
struct ParameterDoc {
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(rename = "type")]
    param_type: Option<String>,
    schema: Option<Value>,
}

impl ParameterDoc {
    fn into_spec(self) -> Option<ParamSpec> {
        let name = self.name?;
        let param_type = self
            .param_type
            .or_else(|| {
                self.schema
                    .as_ref()
                    .and_then(|s| s.get("type"))
                    .and_then(|t| t.as_str())
                    .map(|t| t.to_string())
            })
            .unwrap_or_else(|| "string".to_string());
        Some(ParamSpec {
            name,
            param_type,
            description: self.description,
            required: self.required,
        })
    }
}

/// Try the conventional discovery paths in order and return the first
/// non-empty schema body. All failures are swallowed and logged; `None`
/// signals fallback to probing.
pub async fn fetch_schema(
    proxy: &dyn ConnectionProxy,
    config: &DiscoveryConfig,
    provider: &str,
    connection_id: &str,
) -> Option<Value> {
    for path in &config.schema_paths {
        let request = ProxyRequest::new(HttpMethod::Get, path.clone(), connection_id, provider)
            .with_timeout(config.fetch_timeout_secs);

        match proxy.call(request).await {
            Ok(response) if response.is_success() && !is_empty_body(&response.data) => {
                debug!("Schema found for {} at {}", provider, path);
                // Early exit: first hit wins, schemas are never merged
                return Some(response.data);
            }
            Ok(response) => {
                debug!(
                    "No schema at {} for {} (status {})",
                    path, provider, response.status
                );
            }
            Err(e) => {
                debug!("Schema fetch failed at {} for {}: {}", path, provider, e);
            }
        }
    }
    None
}

fn is_empty_body(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Whether a document looks like a schema this parser understands
pub fn is_recognized_schema(doc: &Value) -> bool {
    let has_paths = doc.get("paths").map_or(false, |p| p.is_object());
    has_paths && (doc.get("openapi").is_some() || doc.get("swagger").is_some())
}

/// Parse a schema document into endpoint records. One endpoint per
/// (path, verb) pair for the supported verbs; unrecognized verbs and
/// malformed operations are skipped.
pub fn parse_schema(doc: &Value) -> Vec<Endpoint> {
    if !is_recognized_schema(doc) {
        warn!("Document is not a recognized OpenAPI/Swagger schema");
        return Vec::new();
    }

    let swagger2 = doc.get("swagger").is_some();
    let mut endpoints = Vec::new();

    let paths = match doc.get("paths").and_then(|p| p.as_object()) {
        Some(paths) => paths,
        None => return Vec::new(),
    };

    for (path, item) in paths {
        let item = match item.as_object() {
            Some(item) => item,
            None => continue,
        };

        for verb in ["get", "post", "put", "delete", "patch"] {
            let method = match HttpMethod::parse(verb) {
                Some(method) => method,
                None => continue,
            };
            let operation = match item.get(verb) {
                Some(op) => op,
                None => continue,
            };

            let op: OperationDoc = match serde_json::from_value(operation.clone()) {
                Ok(op) => op,
                Err(e) => {
                    debug!("Skipping malformed operation {} {}: {}", verb, path, e);
                    continue;
                }
            };

            let text = format!(
                "{} {} {}",
                path,
                op.summary.as_deref().unwrap_or(""),
                op.description.as_deref().unwrap_or("")
            );
            let category = classify(&text);

            // Swagger 2.x keeps body parameters alongside path/query ones;
            // coercion is best-effort there, exact for OpenAPI 3.x.
            let parameters: Vec<ParamSpec> = op
                .parameters
                .unwrap_or_default()
                .into_iter()
                .filter_map(ParameterDoc::into_spec)
                .collect();

            if swagger2 {
                debug!("Parsed swagger2 operation {} {}", verb, path);
            }

            endpoints.push(Endpoint {
                method,
                path: path.clone(),
                category,
                description: op.summary.or(op.description),
                parameters,
                responsive: true,
                sample_response: None,
            });
        }
    }

    endpoints
}
