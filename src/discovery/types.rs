//! Types for capability discovery and tool synthesis

use crate::proxy::HttpMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Semantic category assigned to a discovered endpoint.
///
/// Noun categories describe what an endpoint reads; the `*Action` variants
/// mark endpoints whose path or description names a mutating verb
/// (send, reply, share, invite, upload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Messaging,
    MessagingAction,
    Social,
    SocialAction,
    Contacts,
    Profile,
    Search,
    SearchParam,
    Calendar,
    CalendarAction,
    Files,
    FileOrganization,
    General,
}

impl Category {
    /// Identifier form, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Messaging => "messaging",
            Category::MessagingAction => "messaging_action",
            Category::Social => "social",
            Category::SocialAction => "social_action",
            Category::Contacts => "contacts",
            Category::Profile => "profile",
            Category::Search => "search",
            Category::SearchParam => "search_param",
            Category::Calendar => "calendar",
            Category::CalendarAction => "calendar_action",
            Category::Files => "files",
            Category::FileOrganization => "file_organization",
            Category::General => "general",
        }
    }

    /// Underscores replaced by spaces, for human-readable descriptions
    pub fn words(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// The noun category behind an action/param variant
    pub fn base(&self) -> Category {
        match self {
            Category::MessagingAction => Category::Messaging,
            Category::SocialAction => Category::Social,
            Category::SearchParam => Category::Search,
            Category::CalendarAction => Category::Calendar,
            Category::FileOrganization => Category::Files,
            other => *other,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter specification coerced from a schema document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name
    pub name: String,
    /// Parameter type, defaulting to "string" when the schema is silent
    #[serde(rename = "type", default = "default_param_type")]
    pub param_type: String,
    /// Parameter description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter is required
    #[serde(default)]
    pub required: bool,
}

fn default_param_type() -> String {
    "string".to_string()
}

impl ParamSpec {
    /// Create a string-typed parameter
    pub fn string(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            param_type: default_param_type(),
            description: None,
            required,
        }
    }
}

/// A discovered endpoint. Immutable once produced by the schema parser or
/// the endpoint prober.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    /// HTTP method
    pub method: HttpMethod,
    /// Service-relative path
    pub path: String,
    /// Semantic category
    pub category: Category,
    /// Description from the schema, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameters from the schema, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParamSpec>,
    /// Whether a probe saw the endpoint answer with a success status.
    /// False for endpoints inferred from a 405 signal.
    pub responsive: bool,
    /// Up to 5 top-level keys of a sampled GET response. Diagnostic only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_response: Option<Vec<String>>,
}

impl Endpoint {
    /// Create an endpoint with no schema metadata
    pub fn new(method: HttpMethod, path: impl Into<String>, category: Category) -> Self {
        Self {
            method,
            path: path.into(),
            category,
            description: None,
            parameters: Vec::new(),
            responsive: false,
            sample_response: None,
        }
    }

    /// Grouping key shared with the tool synthesizer
    pub fn group_key(&self) -> String {
        format!("{}_{}", self.category.as_str(), self.method.as_lower())
    }
}

/// A synthesized, schema-described callable operation aggregating one or
/// more endpoints that share a category and method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Generated name, e.g. "get_contacts"
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Category shared by the aggregated endpoints
    pub category: Category,
    /// Method shared by the aggregated endpoints
    pub method: HttpMethod,
    /// Aggregated endpoints; the first one derived the schema
    pub endpoints: Vec<Endpoint>,
    /// JSON-Schema-like object describing the tool input
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    /// Action phrases the resolver matches free text against, in
    /// declaration order (the documented tie-break)
    pub action_phrases: Vec<String>,
}

impl Tool {
    /// The endpoint whose shape defined this tool
    pub fn primary_endpoint(&self) -> &Endpoint {
        &self.endpoints[0]
    }
}

/// The discovered capability set for one (provider, workspace) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Provider key this record was discovered for
    pub provider: String,
    /// When discovery ran
    pub discovered_at: DateTime<Utc>,
    /// All discovered endpoints
    pub endpoints: Vec<Endpoint>,
    /// Synthesized tools
    pub tools: Vec<Tool>,
}

impl Capabilities {
    /// Empty record for a provider with nothing discovered
    pub fn empty(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            discovered_at: Utc::now(),
            endpoints: Vec::new(),
            tools: Vec::new(),
        }
    }

    /// Names of all synthesized tools
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// One representative action phrase per tool, for "no match" replies
    pub fn available_actions(&self) -> Vec<&str> {
        self.tools
            .iter()
            .filter_map(|t| t.action_phrases.first().map(|p| p.as_str()))
            .collect()
    }
}

/// Connected-service listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Provider key
    pub name: String,
    /// Whether the broker holds a connection for it
    pub connected: bool,
}
