//! Tool synthesis
//!
//! Groups discovered endpoints by (category, method) and synthesizes one
//! named, schema-described tool per group. The first endpoint of a group
//! derives the tool's description and input schema; later endpoints only
//! append to its endpoint list (first-endpoint-wins keeps the schema
//! stable when endpoints collide on a group key).

use crate::discovery::types::{Category, Endpoint, Tool};
use crate::proxy::HttpMethod;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Verb prefix for a generated tool name
fn verb_for(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "get",
        HttpMethod::Post => "create",
        HttpMethod::Put => "update",
        HttpMethod::Delete => "delete",
        HttpMethod::Patch => "manage",
    }
}

/// Action phrase aliases per (base category, verb). These are what the
/// resolver matches free text against; phrase order within a tool is the
/// documented tie-break. The generic "<verb> <category words>" phrase is
/// appended for every tool.
fn alias_phrases(category: Category, method: HttpMethod) -> Vec<&'static str> {
    match (category.base(), method) {
        (Category::Messaging, HttpMethod::Get) => vec!["get messages", "read messages", "check inbox"],
        (Category::Messaging, HttpMethod::Post) => vec!["send message", "reply"],
        (Category::Social, HttpMethod::Get) => vec!["get posts", "view feed"],
        (Category::Social, HttpMethod::Post) => vec!["create post", "share update", "publish post"],
        (Category::Contacts, HttpMethod::Get) => {
            vec!["get contacts", "list contacts", "list channels", "list people"]
        }
        (Category::Profile, HttpMethod::Get) => vec!["get profile", "whoami"],
        (Category::Search, HttpMethod::Get) => vec!["search", "find"],
        (Category::Calendar, HttpMethod::Get) => vec!["get calendar", "list events"],
        (Category::Calendar, HttpMethod::Post) => vec!["create event", "schedule meeting"],
        (Category::Files, HttpMethod::Get) => vec!["get files", "list files"],
        (Category::Files, HttpMethod::Post) => vec!["upload file", "create file"],
        _ => Vec::new(),
    }
}

/// Build the input schema for a tool from its first endpoint
fn build_input_schema(endpoint: &Endpoint) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<Value> = Vec::new();

    // GET tools always page
    if endpoint.method == HttpMethod::Get {
        properties.insert(
            "limit".to_string(),
            json!({"type": "integer", "description": "Maximum items to return", "default": 10}),
        );
        properties.insert(
            "offset".to_string(),
            json!({"type": "integer", "description": "Items to skip", "default": 0}),
        );
    }

    for param in &endpoint.parameters {
        let mut prop = Map::new();
        prop.insert("type".to_string(), Value::String(param.param_type.clone()));
        if let Some(description) = &param.description {
            prop.insert("description".to_string(), Value::String(description.clone()));
        }
        properties.insert(param.name.clone(), Value::Object(prop));
        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    properties.insert(
        "workspace_id".to_string(),
        json!({"type": "string", "description": "Workspace identifier"}),
    );

    let mut schema = Map::new();
    schema.insert("type".to_string(), Value::String("object".to_string()));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    Value::Object(schema)
}

/// Synthesize tools from endpoints. Tool order follows the order in which
/// group keys first appear in the endpoint list, which makes the action
/// resolver's first-match tie-break deterministic.
pub fn synthesize_tools(endpoints: &[Endpoint]) -> Vec<Tool> {
    let mut tools: Vec<Tool> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for endpoint in endpoints {
        let key = endpoint.group_key();

        if let Some(&idx) = index_by_key.get(&key) {
            // Existing group: append only, schema stays first-endpoint-wins
            tools[idx].endpoints.push(endpoint.clone());
            continue;
        }

        let verb = verb_for(endpoint.method);
        let name = format!("{}_{}", verb, endpoint.category.as_str());
        let description = endpoint.description.clone().unwrap_or_else(|| {
            let mut verb_words = verb.to_string();
            verb_words[..1].make_ascii_uppercase();
            format!("{} {}", verb_words, endpoint.category.words())
        });

        let mut action_phrases: Vec<String> = alias_phrases(endpoint.category, endpoint.method)
            .into_iter()
            .map(|p| p.to_string())
            .collect();
        let generic = format!("{} {}", verb, endpoint.category.words());
        if !action_phrases.contains(&generic) {
            action_phrases.push(generic);
        }

        debug!("Synthesized tool {} for group {}", name, key);
        index_by_key.insert(key, tools.len());
        tools.push(Tool {
            name,
            description,
            category: endpoint.category,
            method: endpoint.method,
            endpoints: vec![endpoint.clone()],
            input_schema: build_input_schema(endpoint),
            action_phrases,
        });
    }

    tools
}
