//! End-to-end engine tests: discovery, action resolution, invocation,
//! advisory shaping and the connected-services listing.

use apiweaver::config::Config;
use apiweaver::engine::Engine;
use apiweaver::error::{EngineError, Result};
use apiweaver::proxy::{ConnectionProxy, HttpMethod, ProxyRequest, ProxyResponse};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Scripted reply
#[derive(Clone)]
enum Reply {
    Status(u16, Value),
    Transport,
}

/// Proxy double with sequenced replies per (method, endpoint): each call
/// pops the next reply, and the last one repeats. Unconfigured endpoints
/// answer 404.
struct ScriptedProxy {
    scripts: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    connected: HashSet<String>,
    last_request: Mutex<Option<ProxyRequest>>,
}

impl ScriptedProxy {
    fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            connected: HashSet::new(),
            last_request: Mutex::new(None),
        }
    }

    fn script(self, method: HttpMethod, endpoint: &str, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert((method, endpoint.to_string()), replies.into());
        self
    }

    fn reply(self, method: HttpMethod, endpoint: &str, status: u16, body: Value) -> Self {
        self.script(method, endpoint, vec![Reply::Status(status, body)])
    }

    fn with_connection(mut self, provider: &str) -> Self {
        self.connected.insert(provider.to_string());
        self
    }

    fn last_request(&self) -> Option<ProxyRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConnectionProxy for ScriptedProxy {
    async fn call(&self, request: ProxyRequest) -> Result<ProxyResponse> {
        *self.last_request.lock().unwrap() = Some(request.clone());

        let mut scripts = self.scripts.lock().unwrap();
        let reply = match scripts.get_mut(&(request.method, request.endpoint.clone())) {
            Some(queue) => {
                if queue.len() > 1 {
                    queue.pop_front().unwrap()
                } else {
                    queue.front().cloned().unwrap()
                }
            }
            None => Reply::Status(404, Value::Null),
        };

        match reply {
            Reply::Status(status, data) => Ok(ProxyResponse { status, data }),
            Reply::Transport => Err(EngineError::transport("broker unreachable")),
        }
    }

    async fn connection_exists(&self, provider: &str, _connection_id: &str) -> Result<bool> {
        if provider == "broken" {
            return Err(EngineError::transport("broker unreachable"));
        }
        Ok(self.connected.contains(provider))
    }
}

fn engine_with(proxy: ScriptedProxy) -> (Engine, Arc<ScriptedProxy>) {
    let proxy = Arc::new(proxy);
    let engine = Engine::new(proxy.clone(), Config::default());
    (engine, proxy)
}

fn slack_channels_body() -> Value {
    json!({
        "ok": true,
        "channels": [
            {"id": "C1", "name": "general"},
            {"id": "C2", "name": "random"}
        ]
    })
}

#[tokio::test]
async fn slack_end_to_end_list_channels() {
    // No schema endpoint reachable; the probe table finds a responsive
    // conversations listing categorized as contacts
    let (engine, _) = engine_with(ScriptedProxy::new().reply(
        HttpMethod::Get,
        "/conversations.list",
        200,
        slack_channels_body(),
    ));

    let caps = engine.discover_capabilities("slack", "1").await;
    assert!(caps.tool_names().contains(&"get_contacts"));

    let outcome = engine
        .invoke("slack", "1", "list channels", json!({}))
        .await
        .unwrap();
    assert!(!outcome.is_error);
    assert!(outcome.text.contains("channels"));
}

#[tokio::test]
async fn slack_end_to_end_401_produces_advisory() {
    // Discovery sees the endpoint once, then the real call is denied
    let (engine, _) = engine_with(ScriptedProxy::new().script(
        HttpMethod::Get,
        "/conversations.list",
        vec![
            Reply::Status(200, slack_channels_body()),
            Reply::Status(401, json!({"error": "invalid_auth"})),
        ],
    ));

    let outcome = engine
        .invoke("slack", "1", "list channels", json!({}))
        .await
        .unwrap();
    assert!(outcome.is_error);
    assert!(outcome.text.contains("Reconnect"));
    assert!(outcome.text.contains("invalid_auth"));
    assert!(outcome.text.contains("GET /conversations.list on slack"));
}

#[tokio::test]
async fn unresolved_action_lists_available_actions() {
    let (engine, _) = engine_with(ScriptedProxy::new().reply(
        HttpMethod::Get,
        "/conversations.list",
        200,
        slack_channels_body(),
    ));

    let outcome = engine
        .invoke("slack", "1", "launch a rocket", json!({}))
        .await
        .unwrap();
    assert!(outcome.is_error);
    assert!(outcome.text.contains("Available actions"));
    assert!(outcome.text.contains("get contacts"));
}

#[tokio::test]
async fn empty_capabilities_report_soft_failure() {
    let (engine, _) = engine_with(ScriptedProxy::new());

    let outcome = engine
        .invoke("ghost", "1", "send message", json!({}))
        .await
        .unwrap();
    assert!(outcome.is_error);
    assert!(outcome.text.contains("No capabilities discovered"));
}

#[tokio::test]
async fn transport_failure_during_invoke_escapes() {
    let (engine, _) = engine_with(ScriptedProxy::new().script(
        HttpMethod::Get,
        "/conversations.list",
        vec![
            Reply::Status(200, slack_channels_body()),
            Reply::Transport,
        ],
    ));

    let result = engine.invoke("slack", "1", "list channels", json!({})).await;
    match result {
        Err(e) => assert!(e.is_transport()),
        Ok(outcome) => panic!("expected transport error, got outcome: {}", outcome.text),
    }
}

#[tokio::test]
async fn invoke_forwards_get_data_as_params() {
    let (engine, proxy) = engine_with(ScriptedProxy::new().reply(
        HttpMethod::Get,
        "/conversations.list",
        200,
        slack_channels_body(),
    ));

    engine
        .invoke("slack", "1", "list channels", json!({"limit": 5}))
        .await
        .unwrap();

    let request = proxy.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.params, Some(json!({"limit": 5})));
    assert_eq!(request.data, None);
    assert_eq!(request.connection_id, "workspace_1");
    assert_eq!(request.provider_config_key, "slack");
}

#[tokio::test]
async fn invoke_shapes_messaging_payload() {
    let (engine, proxy) = engine_with(
        ScriptedProxy::new()
            .reply(HttpMethod::Get, "/messages/send", 405, Value::Null)
            .script(
                HttpMethod::Post,
                "/messages/send",
                vec![Reply::Status(200, json!({"ok": true}))],
            ),
    );

    let outcome = engine
        .invoke(
            "slack",
            "1",
            "send message to the team",
            json!({"to": "#general", "message": "hello"}),
        )
        .await
        .unwrap();
    assert!(!outcome.is_error);

    let request = proxy.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.data, Some(json!({"channel": "#general", "text": "hello"})));
}

#[tokio::test]
async fn list_connected_services_probes_known_providers() {
    let (engine, _) = engine_with(ScriptedProxy::new().with_connection("slack"));

    let services = engine.list_connected_services("1").await;
    assert!(!services.is_empty());

    let slack = services.iter().find(|s| s.name == "slack").unwrap();
    assert!(slack.connected);
    let linkedin = services.iter().find(|s| s.name == "linkedin").unwrap();
    assert!(!linkedin.connected);
}
