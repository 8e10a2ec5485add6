//! HTTP-level tests for the broker proxy client: status propagation,
//! header wiring, body parsing and timeout behavior.

use apiweaver::config::BrokerConfig;
use apiweaver::proxy::{ConnectionProxy, HttpBrokerProxy, HttpMethod, ProxyRequest};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn broker_config(base_url: &str) -> BrokerConfig {
    BrokerConfig {
        base_url: base_url.to_string(),
        secret_key: "test-secret".to_string(),
        timeout_secs: 5,
    }
}

fn request(method: HttpMethod, endpoint: &str) -> ProxyRequest {
    ProxyRequest::new(method, endpoint, "workspace_1", "slack")
}

#[tokio::test]
async fn propagates_success_status_and_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/proxy/conversations.list"))
        .and(header("Connection-Id", "workspace_1"))
        .and(header("Provider-Config-Key", "slack"))
        .and(header("Authorization", "Bearer test-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let proxy = HttpBrokerProxy::new(&broker_config(&server.uri())).unwrap();
    let response = proxy
        .call(request(HttpMethod::Get, "/conversations.list"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.data, json!({"ok": true}));
    assert!(response.is_success());
}

#[tokio::test]
async fn propagates_405_without_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/proxy/messages/send"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;

    let proxy = HttpBrokerProxy::new(&broker_config(&server.uri())).unwrap();
    let response = proxy
        .call(request(HttpMethod::Get, "/messages/send"))
        .await
        .unwrap();

    // 405 is a signal, not a transport failure
    assert_eq!(response.status, 405);
    assert!(!response.is_success());
}

#[tokio::test]
async fn forwards_query_params_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/proxy/chat.postMessage"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let proxy = HttpBrokerProxy::new(&broker_config(&server.uri())).unwrap();
    let response = proxy
        .call(
            request(HttpMethod::Post, "/chat.postMessage")
                .with_params(json!({"limit": 1}))
                .with_data(json!({"channel": "#general", "text": "hi"})),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn non_json_body_is_carried_as_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/proxy/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let proxy = HttpBrokerProxy::new(&broker_config(&server.uri())).unwrap();
    let response = proxy.call(request(HttpMethod::Get, "/health")).await.unwrap();
    assert_eq!(response.data, json!("OK"));
}

#[tokio::test]
async fn per_call_timeout_yields_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/proxy/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let proxy = HttpBrokerProxy::new(&broker_config(&server.uri())).unwrap();
    let result = proxy
        .call(request(HttpMethod::Get, "/slow").with_timeout(1))
        .await;

    let err = result.expect_err("timeout must be a transport error");
    assert!(err.is_transport());
}

#[tokio::test]
async fn connection_exists_maps_status_to_bool() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/connection/workspace_1"))
        .and(query_param("provider_config_key", "slack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "workspace_1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/connection/workspace_2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let proxy = HttpBrokerProxy::new(&broker_config(&server.uri())).unwrap();
    assert!(proxy.connection_exists("slack", "workspace_1").await.unwrap());
    assert!(!proxy.connection_exists("slack", "workspace_2").await.unwrap());
}
