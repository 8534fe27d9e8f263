// tests for the openrouter client against a stubbed completion api

use modrelay::{Config, Error, OpenRouter, Relay};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PATH: &str = "/api/v1/chat/completions";

fn config(server: &MockServer, api_key: Option<&str>) -> Config {
    Config {
        api_key: api_key.map(str::to_string),
        endpoint: format!("{}{PATH}", server.uri()),
        ..Config::default()
    }
}

fn reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "gen-1",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}}
        ]
    })
}

#[tokio::test]
async fn test_sends_system_and_user_messages() {
    let server = MockServer::start().await;
    let defaults = Config::default();

    Mock::given(method("POST"))
        .and(path(PATH))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": defaults.model,
            "messages": [
                {"role": "system", "content": defaults.system_prompt},
                {"role": "user", "content": "Tell me a joke"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("Knock knock.")))
        .expect(1)
        .mount(&server)
        .await;

    let relay = OpenRouter::new(&config(&server, Some("test-key"))).unwrap();
    let text = relay.complete("Tell me a joke").await.unwrap();

    assert_eq!(text, "Knock knock.");
}

#[tokio::test]
async fn test_non_success_status_is_relay_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "No auth credentials found", "code": 401}
        })))
        .mount(&server)
        .await;

    let relay = OpenRouter::new(&config(&server, Some("bad-key"))).unwrap();
    let err = relay.complete("hello").await.unwrap_err();

    match &err {
        Error::Relay(msg) => {
            assert!(msg.contains("401"));
            assert!(msg.contains("No auth credentials found"));
        }
        other => panic!("expected relay error, got {other:?}"),
    }
    assert!(err.is_relay_failure());
    assert_eq!(err.user_message(), "Server error. Try again later.");
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let relay = OpenRouter::new(&config(&server, Some("test-key"))).unwrap();
    let err = relay.complete("hello").await.unwrap_err();

    assert!(matches!(err, Error::Json(_)));
    assert_eq!(err.user_message(), "Invalid API response. Check logs.");
}

#[tokio::test]
async fn test_missing_choices_is_empty_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    let relay = OpenRouter::new(&config(&server, Some("test-key"))).unwrap();
    let err = relay.complete("hello").await.unwrap_err();

    assert!(matches!(err, Error::EmptyReply));
    assert!(err.is_relay_failure());
}

#[tokio::test]
async fn test_no_key_sends_no_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("hi")))
        .mount(&server)
        .await;

    let relay = OpenRouter::new(&config(&server, None)).unwrap();
    relay.complete("hello").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert!(requests[0].headers.get("x-title").is_some());
}

#[tokio::test]
async fn test_timeout_is_relay_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply("too late"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = config(&server, Some("test-key"));
    config.timeout = Some(Duration::from_millis(200));

    let relay = OpenRouter::new(&config).unwrap();
    let err = relay.complete("hello").await.unwrap_err();

    assert!(matches!(err, Error::Http(_)));
    assert!(err.is_relay_failure());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_relay_failure() {
    let config = Config {
        api_key: Some("test-key".to_string()),
        endpoint: "http://127.0.0.1:1/api/v1/chat/completions".to_string(),
        ..Config::default()
    };

    let relay = OpenRouter::new(&config).unwrap();
    let err = relay.complete("hello").await.unwrap_err();

    assert!(err.is_relay_failure());
}

#[test]
fn test_require_api_key() {
    let mut config = Config::default();
    assert!(matches!(config.require_api_key(), Err(Error::MissingApiKey)));

    config.api_key = Some("   ".to_string());
    assert!(config.require_api_key().is_err());

    config.api_key = Some("sk-or-123".to_string());
    assert_eq!(config.require_api_key().unwrap(), "sk-or-123");
}
