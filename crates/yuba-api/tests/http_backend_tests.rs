use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yuba_api::{BackendClient, BackendConfig, ChatRequest, FormatRequest, HttpBackend, TransportError};
use yuba_types::ConfigReference;

async fn backend_for(server: &MockServer) -> HttpBackend {
    let config = BackendConfig::new(&server.uri()).unwrap();
    HttpBackend::new(config).unwrap()
}

fn chat_request(message: &str) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        config_url: ConfigReference::profile("https://example.com/yuba.json", Some("me@example.com".into())),
    }
}

#[tokio::test]
async fn test_chat_posts_message_and_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "message": "what's the weather?",
            "config_url": {
                "configuration": "https://example.com/yuba.json",
                "userEmail": "me@example.com"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "callback": {"action": "weather", "payload": {}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let body = backend.chat(&chat_request("what's the weather?")).await.unwrap();

    assert_eq!(body, json!({"callback": {"action": "weather", "payload": {}}}));
}

#[tokio::test]
async fn test_format_posts_raw_data_and_original_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/format"))
        .and(body_json(json!({
            "raw_data": {"forecast": "Rainy day with thunderstorms"},
            "org_msg": "weather?"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Expect rain, with thunderstorms"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let body = backend
        .format(&FormatRequest {
            raw_data: json!({"forecast": "Rainy day with thunderstorms"}),
            org_msg: "weather?".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(body, json!({"response": "Expect rain, with thunderstorms"}));
}

#[tokio::test]
async fn test_non_json_body_is_returned_as_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  hello there  "))
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let body = backend.chat(&chat_request("hi")).await.unwrap();

    assert_eq!(body, json!("  hello there  "));
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    let err = backend.chat(&chat_request("hi")).await.unwrap_err();

    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    // Nothing listens on port 1
    let backend = HttpBackend::new(BackendConfig::new("http://127.0.0.1:1").unwrap()).unwrap();
    let err = backend.chat(&chat_request("hi")).await.unwrap_err();

    assert!(matches!(err, TransportError::Network(_)));
}

#[tokio::test]
async fn test_cookies_are_sent_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/format"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc123; Path=/")
                .set_body_json(json!({"response": "ok"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "with cookie"})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server).await;
    backend
        .format(&FormatRequest {
            raw_data: json!("x"),
            org_msg: "y".to_string(),
        })
        .await
        .unwrap();
    let body = backend.chat(&chat_request("hi")).await.unwrap();

    assert_eq!(body, json!({"response": "with cookie"}));
}
