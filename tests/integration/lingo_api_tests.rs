/*!
 * Integration tests for the localization engine client
 */

use serde_json::{Map, Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use postlingo::app_config::EngineConfig;
use postlingo::errors::ProviderError;
use postlingo::providers::lingo::LingoEngine;
use postlingo::providers::{LocalizableObject, LocalizationEngine, LocalizationParams};

use crate::common;

fn engine_for(server: &MockServer, batch_size: usize) -> LingoEngine {
    let config = EngineConfig {
        endpoint: server.uri(),
        api_key: "test-key".to_string(),
        timeout_secs: 5,
        batch_size,
        ideal_batch_item_size: 250,
        fast_title: true,
    };
    LingoEngine::new(&config).unwrap()
}

/// Translate every string of a request chunk by prefixing the target locale
fn echo_translation(request: &Request) -> ResponseTemplate {
    let body = common::request_json(request);
    let target = body["locale"]["target"].as_str().unwrap_or_default().to_string();
    let data: Map<String, Value> = body["data"]
        .as_object()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| {
            let text = v.as_str().unwrap_or_default();
            (k, Value::String(format!("{}:{}", target, text)))
        })
        .collect();
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

/// Recognition posts the text with bearer auth
#[tokio::test]
async fn test_recognize_locale_withText_shouldPostToRecognize() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recognize"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(body_partial_json(json!({ "text": "Bonjour le monde" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "locale": "fr" })))
        .expect(1)
        .mount(&server)
        .await;

    let locale = engine_for(&server, 25)
        .recognize_locale("Bonjour le monde")
        .await
        .unwrap();

    assert_eq!(locale, "fr");
}

/// Quick translation sends one `text` field and passes the fast flag through
#[tokio::test]
async fn test_quick_translate_withFastParams_shouldSendTextField() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/i18n"))
        .and(body_partial_json(json!({
            "params": { "fast": true },
            "locale": { "source": "en", "target": "es" },
            "data": { "text": "Hello World" }
        })))
        .respond_with(echo_translation)
        .expect(1)
        .mount(&server)
        .await;

    let params = LocalizationParams::new("en", "es").fast(true);
    let translated = engine_for(&server, 25)
        .quick_translate("Hello World", &params)
        .await
        .unwrap();

    assert_eq!(translated, "es:Hello World");
}

/// Payloads are chunked by key count and share one workflow id
#[tokio::test]
async fn test_localize_object_withManyKeys_shouldChunkAndMerge() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/i18n"))
        .respond_with(echo_translation)
        .expect(3)
        .mount(&server)
        .await;

    let object: LocalizableObject = (1..=5)
        .map(|i| (format!("key{}", i), Value::String(format!("value {}", i))))
        .collect();

    let localized = engine_for(&server, 2)
        .localize_object(object, &LocalizationParams::new("en", "de"), true)
        .await
        .unwrap();

    assert_eq!(localized.len(), 5);
    assert_eq!(localized["key1"], "de:value 1");
    assert_eq!(localized["key5"], "de:value 5");

    let requests = server.received_requests().await.unwrap_or_default();
    let workflow_ids: Vec<Value> = requests
        .iter()
        .map(|r| common::request_json(r)["params"]["workflowId"].clone())
        .collect();
    assert_eq!(workflow_ids.len(), 3);
    assert!(workflow_ids.iter().all(|id| id == &workflow_ids[0]));
    assert!(workflow_ids[0].as_str().is_some_and(|id| !id.is_empty()));
}

/// Sequential localization gives the same result as concurrent
#[tokio::test]
async fn test_localize_object_sequential_shouldMatchConcurrent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/i18n"))
        .respond_with(echo_translation)
        .mount(&server)
        .await;

    let object: LocalizableObject = (1..=4)
        .map(|i| (format!("k{}", i), Value::String("text".to_string())))
        .collect();
    let engine = engine_for(&server, 3);
    let params = LocalizationParams::new("en", "it");

    let sequential = engine.localize_object(object.clone(), &params, false).await.unwrap();
    let concurrent = engine.localize_object(object, &params, true).await.unwrap();

    assert_eq!(sequential, concurrent);
}

/// Engine failures map onto provider errors
#[tokio::test]
async fn test_engine_errors_withVariousStatuses_shouldMapToProviderErrors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recognize"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/i18n"))
        .and(body_partial_json(json!({ "locale": { "target": "ja" } })))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/i18n"))
        .and(body_partial_json(json!({ "locale": { "target": "ko" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "unsupported pair" })))
        .mount(&server)
        .await;

    let engine = engine_for(&server, 25);

    assert!(matches!(
        engine.recognize_locale("x").await,
        Err(ProviderError::AuthenticationError(_))
    ));

    match engine.quick_translate("x", &LocalizationParams::new("en", "ja")).await {
        Err(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 503);
            assert!(message.starts_with("Server error: overloaded"));
        }
        other => panic!("expected server error, got {:?}", other),
    }

    match engine.quick_translate("x", &LocalizationParams::new("en", "ko")).await {
        Err(ProviderError::RequestFailed(message)) => assert_eq!(message, "unsupported pair"),
        other => panic!("expected request failure, got {:?}", other),
    }
}
