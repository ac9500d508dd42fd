/*!
 * Integration tests for the GraphQL content host client
 */

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use postlingo::app_config::ContentSourceConfig;
use postlingo::errors::FetchError;
use postlingo::providers::ContentSource;
use postlingo::providers::hashnode::{Hashnode, POST_QUERY};

use crate::common;

fn client_for(server: &MockServer) -> Hashnode {
    let config = ContentSourceConfig {
        endpoint: server.uri(),
        api_token: "test-token".to_string(),
        timeout_secs: 1,
    };
    Hashnode::new(&config).unwrap()
}

/// The query carries the identifiers as variables and the required headers
#[tokio::test]
async fn test_fetch_withExistingPost_shouldSendVariablesAndHeaders() {
    common::init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "query": POST_QUERY,
            "variables": { "pubName": "acme.example", "slugName": "hello-world" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::post_envelope("Hello World", "# Hello\nWorld")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let content = client_for(&server)
        .fetch("acme.example", "hello-world")
        .await
        .unwrap();

    assert_eq!(content.title, "Hello World");
    assert_eq!(content.markdown_body, "# Hello\nWorld");
}

/// Non-success statuses carry their code
#[tokio::test]
async fn test_fetch_withHttp404_shouldReturnRemoteError() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such route"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .fetch("acme.example", "hello-world")
        .await
        .unwrap_err();

    match error {
        FetchError::Remote { status_code, message } => {
            assert_eq!(status_code, Some(404));
            assert_eq!(message, "no such route");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

/// A null post is not found, an empty body is empty content
#[tokio::test]
async fn test_fetch_withMissingOrEmptyPost_shouldClassifyFailure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "slugName": "missing" } })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "publication": { "post": null } } })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "variables": { "slugName": "draft" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::post_envelope("Draft", "")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.fetch("acme.example", "missing").await,
        Err(FetchError::NotFound(_))
    ));
    assert!(matches!(
        client.fetch("acme.example", "draft").await,
        Err(FetchError::EmptyContent(_))
    ));
}

/// Non-JSON bodies are malformed responses
#[tokio::test]
async fn test_fetch_withHtmlBody_shouldReturnMalformedResponse() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    assert!(matches!(
        client_for(&server).fetch("acme.example", "hello-world").await,
        Err(FetchError::MalformedResponse(_))
    ));
}

/// A host that never answers within the timeout has no status code
#[tokio::test]
async fn test_fetch_withSlowHost_shouldTimeOutWithoutStatus() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::post_envelope("Late", "Too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    assert!(matches!(
        client_for(&server).fetch("acme.example", "hello-world").await,
        Err(FetchError::Remote { status_code: None, .. })
    ));
}
