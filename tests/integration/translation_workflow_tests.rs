/*!
 * End-to-end translation through the controller, against fake HTTP services
 */

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use postlingo::errors::{Fragment, PipelineError, PipelineStage};
use postlingo::{Controller, OutputFormat};

use crate::common;

/// Translate known strings of a chunk, in whichever field they arrive
fn spanish_engine(request: &Request) -> ResponseTemplate {
    let body = common::request_json(request);
    let mut data = body["data"].as_object().cloned().unwrap_or_default();
    for value in data.values_mut() {
        let translated = match value.as_str() {
            Some("Hello World") => "Hola Mundo",
            Some("# Hello\nWorld") => "# Hola\nMundo",
            Some(other) => other,
            None => continue,
        };
        *value = Value::String(translated.to_string());
    }
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

async fn start_services() -> (MockServer, MockServer) {
    common::init_logging();
    let content_host = MockServer::start().await;
    let engine = MockServer::start().await;
    (content_host, engine)
}

/// The full scenario over HTTP yields the expected output
#[tokio::test]
async fn test_controller_run_withReachableServices_shouldTranslatePost() {
    let (content_host, engine) = start_services().await;
    common::mount_post(&content_host, "Hello World", "# Hello\nWorld").await;
    common::mount_recognize(&engine, "en").await;
    Mock::given(method("POST"))
        .and(path("/i18n"))
        .respond_with(spanish_engine)
        .expect(2)
        .mount(&engine)
        .await;

    let controller =
        Controller::with_config(common::configured_config(&content_host.uri(), &engine.uri())).unwrap();
    let output = controller.run("acme.example", "hello-world", "es").await.unwrap();

    assert_eq!(output.result.translated_title, "Hola Mundo");
    assert_eq!(output.result.translated_body, "# Hola\nMundo");
    assert_eq!(output.metadata.original_body, "# Hello\nWorld");
    assert_eq!(output.metadata.detected_title_language, "en");

    let rendered = Controller::render(&output, OutputFormat::Json).unwrap();
    assert!(rendered.contains("\"detectedContentLanguage\": \"en\""));
}

/// Concurrent mode issues the same calls and gets the same answer
#[tokio::test]
async fn test_controller_run_withConcurrentDetection_shouldMatchSequential() {
    let (content_host, engine) = start_services().await;
    common::mount_post(&content_host, "Hello World", "# Hello\nWorld").await;
    common::mount_recognize(&engine, "en").await;
    Mock::given(method("POST"))
        .and(path("/i18n"))
        .respond_with(spanish_engine)
        .mount(&engine)
        .await;

    let mut config = common::configured_config(&content_host.uri(), &engine.uri());
    let sequential = Controller::with_config(config.clone())
        .unwrap()
        .run("acme.example", "hello-world", "es")
        .await
        .unwrap();
    config.concurrent_detection = true;
    let concurrent = Controller::with_config(config)
        .unwrap()
        .run("acme.example", "hello-world", "es")
        .await
        .unwrap();

    assert_eq!(sequential, concurrent);
    let recognized = engine
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/recognize")
        .count();
    assert_eq!(recognized, 4);
}

/// A 404 from the host never reaches the engine
#[tokio::test]
async fn test_controller_run_withMissingHost_shouldStopAtFetch() {
    let (content_host, engine) = start_services().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&content_host)
        .await;
    common::mount_recognize(&engine, "en").await;

    let controller =
        Controller::with_config(common::configured_config(&content_host.uri(), &engine.uri())).unwrap();
    let error = controller.run("acme.example", "hello-world", "es").await.unwrap_err();

    let pipeline_error = error.downcast_ref::<PipelineError>().unwrap();
    assert_eq!(pipeline_error.stage(), PipelineStage::Fetching);
    assert!(error.to_string().contains("HTTP 404"));
    assert!(engine.received_requests().await.unwrap_or_default().is_empty());
}

/// An engine answer without the sent field fails the title translation
#[tokio::test]
async fn test_controller_run_withUnexpectedEngineShape_shouldFailTranslatingTitle() {
    let (content_host, engine) = start_services().await;
    common::mount_post(&content_host, "Hello World", "# Hello\nWorld").await;
    common::mount_recognize(&engine, "en").await;
    common::mount_localize(&engine, json!({ "unrelated": "value" })).await;

    let controller =
        Controller::with_config(common::configured_config(&content_host.uri(), &engine.uri())).unwrap();
    let error = controller.translate("acme.example", "hello-world", "es").await.unwrap_err();

    assert!(matches!(
        error,
        PipelineError::Translation { fragment: Fragment::Title, .. }
    ));
    assert_eq!(error.stage(), PipelineStage::TranslatingTitle);
}

/// Same-language posts are translated anyway, with a note
#[tokio::test]
async fn test_controller_run_withSameLanguage_shouldNoteAndTranslate() {
    let (content_host, engine) = start_services().await;
    common::mount_post(&content_host, "Hola", "Mundo").await;
    common::mount_recognize(&engine, "es").await;
    Mock::given(method("POST"))
        .and(path("/i18n"))
        .respond_with(spanish_engine)
        .expect(2)
        .mount(&engine)
        .await;

    let controller =
        Controller::with_config(common::configured_config(&content_host.uri(), &engine.uri())).unwrap();
    let output = controller.run("acme.example", "hola", "es").await.unwrap();

    assert_eq!(output.notes.len(), 2);
    assert_eq!(output.result.translated_title, "Hola");

    let text = Controller::render(&output, OutputFormat::Text).unwrap();
    assert!(text.contains("note: title is already in the target language 'es'"));
}
