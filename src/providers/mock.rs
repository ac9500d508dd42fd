/*!
 * Mock collaborators for testing.
 *
 * Both mocks are deterministic and count their calls so tests can assert
 * that a stage was (or was never) reached:
 * - `MockContentSource` - returns a fixed post or a chosen fetch failure
 * - `MockEngine` - detects from a lookup table and translates from mappings
 */

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::{FetchError, ProviderError};
use crate::providers::{ContentSource, LocalizableObject, LocalizationEngine, LocalizationParams};
use crate::translation::model::FetchedContent;

/// What the mock content host answers
#[derive(Debug, Clone, PartialEq)]
pub enum MockFetchBehavior {
    /// Return this post
    Post { title: String, markdown: String },
    /// Answer with a non-success HTTP status
    HttpStatus(u16),
    /// Publication or post is absent
    NotFound,
    /// Post exists without markdown
    EmptyContent,
}

/// Mock content host
#[derive(Debug, Clone)]
pub struct MockContentSource {
    behavior: MockFetchBehavior,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockContentSource {
    pub fn new(behavior: MockFetchBehavior) -> Self {
        Self {
            behavior,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A host that serves one post
    pub fn with_post(title: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self::new(MockFetchBehavior::Post {
            title: title.into(),
            markdown: markdown.into(),
        })
    }

    /// Simulate network latency on every fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches issued so far (shared across clones)
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for MockContentSource {
    async fn fetch(
        &self,
        publication_host: &str,
        post_slug: &str,
    ) -> Result<FetchedContent, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            MockFetchBehavior::Post { title, markdown } => Ok(FetchedContent {
                title: title.clone(),
                markdown_body: markdown.clone(),
            }),
            MockFetchBehavior::HttpStatus(status) => Err(FetchError::Remote {
                status_code: Some(*status),
                message: format!("Simulated HTTP {}", status),
            }),
            MockFetchBehavior::NotFound => Err(FetchError::NotFound(format!(
                "post '{}' does not exist in publication '{}'",
                post_slug, publication_host
            ))),
            MockFetchBehavior::EmptyContent => Err(FetchError::EmptyContent(format!(
                "post '{}' has no markdown content",
                post_slug
            ))),
        }
    }
}

/// Counters for every engine capability
#[derive(Debug, Default)]
pub struct EngineCallCounts {
    pub recognize: AtomicUsize,
    pub quick_translate: AtomicUsize,
    pub localize_object: AtomicUsize,
    /// `concurrent` flag of the last object localization
    pub last_concurrent: AtomicBool,
}

impl EngineCallCounts {
    pub fn total(&self) -> usize {
        self.recognize.load(Ordering::SeqCst)
            + self.quick_translate.load(Ordering::SeqCst)
            + self.localize_object.load(Ordering::SeqCst)
    }
}

/// Mock localization engine
#[derive(Debug, Clone)]
pub struct MockEngine {
    /// text → locale; anything else gets `default_locale`
    locales: HashMap<String, String>,
    default_locale: String,
    /// source text → translation; anything else gets "[target] text"
    translations: HashMap<String, String>,
    fail_recognize: bool,
    fail_translate: bool,
    fail_object_translate: bool,
    delay: Option<Duration>,
    /// Extra latency for object localization only
    object_delay: Option<Duration>,
    calls: Arc<EngineCallCounts>,
}

impl MockEngine {
    /// An engine that recognizes everything as `default_locale`
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            locales: HashMap::new(),
            default_locale: default_locale.into(),
            translations: HashMap::new(),
            fail_recognize: false,
            fail_translate: false,
            fail_object_translate: false,
            delay: None,
            object_delay: None,
            calls: Arc::new(EngineCallCounts::default()),
        }
    }

    /// Recognize `text` as `locale`
    pub fn with_locale(mut self, text: impl Into<String>, locale: impl Into<String>) -> Self {
        self.locales.insert(text.into(), locale.into());
        self
    }

    /// Translate `source` to `translated`
    pub fn with_translation(mut self, source: impl Into<String>, translated: impl Into<String>) -> Self {
        self.translations.insert(source.into(), translated.into());
        self
    }

    /// Make every locale recognition fail
    pub fn failing_recognition(mut self) -> Self {
        self.fail_recognize = true;
        self
    }

    /// Make every translation fail
    pub fn failing_translation(mut self) -> Self {
        self.fail_translate = true;
        self
    }

    /// Make object localization (the body path) fail while scalar translation succeeds
    pub fn failing_body_translation(mut self) -> Self {
        self.fail_object_translate = true;
        self
    }

    /// Simulate network latency on every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Simulate extra latency on object localization only
    pub fn with_body_delay(mut self, delay: Duration) -> Self {
        self.object_delay = Some(delay);
        self
    }

    /// Call counters (shared across clones)
    pub fn calls(&self) -> Arc<EngineCallCounts> {
        Arc::clone(&self.calls)
    }

    async fn apply_delay(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn translate_text(&self, text: &str, target: &str) -> String {
        self.translations
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", target, text))
    }

    fn translate_value(&self, value: Value, target: &str) -> Value {
        match value {
            Value::String(s) => Value::String(self.translate_text(&s, target)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|v| self.translate_value(v, target))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, self.translate_value(v, target)))
                    .collect(),
            ),
            other => other,
        }
    }

    fn simulated_failure() -> ProviderError {
        ProviderError::ApiError {
            status_code: 500,
            message: "Simulated engine failure".to_string(),
        }
    }
}

#[async_trait]
impl LocalizationEngine for MockEngine {
    async fn recognize_locale(&self, text: &str) -> Result<String, ProviderError> {
        self.calls.recognize.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;

        if self.fail_recognize {
            return Err(Self::simulated_failure());
        }
        Ok(self
            .locales
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default_locale.clone()))
    }

    async fn quick_translate(
        &self,
        text: &str,
        params: &LocalizationParams,
    ) -> Result<String, ProviderError> {
        self.calls.quick_translate.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;

        if self.fail_translate {
            return Err(Self::simulated_failure());
        }
        Ok(self.translate_text(text, &params.target_locale))
    }

    async fn localize_object(
        &self,
        object: LocalizableObject,
        params: &LocalizationParams,
        concurrent: bool,
    ) -> Result<LocalizableObject, ProviderError> {
        self.calls.localize_object.fetch_add(1, Ordering::SeqCst);
        self.calls.last_concurrent.store(concurrent, Ordering::SeqCst);
        self.apply_delay().await;
        if let Some(delay) = self.object_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_translate || self.fail_object_translate {
            return Err(Self::simulated_failure());
        }
        Ok(object
            .into_iter()
            .map(|(k, v)| (k, self.translate_value(v, &params.target_locale)))
            .collect())
    }

    fn provider_name(&self) -> &str {
        "Mock Engine"
    }
}
