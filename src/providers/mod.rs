/*!
 * External collaborators of the translation pipeline.
 *
 * - `hashnode`: GraphQL content host returning a post's title and markdown
 * - `lingo`: HTTP localization engine (locale recognition, text and object localization)
 * - `mock`: deterministic in-process doubles with call counters
 */

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt::Debug;

use crate::errors::{FetchError, ProviderError};
use crate::translation::model::FetchedContent;

/// A keyed bundle of strings sent through object localization
pub type LocalizableObject = Map<String, Value>;

/// Source of published posts
#[async_trait]
pub trait ContentSource: Send + Sync + Debug {
    /// Fetch the title and markdown body of `post_slug` in `publication_host`
    ///
    /// # Returns
    /// * `Result<FetchedContent, FetchError>` - Both fields non-empty, or the reason there is nothing to translate
    async fn fetch(
        &self,
        publication_host: &str,
        post_slug: &str,
    ) -> Result<FetchedContent, FetchError>;
}

/// Locale pair and mode for a localization call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationParams {
    pub source_locale: String,
    pub target_locale: String,
    /// Trade quality for latency
    pub fast: bool,
}

impl LocalizationParams {
    pub fn new(source_locale: impl Into<String>, target_locale: impl Into<String>) -> Self {
        Self {
            source_locale: source_locale.into(),
            target_locale: target_locale.into(),
            fast: false,
        }
    }

    pub fn fast(mut self, fast: bool) -> Self {
        self.fast = fast;
        self
    }
}

/// The three capabilities consumed from the localization engine
#[async_trait]
pub trait LocalizationEngine: Send + Sync + Debug {
    /// Recognize the locale of `text`
    async fn recognize_locale(&self, text: &str) -> Result<String, ProviderError>;

    /// Translate a single string
    async fn quick_translate(
        &self,
        text: &str,
        params: &LocalizationParams,
    ) -> Result<String, ProviderError>;

    /// Translate every string leaf of `object`, preserving its shape
    ///
    /// With `concurrent` set the engine may send sub-chunks in parallel.
    async fn localize_object(
        &self,
        object: LocalizableObject,
        params: &LocalizationParams,
        concurrent: bool,
    ) -> Result<LocalizableObject, ProviderError>;

    /// Name used in logs
    fn provider_name(&self) -> &str;
}

pub mod hashnode;
pub mod lingo;
pub mod mock;
