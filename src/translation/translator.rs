/*!
 * Title and body translation.
 *
 * A title is a single scalar round trip. The body goes through object
 * localization so markdown markers travel as opaque text inside a named field.
 */

use log::debug;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::TranslationError;
use crate::providers::{LocalizableObject, LocalizationEngine, LocalizationParams};

/// Name of the field the markdown body is wrapped in
pub const BODY_FIELD: &str = "markdown";

/// Translates fetched content through the localization engine
#[derive(Debug, Clone)]
pub struct ContentTranslator {
    engine: Arc<dyn LocalizationEngine>,
    fast_title: bool,
}

impl ContentTranslator {
    pub fn new(engine: Arc<dyn LocalizationEngine>) -> Self {
        Self {
            engine,
            fast_title: true,
        }
    }

    /// Whether title translation asks the engine for its fast mode
    pub fn with_fast_title(mut self, fast_title: bool) -> Self {
        self.fast_title = fast_title;
        self
    }

    /// Translate a title with a single scalar call
    pub async fn translate_title(
        &self,
        title: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationError> {
        let params = LocalizationParams::new(source_lang, target_lang).fast(self.fast_title);
        let translated = self.engine.quick_translate(title, &params).await?;
        non_empty(translated)
    }

    /// Translate a markdown body as a structured field, engine-side concurrency enabled
    pub async fn translate_body(
        &self,
        markdown: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationError> {
        let mut object = LocalizableObject::new();
        object.insert(BODY_FIELD.to_string(), Value::String(markdown.to_string()));

        let params = LocalizationParams::new(source_lang, target_lang);
        let mut localized = self.engine.localize_object(object, &params, true).await?;
        debug!(
            "{} localized body {} → {}",
            self.engine.provider_name(),
            source_lang,
            target_lang
        );

        match localized.remove(BODY_FIELD) {
            Some(Value::String(translated)) => non_empty(translated),
            _ => Err(TranslationError::MissingField(BODY_FIELD.to_string())),
        }
    }
}

fn non_empty(translated: String) -> Result<String, TranslationError> {
    if translated.trim().is_empty() {
        Err(TranslationError::EmptyResult)
    } else {
        Ok(translated)
    }
}
