use log::debug;
use std::sync::Arc;

use crate::errors::DetectionError;
use crate::language_utils;
use crate::providers::LocalizationEngine;

/// Detects the language of a text fragment through the localization engine
#[derive(Debug, Clone)]
pub struct LanguageDetector {
    engine: Arc<dyn LocalizationEngine>,
}

impl LanguageDetector {
    pub fn new(engine: Arc<dyn LocalizationEngine>) -> Self {
        Self { engine }
    }

    /// Return the normalized locale code of `text`
    pub async fn detect(&self, text: &str) -> Result<String, DetectionError> {
        let locale = self.engine.recognize_locale(text).await?;
        let locale = language_utils::normalize_locale(&locale);

        if locale.is_empty() {
            return Err(DetectionError::EmptyLocale);
        }
        if language_utils::validate_locale(&locale).is_err() {
            return Err(DetectionError::InvalidLocale(locale));
        }

        debug!(
            "{} recognized locale '{}'",
            self.engine.provider_name(),
            locale
        );
        Ok(locale)
    }
}
