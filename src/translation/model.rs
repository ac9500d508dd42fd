/*!
 * Data carried through one pipeline invocation.
 *
 * Every value here is created for a single request and dropped when the
 * pipeline returns; nothing is shared between requests.
 */

use serde::{Deserialize, Serialize};

use crate::errors::{Fragment, PipelineError};
use crate::language_utils;

/// One incoming translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInput {
    publication_host: String,
    post_slug: String,
    target_language: String,
}

impl RequestInput {
    /// Build a request, trimming the identifiers and normalizing the target locale
    ///
    /// No validation happens here; the pipeline validates before any I/O.
    pub fn new(
        publication_host: impl Into<String>,
        post_slug: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            publication_host: publication_host.into().trim().to_string(),
            post_slug: post_slug.into().trim().to_string(),
            target_language: language_utils::normalize_locale(&target_language.into()),
        }
    }

    pub fn publication_host(&self) -> &str {
        &self.publication_host
    }

    pub fn post_slug(&self) -> &str {
        &self.post_slug
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Check that all fields are present and the target is in `supported`
    pub fn validate(&self, supported: &[String]) -> Result<(), PipelineError> {
        if self.publication_host.is_empty() {
            return Err(PipelineError::Validation(
                "publication host must not be empty".to_string(),
            ));
        }
        if self.post_slug.is_empty() {
            return Err(PipelineError::Validation(
                "post slug must not be empty".to_string(),
            ));
        }
        if self.target_language.is_empty() {
            return Err(PipelineError::Validation(
                "target language must not be empty".to_string(),
            ));
        }
        if !language_utils::is_supported_language(&self.target_language, supported) {
            return Err(PipelineError::Validation(format!(
                "target language '{}' is not supported",
                self.target_language
            )));
        }
        Ok(())
    }
}

/// Title and markdown body of a fetched post; both non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    pub title: String,
    pub markdown_body: String,
}

/// A detected language attributed to one fragment of the fetched post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    pub fragment: Fragment,
    pub language: String,
}

/// Translated title and body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_title: String,
    pub translated_body: String,
}

/// What was translated, into what, from what
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationMetadata {
    #[serde(rename = "title")]
    pub original_title: String,
    #[serde(rename = "markdownBody")]
    pub original_body: String,
    #[serde(rename = "targetLanguage")]
    pub target_language: String,
    #[serde(rename = "detectedTitleLanguage")]
    pub detected_title_language: String,
    #[serde(rename = "detectedContentLanguage")]
    pub detected_body_language: String,
}

/// The sole artifact returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub result: TranslationResult,
    pub metadata: TranslationMetadata,
    /// Informational notes, e.g. a fragment already being in the target language
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}
