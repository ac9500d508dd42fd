/*!
 * Blog post translation pipeline.
 *
 * One run moves through
 * `Validating → Fetching → DetectingTitle → DetectingBody → TranslatingTitle
 * → TranslatingBody → Assembling → Done`; any failure aborts the run and is
 * returned tagged with its stage. Each stage consumes only the previous
 * stage's output, and a run owns all of its data, so concurrent runs need no
 * coordination.
 *
 * With concurrency enabled the two detections, and then the two
 * translations, run as joined pairs instead of one after the other.
 */

use log::{debug, info, warn};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::errors::{Fragment, PipelineError, PipelineStage};
use crate::language_utils;
use crate::providers::{ContentSource, LocalizationEngine};

use super::detector::LanguageDetector;
use super::model::{
    DetectionResult, FetchedContent, PipelineOutput, RequestInput, TranslationMetadata,
    TranslationResult,
};
use super::translator::ContentTranslator;

/// Tracks the stage a run is in, so cancellation can report it
#[derive(Debug)]
struct StageTracker {
    current: Mutex<PipelineStage>,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            current: Mutex::new(PipelineStage::Validating),
        }
    }

    fn enter(&self, stage: PipelineStage) {
        debug!("Pipeline stage: {}", stage);
        if let Ok(mut current) = self.current.lock() {
            *current = stage;
        }
    }

    /// Move from `finished` to `next`, unless the run already left `finished`
    ///
    /// In a joined pair the title stage is entered first; when the title
    /// half completes while the body half is still pending, the body stage
    /// becomes current.
    fn hand_over(&self, finished: PipelineStage, next: PipelineStage) {
        if let Ok(mut current) = self.current.lock() {
            if *current == finished {
                debug!("Pipeline stage: {}", next);
                *current = next;
            }
        }
    }

    fn current(&self) -> PipelineStage {
        self.current
            .lock()
            .map(|stage| *stage)
            .unwrap_or(PipelineStage::Validating)
    }
}

/// Orchestrates fetch, detection, translation and assembly for one post
#[derive(Debug, Clone)]
pub struct TranslationPipeline {
    source: Arc<dyn ContentSource>,
    detector: LanguageDetector,
    translator: ContentTranslator,
    supported_languages: Vec<String>,
    concurrent: bool,
}

impl TranslationPipeline {
    /// Build a pipeline whose detector and translator share one engine
    pub fn new(
        source: Arc<dyn ContentSource>,
        engine: Arc<dyn LocalizationEngine>,
        supported_languages: Vec<String>,
    ) -> Self {
        Self::from_parts(
            source,
            LanguageDetector::new(Arc::clone(&engine)),
            ContentTranslator::new(engine),
            supported_languages,
        )
    }

    pub fn from_parts(
        source: Arc<dyn ContentSource>,
        detector: LanguageDetector,
        translator: ContentTranslator,
        supported_languages: Vec<String>,
    ) -> Self {
        Self {
            source,
            detector,
            translator,
            supported_languages,
            concurrent: false,
        }
    }

    /// Run title and body work as joined pairs
    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn supported_languages(&self) -> &[String] {
        &self.supported_languages
    }

    /// Translate one post; all-or-nothing
    pub async fn run(&self, input: &RequestInput) -> Result<PipelineOutput, PipelineError> {
        let tracker = StageTracker::new();
        self.execute(input, &tracker).await
    }

    /// Like `run`, but gives up as soon as `cancel` completes
    ///
    /// In-flight calls are dropped, and the error names the stage that was running.
    /// With concurrency enabled both halves of a pair are in flight together;
    /// the title stage is reported until the title half completes, then the
    /// body stage.
    pub async fn run_until<C>(
        &self,
        input: &RequestInput,
        cancel: C,
    ) -> Result<PipelineOutput, PipelineError>
    where
        C: Future<Output = ()>,
    {
        let tracker = StageTracker::new();
        tokio::select! {
            result = self.execute(input, &tracker) => result,
            _ = cancel => {
                let stage = tracker.current();
                warn!("Request for '{}' cancelled while {}", input.post_slug(), stage);
                Err(PipelineError::Cancelled { stage })
            }
        }
    }

    async fn execute(
        &self,
        input: &RequestInput,
        tracker: &StageTracker,
    ) -> Result<PipelineOutput, PipelineError> {
        let start_time = Instant::now();

        tracker.enter(PipelineStage::Validating);
        input.validate(&self.supported_languages)?;

        tracker.enter(PipelineStage::Fetching);
        info!(
            "Fetching post '{}' from '{}'",
            input.post_slug(),
            input.publication_host()
        );
        let content = self
            .source
            .fetch(input.publication_host(), input.post_slug())
            .await?;

        let (title_language, body_language) = self.detect_languages(&content, tracker).await?;
        let notes = same_language_notes(
            input.target_language(),
            &[&title_language, &body_language],
        );

        let result = self
            .translate(
                &content,
                &title_language.language,
                &body_language.language,
                input.target_language(),
                tracker,
            )
            .await?;

        tracker.enter(PipelineStage::Assembling);
        let output = PipelineOutput {
            result,
            metadata: TranslationMetadata {
                original_title: content.title,
                original_body: content.markdown_body,
                target_language: input.target_language().to_string(),
                detected_title_language: title_language.language,
                detected_body_language: body_language.language,
            },
            notes,
        };

        tracker.enter(PipelineStage::Done);
        info!(
            "Translated '{}' into {} in {:.2}s",
            input.post_slug(),
            input.target_language(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(output)
    }

    async fn detect_fragment(
        &self,
        fragment: Fragment,
        text: &str,
    ) -> Result<DetectionResult, PipelineError> {
        let language = self
            .detector
            .detect(text)
            .await
            .map_err(|source| PipelineError::Detection { fragment, source })?;
        Ok(DetectionResult { fragment, language })
    }

    async fn detect_languages(
        &self,
        content: &FetchedContent,
        tracker: &StageTracker,
    ) -> Result<(DetectionResult, DetectionResult), PipelineError> {
        if self.concurrent {
            tracker.enter(PipelineStage::DetectingTitle);
            return tokio::try_join!(
                async {
                    let title = self.detect_fragment(Fragment::Title, &content.title).await;
                    tracker.hand_over(PipelineStage::DetectingTitle, PipelineStage::DetectingBody);
                    title
                },
                self.detect_fragment(Fragment::Body, &content.markdown_body),
            );
        }

        tracker.enter(PipelineStage::DetectingTitle);
        let title = self.detect_fragment(Fragment::Title, &content.title).await?;
        tracker.enter(PipelineStage::DetectingBody);
        let body = self
            .detect_fragment(Fragment::Body, &content.markdown_body)
            .await?;
        Ok((title, body))
    }

    async fn translate_title(
        &self,
        title: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, PipelineError> {
        self.translator
            .translate_title(title, source_lang, target_lang)
            .await
            .map_err(|source| PipelineError::Translation {
                fragment: Fragment::Title,
                source,
            })
    }

    async fn translate_body(
        &self,
        markdown: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, PipelineError> {
        self.translator
            .translate_body(markdown, source_lang, target_lang)
            .await
            .map_err(|source| PipelineError::Translation {
                fragment: Fragment::Body,
                source,
            })
    }

    async fn translate(
        &self,
        content: &FetchedContent,
        title_lang: &str,
        body_lang: &str,
        target_lang: &str,
        tracker: &StageTracker,
    ) -> Result<TranslationResult, PipelineError> {
        let (translated_title, translated_body) = if self.concurrent {
            tracker.enter(PipelineStage::TranslatingTitle);
            tokio::try_join!(
                async {
                    let title = self
                        .translate_title(&content.title, title_lang, target_lang)
                        .await;
                    tracker.hand_over(PipelineStage::TranslatingTitle, PipelineStage::TranslatingBody);
                    title
                },
                self.translate_body(&content.markdown_body, body_lang, target_lang),
            )?
        } else {
            tracker.enter(PipelineStage::TranslatingTitle);
            let title = self
                .translate_title(&content.title, title_lang, target_lang)
                .await?;
            tracker.enter(PipelineStage::TranslatingBody);
            let body = self
                .translate_body(&content.markdown_body, body_lang, target_lang)
                .await?;
            (title, body)
        };

        Ok(TranslationResult {
            translated_title,
            translated_body,
        })
    }
}

/// Notes for fragments already written in the target language
///
/// These are informational only: translation still runs for them.
fn same_language_notes(target_language: &str, detections: &[&DetectionResult]) -> Vec<String> {
    detections
        .iter()
        .filter(|d| language_utils::language_codes_match(&d.language, target_language))
        .map(|d| {
            let note = format!(
                "{} is already in the target language '{}'; translating anyway",
                d.fragment, target_language
            );
            info!("{}", note);
            note
        })
        .collect()
}
