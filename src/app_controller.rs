use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::PipelineError;
use crate::language_utils;
use crate::providers::hashnode::Hashnode;
use crate::providers::lingo::LingoEngine;
use crate::providers::{ContentSource, LocalizationEngine};
use crate::translation::detector::LanguageDetector;
use crate::translation::model::{PipelineOutput, RequestInput};
use crate::translation::pipeline::TranslationPipeline;
use crate::translation::translator::ContentTranslator;

// @module: Application controller for post translation

/// How a finished translation is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Main application controller: owns one pipeline built from configuration
pub struct Controller {
    // @field: App configuration
    config: Config,
    pipeline: TranslationPipeline,
}

impl Controller {
    // @method: Create a controller talking to the configured content host and engine
    pub fn with_config(config: Config) -> Result<Self> {
        let source: Arc<dyn ContentSource> = Arc::new(
            Hashnode::new(&config.content_source).context("Failed to create content source")?,
        );
        let engine: Arc<dyn LocalizationEngine> = Arc::new(
            LingoEngine::new(&config.engine).context("Failed to create localization engine")?,
        );
        Ok(Self::with_collaborators(config, source, engine))
    }

    /// Create a controller around arbitrary collaborators
    pub fn with_collaborators(
        config: Config,
        source: Arc<dyn ContentSource>,
        engine: Arc<dyn LocalizationEngine>,
    ) -> Self {
        let pipeline = TranslationPipeline::from_parts(
            source,
            LanguageDetector::new(Arc::clone(&engine)),
            ContentTranslator::new(engine).with_fast_title(config.engine.fast_title),
            config.supported_languages.clone(),
        )
        .with_concurrency(config.concurrent_detection);

        Self { config, pipeline }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate one post, keeping the typed pipeline error
    pub async fn translate(
        &self,
        host: &str,
        slug: &str,
        target: &str,
    ) -> Result<PipelineOutput, PipelineError> {
        let input = RequestInput::new(host, slug, target);
        self.pipeline.run(&input).await
    }

    /// Translate one post
    ///
    /// Pipeline failures are wrapped without added context, so
    /// `downcast_ref::<PipelineError>()` on the error always succeeds for them.
    pub async fn run(&self, host: &str, slug: &str, target: &str) -> Result<PipelineOutput> {
        Ok(self.translate(host, slug, target).await?)
    }

    /// Translate one post with a spinner, abandoning it when `cancel` completes
    pub async fn run_with_progress<C>(
        &self,
        host: &str,
        slug: &str,
        target: &str,
        cancel: C,
    ) -> Result<PipelineOutput>
    where
        C: Future<Output = ()>,
    {
        let start_time = std::time::Instant::now();
        let input = RequestInput::new(host, slug, target);

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(format!("Translating '{}' into {}", input.post_slug(), input.target_language()));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let result = self.pipeline.run_until(&input, cancel).await;
        spinner.finish_and_clear();

        let output = result?;
        info!(
            "Translation completed in {}.",
            Self::format_duration(start_time.elapsed())
        );
        Ok(output)
    }

    /// Render an output for the terminal
    pub fn render(output: &PipelineOutput, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(output).context("Failed to serialize output to JSON")
            }
            OutputFormat::Text => Ok(Self::render_text(output)),
        }
    }

    fn render_text(output: &PipelineOutput) -> String {
        let metadata = &output.metadata;
        let mut text = String::new();
        text.push_str(&format!("# {}\n\n", output.result.translated_title));
        text.push_str(&output.result.translated_body);
        if !output.result.translated_body.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&format!(
            "\n---\noriginal title: {}\ntitle language: {}\nbody language: {}\ntarget language: {}\n",
            metadata.original_title,
            Self::describe_language(&metadata.detected_title_language),
            Self::describe_language(&metadata.detected_body_language),
            Self::describe_language(&metadata.target_language),
        ));
        for note in &output.notes {
            text.push_str(&format!("note: {}\n", note));
        }
        text
    }

    fn describe_language(code: &str) -> String {
        match language_utils::get_language_name(code) {
            Ok(name) => format!("{} ({})", code, name),
            Err(_) => code.to_string(),
        }
    }

    /// One line per configured target language, with its English name
    ///
    /// Needs only the configuration, so no clients are built.
    pub fn supported_languages_listing(config: &Config) -> Vec<String> {
        debug!(
            "Listing {} supported languages",
            config.supported_languages.len()
        );
        config
            .supported_languages
            .iter()
            .map(|code| Self::describe_language(code))
            .collect()
    }

    // @formats: Duration as a short human string
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
