/*!
 * # postlingo - blog post translation
 *
 * A Rust library that fetches a published blog post from a GraphQL content
 * host, detects the language of its title and body, and translates both into
 * a requested target language through a localization engine.
 *
 * ## Features
 *
 * - Fetch title and markdown body by publication host and post slug
 * - Per-fragment language detection
 * - Markdown-safe body translation through object localization
 * - Stage-tagged errors and cooperative cancellation
 * - BCP-47 style locale codes backed by ISO 639 lookups
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The translation pipeline:
 *   - `translation::model`: Request, intermediate and output data
 *   - `translation::detector`: Language detection
 *   - `translation::translator`: Title and body translation
 *   - `translation::pipeline`: The stage-by-stage orchestrator
 * - `app_controller`: Main application controller
 * - `language_utils`: Locale code utilities
 * - `providers`: Content host and localization engine clients:
 *   - `providers::hashnode`: GraphQL content host client
 *   - `providers::lingo`: Localization engine client
 *   - `providers::mock`: Deterministic test doubles
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, OutputFormat};
pub use translation::{PipelineOutput, RequestInput, TranslationPipeline};
pub use language_utils::{language_codes_match, normalize_locale, get_language_name};
pub use errors::{FetchError, PipelineError, PipelineStage, ProviderError, TranslationError};
