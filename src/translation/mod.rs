/*!
 * Blog post translation.
 *
 * - `model`: data carried through one request
 * - `detector`: language detection for a text fragment
 * - `translator`: title and body translation
 * - `pipeline`: the orchestrator tying fetch, detection and translation together
 */

// Re-export main types for easier usage
pub use self::detector::LanguageDetector;
pub use self::model::{
    DetectionResult, FetchedContent, PipelineOutput, RequestInput, TranslationMetadata,
    TranslationResult,
};
pub use self::pipeline::TranslationPipeline;
pub use self::translator::ContentTranslator;

// Submodules
pub mod detector;
pub mod model;
pub mod pipeline;
pub mod translator;
