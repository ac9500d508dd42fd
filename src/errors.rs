/*!
 * Error types for the postlingo pipeline.
 *
 * Each collaborator has its own error enum; `PipelineError` wraps them with the
 * stage that failed so callers can render the message verbatim.
 */

use std::fmt;

use thiserror::Error;

/// Errors that can occur when talking to the localization engine over HTTP
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the client timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised while fetching a post from the content host
#[derive(Error, Debug)]
pub enum FetchError {
    /// The content host answered with a non-success status, or never answered
    #[error("content host request failed{}: {message}", status_suffix(.status_code))]
    Remote {
        /// HTTP status code, absent when no response was received
        status_code: Option<u16>,
        /// Response body or transport error
        message: String,
    },

    /// Publication or post does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The post exists but has nothing to translate
    #[error("empty content: {0}")]
    EmptyContent(String),

    /// The GraphQL layer reported errors and returned no data
    #[error("GraphQL error: {0}")]
    Graphql(String),

    /// The response envelope could not be decoded
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

fn status_suffix(status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => format!(" with HTTP {}", code),
        None => String::new(),
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::MalformedResponse(error.to_string())
        } else {
            Self::Remote {
                status_code: error.status().map(|s| s.as_u16()),
                message: error.to_string(),
            }
        }
    }
}

/// Errors raised by language detection
#[derive(Error, Debug)]
pub enum DetectionError {
    /// The engine could not be reached or rejected the call
    #[error("engine error: {0}")]
    Engine(#[from] ProviderError),

    /// The engine answered without a locale
    #[error("engine returned an empty locale")]
    EmptyLocale,

    /// The engine answered with something that is not a locale code
    #[error("engine returned an invalid locale: {0}")]
    InvalidLocale(String),
}

/// Errors raised by title or body translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The engine could not be reached or rejected the call
    #[error("engine error: {0}")]
    Engine(#[from] ProviderError),

    /// The localized object is missing the field that was sent
    #[error("engine response is missing field '{0}'")]
    MissingField(String),

    /// The engine returned an empty translation
    #[error("engine returned an empty translation")]
    EmptyResult,
}

/// Which part of the post an operation worked on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    Title,
    Body,
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Title => write!(f, "title"),
            Fragment::Body => write!(f, "body"),
        }
    }
}

/// Pipeline states, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Validating,
    Fetching,
    DetectingTitle,
    DetectingBody,
    TranslatingTitle,
    TranslatingBody,
    Assembling,
    Done,
}

impl PipelineStage {
    pub fn detecting(fragment: Fragment) -> Self {
        match fragment {
            Fragment::Title => Self::DetectingTitle,
            Fragment::Body => Self::DetectingBody,
        }
    }

    pub fn translating(fragment: Fragment) -> Self {
        match fragment {
            Fragment::Title => Self::TranslatingTitle,
            Fragment::Body => Self::TranslatingBody,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Fetching => "fetching",
            Self::DetectingTitle => "detecting title language",
            Self::DetectingBody => "detecting body language",
            Self::TranslatingTitle => "translating title",
            Self::TranslatingBody => "translating body",
            Self::Assembling => "assembling",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Error returned by `TranslationPipeline`; every variant maps to the stage it aborted
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Bad, missing or unsupported input; raised before any network call
    #[error("[validating] invalid request: {0}")]
    Validation(String),

    /// The post could not be fetched
    #[error("[fetching] {0}")]
    Fetch(#[from] FetchError),

    /// Language detection failed for one fragment
    #[error("[{}] {source}", detecting_stage(.fragment))]
    Detection {
        fragment: Fragment,
        #[source]
        source: DetectionError,
    },

    /// Translation failed for one fragment
    #[error("[{}] {source}", translating_stage(.fragment))]
    Translation {
        fragment: Fragment,
        #[source]
        source: TranslationError,
    },

    /// The caller abandoned the request
    #[error("[{stage}] request cancelled")]
    Cancelled { stage: PipelineStage },
}

fn detecting_stage(fragment: &Fragment) -> PipelineStage {
    PipelineStage::detecting(*fragment)
}

fn translating_stage(fragment: &Fragment) -> PipelineStage {
    PipelineStage::translating(*fragment)
}

impl PipelineError {
    /// The stage in which the pipeline failed
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Validation(_) => PipelineStage::Validating,
            Self::Fetch(_) => PipelineStage::Fetching,
            Self::Detection { fragment, .. } => PipelineStage::detecting(*fragment),
            Self::Translation { fragment, .. } => PipelineStage::translating(*fragment),
            Self::Cancelled { stage } => *stage,
        }
    }
}
