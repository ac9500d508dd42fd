use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, error};
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use crate::app_config::EngineConfig;
use crate::errors::ProviderError;
use crate::providers::{LocalizableObject, LocalizationEngine, LocalizationParams};

/// Field name used when a single string goes through object localization
const TEXT_FIELD: &str = "text";

/// Lingo.dev engine client
pub struct LingoEngine {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Engine base URL
    endpoint: String,
    /// Maximum keys per chunk
    batch_size: usize,
    /// Word count after which a chunk is closed
    ideal_batch_item_size: usize,
}

/// Locale pair as sent on the wire
#[derive(Debug, Serialize)]
struct WireLocale<'a> {
    source: &'a str,
    target: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireParams<'a> {
    workflow_id: &'a str,
    fast: bool,
}

/// Body of a `/i18n` request
#[derive(Debug, Serialize)]
struct LocalizeRequest<'a> {
    params: WireParams<'a>,
    locale: WireLocale<'a>,
    data: &'a LocalizableObject,
}

/// Body of a `/i18n` response
#[derive(Debug, Deserialize)]
struct LocalizeResponse {
    #[serde(default)]
    data: Option<LocalizableObject>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    locale: Option<String>,
}

/// One engine "connection": a workflow id scoped to a single capability call.
///
/// Released when dropped, which covers success, error and a cancelled future.
struct EngineSession<'a> {
    engine: &'a LingoEngine,
    workflow_id: String,
    operation: &'static str,
}

impl<'a> EngineSession<'a> {
    fn open(engine: &'a LingoEngine, operation: &'static str) -> Self {
        let workflow_id = Uuid::new_v4().to_string();
        debug!("Opened engine session {} for {}", workflow_id, operation);
        Self {
            engine,
            workflow_id,
            operation,
        }
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}/{}", self.engine.endpoint.trim_end_matches('/'), path);
        let response = self
            .engine
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .header(header::AUTHORIZATION, format!("Bearer {}", self.engine.api_key))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("Engine API error ({}) during {}: {}", status, self.operation, error_text);
        Err(status_error(status, error_text))
    }

    async fn recognize(&self, text: &str) -> Result<String, ProviderError> {
        let response = self.post("recognize", &RecognizeRequest { text }).await?;
        let body = response
            .json::<RecognizeResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(body.locale.unwrap_or_default())
    }

    async fn localize_chunk(
        &self,
        chunk: &LocalizableObject,
        params: &LocalizationParams,
    ) -> Result<LocalizableObject, ProviderError> {
        let request = LocalizeRequest {
            params: WireParams {
                workflow_id: &self.workflow_id,
                fast: params.fast,
            },
            locale: WireLocale {
                source: &params.source_locale,
                target: &params.target_locale,
            },
            data: chunk,
        };

        let response = self.post("i18n", &request).await?;
        let body = response
            .json::<LocalizeResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        match (body.data, body.error) {
            (Some(data), _) => Ok(data),
            (None, Some(message)) => Err(ProviderError::RequestFailed(message)),
            (None, None) => Ok(LocalizableObject::new()),
        }
    }
}

impl Drop for EngineSession<'_> {
    fn drop(&mut self) {
        debug!("Closed engine session {} ({})", self.workflow_id, self.operation);
    }
}

fn status_error(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::AuthenticationError(message)
        }
        s if s.is_server_error() => ProviderError::ApiError {
            status_code: s.as_u16(),
            message: format!(
                "Server error: {}. This may be due to temporary service issues.",
                message
            ),
        },
        s => ProviderError::ApiError {
            status_code: s.as_u16(),
            message,
        },
    }
}

/// Count whitespace separated words in every string leaf of `value`
fn count_words(value: &Value) -> usize {
    match value {
        Value::String(s) => s.split_whitespace().count(),
        Value::Array(items) => items.iter().map(count_words).sum(),
        Value::Object(map) => map.values().map(count_words).sum(),
        _ => 0,
    }
}

/// Split a payload into chunks of at most `batch_size` keys, closing a chunk
/// early once its word count exceeds `ideal_item_size`
fn extract_payload_chunks(
    payload: LocalizableObject,
    batch_size: usize,
    ideal_item_size: usize,
) -> Vec<LocalizableObject> {
    let mut chunks = Vec::new();
    let mut current = LocalizableObject::new();
    let mut current_words = 0;

    for (key, value) in payload {
        current_words += count_words(&value);
        current.insert(key, value);

        if current_words > ideal_item_size || current.len() >= batch_size {
            chunks.push(std::mem::take(&mut current));
            current_words = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

impl LingoEngine {
    /// Create a new engine client from configuration
    pub fn new(config: &EngineConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            batch_size: config.batch_size.max(1),
            ideal_batch_item_size: config.ideal_batch_item_size.max(1),
        })
    }
}

impl std::fmt::Debug for LingoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LingoEngine")
            .field("api_key", &"***")
            .field("endpoint", &self.endpoint)
            .field("batch_size", &self.batch_size)
            .field("ideal_batch_item_size", &self.ideal_batch_item_size)
            .finish()
    }
}

#[async_trait]
impl LocalizationEngine for LingoEngine {
    async fn recognize_locale(&self, text: &str) -> Result<String, ProviderError> {
        let session = EngineSession::open(self, "recognize");
        session.recognize(text).await
    }

    async fn quick_translate(
        &self,
        text: &str,
        params: &LocalizationParams,
    ) -> Result<String, ProviderError> {
        let mut payload = LocalizableObject::new();
        payload.insert(TEXT_FIELD.to_string(), Value::String(text.to_string()));

        let session = EngineSession::open(self, "quick translate");
        let mut localized = session.localize_chunk(&payload, params).await?;

        match localized.remove(TEXT_FIELD) {
            Some(Value::String(translated)) => Ok(translated),
            _ => Err(ProviderError::ParseError(format!(
                "Response is missing the '{}' field",
                TEXT_FIELD
            ))),
        }
    }

    async fn localize_object(
        &self,
        object: LocalizableObject,
        params: &LocalizationParams,
        concurrent: bool,
    ) -> Result<LocalizableObject, ProviderError> {
        let chunks = extract_payload_chunks(object, self.batch_size, self.ideal_batch_item_size);
        debug!(
            "Localizing object in {} chunk(s), concurrent: {}",
            chunks.len(),
            concurrent
        );

        let session = EngineSession::open(self, "localize object");
        let localized_chunks = if concurrent {
            try_join_all(chunks.iter().map(|chunk| session.localize_chunk(chunk, params))).await?
        } else {
            let mut results = Vec::with_capacity(chunks.len());
            for chunk in &chunks {
                results.push(session.localize_chunk(chunk, params).await?);
            }
            results
        };

        let mut merged = LocalizableObject::new();
        for chunk in localized_chunks {
            merged.extend(chunk);
        }
        Ok(merged)
    }

    fn provider_name(&self) -> &str {
        "Lingo.dev"
    }
}
