//! Google Generative Language API client
//!
//! Endpoint: POST {base_url}/v1beta/models/{model}:generateContent
//! Auth: `x-goog-api-key` header. One blocking-style request per analysis;
//! no streaming, no retries.

use crate::advisor::SuggestionModel;
use crate::config::{ApiKey, ModelConfig};
use crate::errors::{CheckerError, ModelResponseError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Timeout for the lightweight model lookup used by `doctor`
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum characters of an error body kept in `ModelResponseError::Status`
const MAX_ERROR_BODY: usize = 512;

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    api_key: ApiKey,
}

impl GeminiClient {
    /// Create client from model configuration
    pub fn new(config: &ModelConfig, api_key: ApiKey) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(CheckerError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.trim_start_matches("models/").to_string(),
            temperature: config.temperature,
            api_key,
        })
    }

    fn model_url(&self) -> String {
        format!("{}/v1beta/models/{}", self.base_url, self.model)
    }

    /// Full `generateContent` URL
    pub fn generate_url(&self) -> String {
        format!("{}:generateContent", self.model_url())
    }

    /// Check that the key is accepted and the model exists
    pub async fn probe(&self) -> std::result::Result<(), ModelResponseError> {
        let response = self
            .client
            .get(self.model_url())
            .header(API_KEY_HEADER, self.api_key.expose())
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| ModelResponseError::from_reqwest(&e))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SuggestionModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> std::result::Result<String, ModelResponseError> {
        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: user }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        debug!(model = %self.model, "sending generateContent request");

        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelResponseError::from_reqwest(&e))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelResponseError::InvalidJson(e.to_string()))?;

        body.into_text()
    }
}

async fn status_error(response: reqwest::Response) -> ModelResponseError {
    let status = response.status().as_u16();
    let mut body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        body.truncate(cut);
    }
    warn!(status, "model API returned an error status");
    ModelResponseError::Status { status, body }
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// generateContent response body (fields we read)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    pub(crate) fn into_text(self) -> std::result::Result<String, ModelResponseError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(ModelResponseError::Blocked(reason));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_default();
            if matches!(reason.as_str(), "SAFETY" | "RECITATION" | "BLOCKLIST") {
                return Err(ModelResponseError::Blocked(reason));
            }
            return Err(ModelResponseError::EmptyResponse);
        }

        Ok(text)
    }
}
