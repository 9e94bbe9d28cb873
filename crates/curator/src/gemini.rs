use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ModelError, ModelResult};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The external model capability: texts in, vectors or generated text out.
/// The curation pipeline only depends on this trait, so tests can swap in
/// a scripted mock.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Embeds one chunk of texts (at most the provider batch limit),
    /// returning one vector per input text in order.
    async fn embed_chunk(&self, texts: &[String]) -> ModelResult<Vec<Vec<f32>>>;

    /// Generates text for a prompt.
    async fn generate(&self, prompt: &str) -> ModelResult<String>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    content: RequestContent<'a>,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f32>,
}

/// Gemini API client. The generation model can permanently switch to the
/// configured fallback when the primary returns 404.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    generation_model: Mutex<String>,
    fallback_model: Mutex<Option<String>>,
    embedding_model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        generation_model: String,
        fallback_model: Option<String>,
        embedding_model: String,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            generation_model: Mutex::new(generation_model),
            fallback_model: Mutex::new(fallback_model),
            embedding_model,
        })
    }

    fn current_model(&self) -> String {
        self.generation_model.lock().unwrap().clone()
    }

    /// Switches to the fallback model if one is still available.
    fn switch_to_fallback(&self) -> bool {
        let mut fallback = self.fallback_model.lock().unwrap();
        match fallback.take() {
            Some(model) => {
                warn!("generation model not found, switching to {model} permanently");
                *self.generation_model.lock().unwrap() = model;
                true
            }
            None => false,
        }
    }

    async fn post_generate(&self, model: &str, prompt: &str) -> ModelResult<String> {
        let url = format!("{API_BASE}/{model}:generateContent?key={}", self.api_key);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let decoded: GenerateResponse = response.json().await?;
        let text: String = decoded
            .candidates
            .first()
            .map(|c| c.content.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn embed_chunk(&self, texts: &[String]) -> ModelResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{API_BASE}/{}:batchEmbedContents?key={}",
            self.embedding_model, self.api_key
        );
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedRequest {
                    model: &self.embedding_model,
                    content: RequestContent {
                        parts: vec![RequestPart { text }],
                    },
                })
                .collect(),
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let decoded: BatchEmbedResponse = response.json().await?;
        if decoded.embeddings.len() != texts.len() {
            return Err(ModelError::Service {
                status: status.as_u16(),
                message: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    decoded.embeddings.len()
                ),
            });
        }
        Ok(decoded.embeddings.into_iter().map(|e| e.values).collect())
    }

    async fn generate(&self, prompt: &str) -> ModelResult<String> {
        let model = self.current_model();
        match self.post_generate(&model, prompt).await {
            Err(ModelError::NotFound(msg)) => {
                if self.switch_to_fallback() {
                    self.post_generate(&self.current_model(), prompt).await
                } else {
                    Err(ModelError::NotFound(msg))
                }
            }
            other => other,
        }
    }
}

/// Maps an unsuccessful HTTP response to the error taxonomy. A 429 that
/// mentions a daily/per-day limit is quota exhaustion rather than a
/// transient rate limit.
fn classify_status(status: StatusCode, body: String) -> ModelError {
    match status.as_u16() {
        401 | 403 => ModelError::Auth(body),
        400 => ModelError::InvalidRequest(body),
        404 => ModelError::NotFound(body),
        429 if body.contains("PerDay") || body.contains("Daily") => {
            ModelError::QuotaExceeded(body)
        }
        s => ModelError::Service {
            status: s,
            message: body,
        },
    }
}

/// Strips markdown code fences from model output before JSON decoding.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}
