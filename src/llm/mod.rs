// src/llm/mod.rs
//
// The LLM capability consumed by the LLM-backed extractors. Extractors only see
// `TextGenerator`; `GeminiClient` is the production backend.
use crate::utils::error::{LlmError, ResumeError};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// --- Constants ---
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// "Given a prompt, return generated text or fail."
///
/// Failures are not retried here; a caller wanting timeouts or retries
/// imposes them at this boundary.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

// --- Wire Types ---
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

// --- Client ---

/// Blocking client for the Google Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// The key is passed in explicitly; this type never reads the environment.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ResumeError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ResumeError::Configuration(
                "Gemini API key is required. Set GEMINI_API_KEY or pass --api-key.".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ResumeError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        let model = model.into();
        tracing::info!("GeminiClient configured with model: {}", model);

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.model)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?; // Propagates reqwest::Error as LlmError::Http

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().unwrap_or_default();
            // Try to parse the service's error message
            let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            tracing::error!("Gemini API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text()?;
        let parsed: GenerateResponse = serde_json::from_str(&raw)?;
        let text = parsed.text().ok_or(LlmError::EmptyContent)?;

        tracing::debug!("Gemini response length: {} characters", text.chars().count());
        Ok(text)
    }
}
