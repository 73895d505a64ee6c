//! Gemini Provider Implementation
//!
//! Chat provider for Google's Gemini API.
//!
//! # Gemini API
//!
//! - `POST /models/{model}:generateContent` - one request per user turn,
//!   carrying the system instruction and the whole conversation so far
//!
//! The API is stateless; [`GeminiChat`] keeps the turn history client-side
//! and replays it with every request. A turn is recorded only once the
//! provider has answered it, so failed turns are never replayed.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::BackendError;
use super::traits::{ChatConfig, ChatHandle, ChatProvider};
use crate::messages::ChatMessage;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables searched for the API key, in order
pub const API_KEY_VARS: &[&str] = &["API_KEY", "GEMINI_API_KEY"];

/// Default HTTP request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const PROVIDER_NAME: &str = "Gemini";

/// Gemini provider
#[derive(Clone)]
pub struct GeminiProvider {
    /// API key, if one was found
    api_key: Option<String>,
    /// API root, without trailing slash
    base_url: String,
    /// HTTP client shared by every chat this provider opens
    http_client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider with an optional API key and the default endpoint
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client: build_client(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    /// Create from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create using a custom variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // A blank variable does not hide the next one
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|name| lookup(name).filter(|value| !value.trim().is_empty()));
        Self::new(api_key)
    }

    /// Override the API root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the HTTP request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = build_client(timeout);
        self
    }

    /// Whether a non-blank API key is available
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    /// Get the API root
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get generateContent endpoint URL for a model
    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ChatProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn create_chat(&self, config: &ChatConfig) -> anyhow::Result<Box<dyn ChatHandle>> {
        let api_key = self
            .credential()
            .ok_or_else(|| BackendError::MissingCredential {
                variables: API_KEY_VARS.join(", "),
            })?
            .to_string();

        if config.model.trim().is_empty() {
            anyhow::bail!("model identifier must not be empty");
        }

        tracing::debug!(model = %config.model, base_url = %self.base_url, "Opening Gemini chat");

        Ok(Box::new(GeminiChat {
            http_client: self.http_client.clone(),
            url: self.generate_url(&config.model),
            api_key,
            config: config.clone(),
            history: Vec::new(),
        }))
    }
}

/// An open Gemini conversation
pub struct GeminiChat {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
    config: ChatConfig,
    history: Vec<ChatMessage>,
}

impl GeminiChat {
    /// Build the request body for the next user turn
    fn build_request<'a>(&'a self, text: &'a str) -> GenerateContentRequest<'a> {
        let mut contents: Vec<Content<'a>> = self
            .history
            .iter()
            .map(|msg| Content {
                role: Some(msg.role().as_str()),
                parts: vec![Part { text: msg.text() }],
            })
            .collect();
        contents.push(Content {
            role: Some("user"),
            parts: vec![Part { text }],
        });

        let system_instruction = Some(self.config.system_instruction.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| Content {
                role: None,
                parts: vec![Part { text: s }],
            });

        GenerateContentRequest {
            system_instruction,
            contents,
        }
    }
}

#[async_trait]
impl ChatHandle for GeminiChat {
    fn model(&self) -> &str {
        &self.config.model
    }

    fn system_instruction(&self) -> &str {
        &self.config.system_instruction
    }

    fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    async fn send_message(&mut self, text: &str) -> anyhow::Result<String> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.build_request(text))
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                provider: PROVIDER_NAME.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status.as_u16(), &body).into());
        }

        let data: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|e| BackendError::InvalidResponse {
                    provider: PROVIDER_NAME.to_string(),
                    reason: e.to_string(),
                })?;

        let reply = extract_text(data)?;

        self.history.push(ChatMessage::user(text));
        self.history.push(ChatMessage::model(reply.clone()));

        tracing::debug!(
            model = %self.config.model,
            turns = self.history.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Gemini reply received"
        );

        Ok(reply)
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
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

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Join the text parts of the first candidate, skipping thought summaries
fn extract_text(response: GenerateContentResponse) -> Result<String, BackendError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|part| !part.thought)
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(BackendError::EmptyResponse {
            provider: PROVIDER_NAME.to_string(),
        });
    }
    Ok(text)
}

fn map_http_error(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| {
            let msg = envelope.error.message.unwrap_or_else(|| body.to_string());
            match envelope.error.status {
                Some(status_text) if !status_text.is_empty() => format!("{status_text}: {msg}"),
                _ => msg,
            }
        })
        .unwrap_or_else(|| body.to_string());

    BackendError::Http {
        provider: PROVIDER_NAME.to_string(),
        status,
        message,
    }
}
