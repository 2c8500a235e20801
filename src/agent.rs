//! LLM agent module for completions.
//!
//! Talks to Groq's OpenAI-compatible chat completion endpoint with reqwest.

use crate::config::Config;
use crate::summary::ModelId;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("missing API key, set GROQ_API_KEY")]
    MissingApiKey,
    #[error("LLM request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API key rejected ({0})")]
    Unauthorized(StatusCode),
    #[error("rate limited by the LLM provider, try again later")]
    RateLimited,
    #[error("LLM API error {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("failed to parse response: {0}")]
    InvalidResponse(String),
}

/// Produces a completion for a prompt with the chosen model.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, model: ModelId, prompt: &str) -> Result<String, InferenceError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the Groq completion API
pub struct GroqClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    temperature: Option<f32>,
}

impl GroqClient {
    /// Build a client from configuration. A missing key is only reported when a
    /// completion is requested.
    pub fn from_config(config: &Config) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.agent.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.agent.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key().ok().map(str::to_string),
            temperature: config.agent.temperature,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

#[async_trait]
impl CompletionModel for GroqClient {
    async fn complete(&self, model: ModelId, prompt: &str) -> Result<String, InferenceError> {
        let api_key = self.api_key.as_deref().ok_or(InferenceError::MissingApiKey)?;

        let request = ChatRequest {
            model: model.as_str(),
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        debug!(%model, prompt_chars = prompt.chars().count(), "requesting completion");
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(%model, %status, "completion request rejected");
        }
        parse_completion(status, &body)
    }
}

/// Map an HTTP status and body from the completion endpoint to generated text
fn parse_completion(status: StatusCode, body: &str) -> Result<String, InferenceError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return Err(InferenceError::Unauthorized(status))
        }
        StatusCode::TOO_MANY_REQUESTS => return Err(InferenceError::RateLimited),
        s if !s.is_success() => {
            return Err(InferenceError::Api {
                status,
                body: body.trim().to_string(),
            })
        }
        _ => {}
    }

    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| InferenceError::InvalidResponse(format!("{}: {}", e, body)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| InferenceError::InvalidResponse("response contained no choices".to_string()))
}
