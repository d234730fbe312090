//! Minimal OpenAI-compatible chat client.
//!
//! We only call chat.completions and request plain text.
//! Calls are instrumented and log model names, latencies, and token usage (not contents).
//!
//! NOTE: We never log the API key.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::backend::{BackendError, ChatBackend, ChatMessage};
use crate::config::ConfigError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Clone)]
pub struct OpenAI {
  client: reqwest::Client,
  api_key: String,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
}

impl OpenAI {
  /// Construct the client from environment variables.
  ///
  /// `OPENAI_API_KEY` is required; everything else has a default.
  pub fn from_env() -> Result<Self, ConfigError> {
    let api_key = std::env::var("OPENAI_API_KEY")
      .ok()
      .filter(|k| !k.trim().is_empty())
      .ok_or(ConfigError::MissingApiKey)?;
    let base_url = std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
    let temperature = std::env::var("OPENAI_TEMPERATURE")
      .ok()
      .and_then(|t| t.parse::<f32>().ok())
      .unwrap_or(DEFAULT_TEMPERATURE);
    let timeout = std::env::var("OPENAI_TIMEOUT_SECS")
      .ok()
      .and_then(|t| t.parse::<u64>().ok())
      .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Self::new(api_key, base_url, model, temperature, Duration::from_secs(timeout))
  }

  pub fn new(
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    timeout: Duration,
  ) -> Result<Self, ConfigError> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(ConfigError::HttpClient)?;

    Ok(Self {
      client,
      api_key,
      base_url: base_url.trim_end_matches('/').to_string(),
      model,
      temperature,
    })
  }
}

#[async_trait]
impl ChatBackend for OpenAI {
  fn model(&self) -> &str {
    &self.model
  }

  /// Plain-text chat completion.
  #[instrument(level = "info", skip(self, messages), fields(model = %self.model, messages = messages.len()))]
  async fn complete(&self, messages: &[ChatMessage]) -> Result<String, BackendError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: to_wire(messages),
      temperature: self.temperature,
    };

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, concat!("learning-assistant/", env!("CARGO_PKG_VERSION")))
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or(body);
      error!(elapsed = ?start.elapsed(), %status, "Model call failed");
      return Err(BackendError::Status { status: status.as_u16(), message });
    }

    let body: ChatCompletionResponse = res
      .json()
      .await
      .map_err(|e| BackendError::Decode(e.to_string()))?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.into_iter().next()
      .and_then(|c| c.message.content)
      .unwrap_or_default().trim().to_string();

    info!(elapsed = ?start.elapsed(), response_len = text.len(), "Model response received");
    Ok(text)
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

fn to_wire(messages: &[ChatMessage]) -> Vec<ChatMessageReq> {
  messages
    .iter()
    .map(|m| ChatMessageReq { role: m.role.as_openai_str().into(), content: m.content.clone() })
    .collect()
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
