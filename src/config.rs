//! Loading assistant configuration (prompts + session settings) from TOML.
//!
//! Backend connection settings come from the environment (see `OpenAI::from_env`);
//! this file only covers what an operator may want to tune per deployment.

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::prompts::Prompts;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AssistantConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub session: SessionSettings,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
  /// Answers equal to one of these (case-insensitive, trailing punctuation ignored) skip the question.
  pub skip_words: Vec<String>,
}

impl Default for SessionSettings {
  fn default() -> Self {
    Self { skip_words: vec!["skip".into()] }
  }
}

/// Environment problems detected before the session starts.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
  #[error("OPENAI_API_KEY is not set")]
  MissingApiKey,
  #[error("failed to build HTTP client: {0}")]
  HttpClient(#[source] reqwest::Error),
}

impl AssistantConfig {
  /// Load from ASSISTANT_CONFIG_PATH. A missing variable, unreadable file or
  /// bad TOML all fall back to defaults.
  pub fn from_env() -> Self {
    match std::env::var("ASSISTANT_CONFIG_PATH") {
      Ok(path) => Self::load(&path).unwrap_or_default(),
      Err(_) => Self::default(),
    }
  }

  pub fn load(path: &str) -> Option<Self> {
    match std::fs::read_to_string(path) {
      Ok(s) => match toml::from_str::<AssistantConfig>(&s) {
        Ok(cfg) => {
          info!(target: "learning_assistant", %path, "Loaded assistant config (TOML)");
          Some(cfg)
        }
        Err(e) => {
          error!(target: "learning_assistant", %path, error = %e, "Failed to parse TOML config");
          None
        }
      },
      Err(e) => {
        error!(target: "learning_assistant", %path, error = %e, "Failed to read TOML config file");
        None
      }
    }
  }
}
