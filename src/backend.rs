//! Text-generation backend seam.
//!
//! The core only needs one capability: turn an ordered list of role-tagged
//! messages into a completion. `OpenAI` in `openai.rs` is the production adapter;
//! tests plug in a scripted backend.

use async_trait::async_trait;
use thiserror::Error;

/// Who is speaking in a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
  System,
  Human,
}

impl ChatRole {
  /// Role name on the OpenAI chat-completions wire.
  pub fn as_openai_str(self) -> &'static str {
    match self {
      ChatRole::System => "system",
      ChatRole::Human => "user",
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
  pub role: ChatRole,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: ChatRole::System, content: content.into() }
  }

  pub fn human(content: impl Into<String>) -> Self {
    Self { role: ChatRole::Human, content: content.into() }
  }
}

/// Failures of the generation backend. Never retried by the core.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
  #[error("backend request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("backend returned HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("backend response could not be decoded: {0}")]
  Decode(String),
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
  /// Model identifier, for logs.
  fn model(&self) -> &str;

  /// One blocking round-trip: messages in, completion text out.
  async fn complete(&self, messages: &[ChatMessage]) -> Result<String, BackendError>;
}

#[cfg(any(test, feature = "test-util"))]
pub mod scripted {
  //! In-memory backend that replays canned replies and records every request.

  use std::collections::VecDeque;
  use std::sync::Mutex;

  use super::*;

  #[derive(Default)]
  pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
  }

  impl ScriptedBackend {
    pub fn new<I, S>(replies: I) -> Self
    where
      I: IntoIterator<Item = S>,
      S: Into<String>,
    {
      Self {
        replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
        calls: Mutex::new(Vec::new()),
      }
    }

    pub fn push_error(&self, err: BackendError) {
      self.replies.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
      self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
      self.calls.lock().unwrap().len()
    }
  }

  #[async_trait]
  impl ChatBackend for ScriptedBackend {
    fn model(&self) -> &str {
      "scripted"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, BackendError> {
      self.calls.lock().unwrap().push(messages.to_vec());
      self
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(BackendError::Decode("script exhausted".into())))
    }
  }
}
