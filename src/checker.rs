//! Answer checker: one generation call grading a learner's answer against the lesson context.

use tracing::{info, instrument};

use crate::backend::{BackendError, ChatBackend, ChatMessage};
use crate::prompts::Prompts;

/// Returned instead of a report when there is nothing to grade against.
pub const MISSING_INPUT_REPORT: &str = "Error: question or context missing, the answer cannot be checked.";

/// Sent in place of an empty answer so the model always sees an answer field.
pub const NO_ANSWER_PLACEHOLDER: &str = "(student gave no answer)";

/// Grade `answer` and return the model's report, trimmed.
///
/// The five-section structure is requested but not verified here.
#[instrument(
  level = "info",
  skip_all,
  fields(question_len = question.len(), answer_len = answer.len(), context_len = context.len())
)]
pub async fn check_answer(
  backend: &dyn ChatBackend,
  prompts: &Prompts,
  question: &str,
  answer: &str,
  context: &str,
) -> Result<String, BackendError> {
  let question = question.trim();
  let answer = answer.trim();
  let context = context.trim();

  if question.is_empty() || context.is_empty() {
    info!("Question or context empty; no backend call");
    return Ok(MISSING_INPUT_REPORT.to_string());
  }

  let answer = if answer.is_empty() { NO_ANSWER_PLACEHOLDER } else { answer };
  let messages = [
    ChatMessage::system(prompts.checker_system.as_str()),
    ChatMessage::human(prompts.checker(question, answer, context)),
  ];
  let report = backend.complete(&messages).await?;
  Ok(report.trim().to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::scripted::ScriptedBackend;

  #[tokio::test]
  async fn missing_question_or_context_skips_backend() {
    let backend = ScriptedBackend::new(["never used"]);
    let prompts = Prompts::default();

    let a = check_answer(&backend, &prompts, "   ", "answer", "ctx").await.unwrap();
    let b = check_answer(&backend, &prompts, "Q?", "answer", "\n\t").await.unwrap();

    assert_eq!(a, MISSING_INPUT_REPORT);
    assert_eq!(b, MISSING_INPUT_REPORT);
    assert!(a.contains("question or context missing"));
    assert_eq!(backend.call_count(), 0);
  }

  #[tokio::test]
  async fn empty_answer_uses_placeholder() {
    let backend = ScriptedBackend::new(["Score:\n1/5 — nothing given"]);
    let prompts = Prompts::default();

    check_answer(&backend, &prompts, "Q?", "  ", "ctx").await.unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0][1].content.contains(NO_ANSWER_PLACEHOLDER));
  }

  #[tokio::test]
  async fn sends_checker_prompts_and_trims_report() {
    let backend = ScriptedBackend::new(["\n  Analysis:\nfine\n\nScore:\n4/5 — solid  \n"]);
    let prompts = Prompts::default();

    let report = check_answer(&backend, &prompts, " What is ATP? ", "Energy currency.", "Concepts: ATP")
      .await
      .unwrap();

    assert_eq!(report, "Analysis:\nfine\n\nScore:\n4/5 — solid");
    let call = &backend.calls()[0];
    assert_eq!(call[0].content, prompts.checker_system);
    assert!(call[1].content.contains("Question: What is ATP?"));
    assert!(call[1].content.contains("Energy currency."));
    assert!(call[1].content.contains("Concepts: ATP"));
  }

  #[tokio::test]
  async fn backend_errors_propagate() {
    let backend = ScriptedBackend::new(Vec::<String>::new());
    backend.push_error(BackendError::Decode("bad json".into()));
    let prompts = Prompts::default();
    let err = check_answer(&backend, &prompts, "Q?", "A", "ctx").await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
  }
}
