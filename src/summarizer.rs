//! Summarizer pipeline: lesson text → summary → key ideas → self-check questions.
//!
//! Flow:
//! 1) Summary of the lesson (2-4 sentences).
//! 2) Key ideas from lesson + summary, in three labelled subsections.
//! 3) Questions from the key ideas, one per line, then parsed.
//!
//! Stages run strictly in order over one shared backend handle. Each stage reads only
//! what earlier stages produced. Any backend error aborts the run with no partial result.

use tracing::{debug, info, instrument, warn};

use crate::backend::{BackendError, ChatBackend, ChatMessage};
use crate::domain::SummaryResult;
use crate::prompts::Prompts;
use crate::util::trunc_for_log;

/// Receives human-readable status lines while the pipeline runs.
///
/// Errors are logged and otherwise ignored; a broken sink never stops the pipeline.
pub trait ProgressSink {
  fn status(&mut self, message: &str) -> std::io::Result<()>;
}

pub struct Summarizer<'a> {
  backend: &'a dyn ChatBackend,
  prompts: &'a Prompts,
}

/// Fields accumulated by the stages, in stage order.
#[derive(Default)]
struct Draft<'l> {
  lesson: &'l str,
  summary: Option<String>,
  key_ideas: Option<String>,
  questions: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug)]
enum Stage {
  Summary,
  KeyIdeas,
  Questions,
}

const STAGES: [Stage; 3] = [Stage::Summary, Stage::KeyIdeas, Stage::Questions];

impl Stage {
  fn started(self) -> &'static str {
    match self {
      Stage::Summary => "[summarizer] Building the summary...",
      Stage::KeyIdeas => "[summarizer] Extracting key ideas...",
      Stage::Questions => "[summarizer] Generating self-check questions...",
    }
  }

  fn request(self, prompts: &Prompts, draft: &Draft<'_>) -> String {
    match self {
      Stage::Summary => prompts.summary(draft.lesson),
      Stage::KeyIdeas => prompts.key_ideas(draft.lesson, draft.summary.as_deref().unwrap_or_default()),
      Stage::Questions => prompts.questions(draft.key_ideas.as_deref().unwrap_or_default()),
    }
  }

  /// Store the stage output and return the completion status line.
  fn apply(self, draft: &mut Draft<'_>, output: String) -> String {
    match self {
      Stage::Summary => {
        draft.summary = Some(output);
        "[summarizer] Summary ready.".into()
      }
      Stage::KeyIdeas => {
        draft.key_ideas = Some(output);
        "[summarizer] Key ideas ready.".into()
      }
      Stage::Questions => {
        let questions = parse_questions(&output);
        let msg = format!("[summarizer] Questions generated: {}.", questions.len());
        draft.questions = Some(questions);
        msg
      }
    }
  }
}

impl<'a> Summarizer<'a> {
  pub fn new(backend: &'a dyn ChatBackend, prompts: &'a Prompts) -> Self {
    Self { backend, prompts }
  }

  /// Run all three stages. Empty lesson text returns an empty result without calling the backend.
  #[instrument(level = "info", skip_all, fields(lesson_len = lesson.len(), model = %self.backend.model()))]
  pub async fn run(
    &self,
    lesson: &str,
    mut progress: Option<&mut dyn ProgressSink>,
  ) -> Result<SummaryResult, BackendError> {
    let lesson = lesson.trim();
    if lesson.is_empty() {
      debug!("Empty lesson text; skipping pipeline");
      return Ok(SummaryResult::default());
    }

    let mut draft = Draft { lesson, ..Default::default() };
    for stage in STAGES {
      notify(&mut progress, stage.started());
      let messages = [
        ChatMessage::system(self.prompts.summarizer_system.as_str()),
        ChatMessage::human(stage.request(self.prompts, &draft)),
      ];
      let output = self.backend.complete(&messages).await?.trim().to_string();
      debug!(?stage, preview = %trunc_for_log(&output, 60), "Stage output");
      let done = stage.apply(&mut draft, output);
      notify(&mut progress, &done);
    }

    let result = SummaryResult {
      summary: draft.summary.unwrap_or_default(),
      key_ideas: draft.key_ideas.unwrap_or_default(),
      questions: draft.questions.unwrap_or_default(),
    };
    info!(
      summary_len = result.summary.len(),
      key_ideas_len = result.key_ideas.len(),
      questions = result.questions.len(),
      "Study packet built"
    );
    Ok(result)
  }
}

fn notify(sink: &mut Option<&mut dyn ProgressSink>, message: &str) {
  if let Some(s) = sink.as_deref_mut() {
    if let Err(e) = s.status(message) {
      warn!(error = %e, "Progress sink failed; continuing");
    }
  }
}

/// Split raw model output into questions: one per non-blank line, with a leading
/// `12.` / `3)` / `4-` / `-` marker removed.
pub fn parse_questions(raw: &str) -> Vec<String> {
  raw
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .map(strip_numbering)
    .filter(|q| !q.is_empty())
    .map(str::to_string)
    .collect()
}

fn strip_numbering(line: &str) -> &str {
  let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
  match rest.strip_prefix(['.', ')', '-']) {
    Some(q) => q.trim_start(),
    None => line,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::scripted::ScriptedBackend;
  use crate::backend::ChatRole;

  #[derive(Default)]
  struct Recorder(Vec<String>);

  impl ProgressSink for Recorder {
    fn status(&mut self, message: &str) -> std::io::Result<()> {
      self.0.push(message.to_string());
      Ok(())
    }
  }

  struct Broken;

  impl ProgressSink for Broken {
    fn status(&mut self, _message: &str) -> std::io::Result<()> {
      Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
    }
  }

  #[test]
  fn parses_numbered_and_blank_lines() {
    assert_eq!(
      parse_questions("1. What is X?\n\n2) How does Y work?"),
      vec!["What is X?", "How does Y work?"]
    );
  }

  #[test]
  fn strips_dash_delimiters_and_bullets() {
    assert_eq!(
      parse_questions("3-Why Z?\n  - Bulleted?\n10. Tenth?"),
      vec!["Why Z?", "Bulleted?", "Tenth?"]
    );
  }

  #[test]
  fn leaves_unnumbered_lines_alone() {
    assert_eq!(
      parse_questions("What is 2+2?\n2024 was a leap year, why?"),
      vec!["What is 2+2?", "2024 was a leap year, why?"]
    );
  }

  #[test]
  fn bare_markers_are_dropped() {
    assert_eq!(parse_questions("1.\n2. Real question?"), vec!["Real question?"]);
  }

  #[tokio::test]
  async fn whitespace_lesson_makes_no_calls() {
    let backend = ScriptedBackend::new(Vec::<String>::new());
    let prompts = Prompts::default();
    let mut rec = Recorder::default();
    let out = Summarizer::new(&backend, &prompts).run("  \n\t ", Some(&mut rec)).await.unwrap();
    assert_eq!(out, SummaryResult::default());
    assert_eq!(backend.call_count(), 0);
    assert!(rec.0.is_empty());
  }

  #[tokio::test]
  async fn each_stage_feeds_the_next() {
    let backend = ScriptedBackend::new([
      "  SUMMARY-TEXT  ",
      "Concepts: C\nSteps/Algorithms: S\nExamples: E",
      "1. First?\n2) Second?",
    ]);
    let prompts = Prompts::default();
    let out = Summarizer::new(&backend, &prompts).run("LESSON-TEXT", None).await.unwrap();

    assert_eq!(out.summary, "SUMMARY-TEXT");
    assert_eq!(out.key_ideas, "Concepts: C\nSteps/Algorithms: S\nExamples: E");
    assert_eq!(out.questions, vec!["First?", "Second?"]);

    let calls = backend.calls();
    assert_eq!(calls.len(), 3);
    for call in &calls {
      assert_eq!(call[0].role, ChatRole::System);
      assert_eq!(call[0].content, prompts.summarizer_system);
      assert_eq!(call[1].role, ChatRole::Human);
    }
    assert!(calls[0][1].content.contains("LESSON-TEXT"));
    assert!(calls[1][1].content.contains("LESSON-TEXT"));
    assert!(calls[1][1].content.contains("SUMMARY-TEXT"));
    assert!(calls[2][1].content.contains("Steps/Algorithms: S"));
    assert!(!calls[2][1].content.contains("LESSON-TEXT"));
  }

  #[tokio::test]
  async fn reports_progress_around_every_stage() {
    let backend = ScriptedBackend::new(["s", "k", "Q1?\nQ2?\nQ3?"]);
    let prompts = Prompts::default();
    let mut rec = Recorder::default();
    Summarizer::new(&backend, &prompts).run("lesson", Some(&mut rec)).await.unwrap();
    assert_eq!(rec.0.len(), 6);
    assert_eq!(rec.0[0], Stage::Summary.started());
    assert_eq!(rec.0[5], "[summarizer] Questions generated: 3.");
  }

  #[tokio::test]
  async fn failing_sink_does_not_affect_result() {
    let backend = ScriptedBackend::new(["s", "k", "Q?"]);
    let prompts = Prompts::default();
    let mut sink = Broken;
    let out = Summarizer::new(&backend, &prompts).run("lesson", Some(&mut sink)).await.unwrap();
    assert_eq!(out.questions, vec!["Q?"]);
  }

  #[tokio::test]
  async fn backend_failure_aborts_without_partial_result() {
    let backend = ScriptedBackend::new(["summary"]);
    backend.push_error(BackendError::Status { status: 500, message: "boom".into() });
    let prompts = Prompts::default();
    let err = Summarizer::new(&backend, &prompts).run("lesson", None).await.unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 500, .. }));
    assert_eq!(backend.call_count(), 2);
  }
}
