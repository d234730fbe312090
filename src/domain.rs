//! Domain models used by the assistant: the study packet and the per-run session state.

use std::fmt;

/// Output of the summarizer pipeline. Built once per run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummaryResult {
  pub summary: String,
  /// Three labelled subsections (Concepts / Steps/Algorithms / Examples), verbatim from the model.
  pub key_ideas: String,
  /// Non-empty, numbering stripped, in generation order.
  pub questions: Vec<String>,
}

impl SummaryResult {
  /// Grounding material for the answer checker: key ideas, a blank line, then the summary.
  pub fn question_context(&self) -> String {
    format!("{}\n\n{}", self.key_ideas, self.summary).trim().to_string()
  }
}

/// What happened to a single question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionOutcome {
  Skipped,
  Scored(u8),
  Unscored,
}

/// Mutable state of one interactive run.
#[derive(Debug)]
pub struct SessionState {
  pub packet: SummaryResult,
  pub outcomes: Vec<QuestionOutcome>,
  pub scores: Vec<u8>,
}

impl SessionState {
  pub fn new(packet: SummaryResult) -> Self {
    let n = packet.questions.len();
    Self { packet, outcomes: Vec::with_capacity(n), scores: Vec::new() }
  }

  pub fn total_questions(&self) -> usize {
    self.packet.questions.len()
  }

  pub fn record(&mut self, outcome: QuestionOutcome) {
    if let QuestionOutcome::Scored(s) = outcome {
      self.scores.push(s);
    }
    self.outcomes.push(outcome);
  }

  pub fn is_complete(&self) -> bool {
    self.outcomes.len() >= self.total_questions()
  }

  pub fn aggregate(&self) -> Aggregate {
    Aggregate::from_scores(&self.scores, self.total_questions())
  }
}

/// Final score line of a run.
#[derive(Clone, Debug, PartialEq)]
pub enum Aggregate {
  Average { mean: f64, scored: usize, total: usize },
  Undetermined,
}

impl Aggregate {
  pub fn from_scores(scores: &[u8], total: usize) -> Self {
    if scores.is_empty() {
      return Aggregate::Undetermined;
    }
    let sum: u32 = scores.iter().map(|&s| u32::from(s)).sum();
    Aggregate::Average {
      mean: f64::from(sum) / scores.len() as f64,
      scored: scores.len(),
      total,
    }
  }
}

impl fmt::Display for Aggregate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Aggregate::Average { mean, scored, total } => {
        write!(f, "{mean:.1}/5 (collected from {scored} of {total} answers)")
      }
      Aggregate::Undetermined => {
        write!(f, "undetermined (all questions were skipped or unscored)")
      }
    }
  }
}
