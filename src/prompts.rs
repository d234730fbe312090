//! Prompt templates for the four generation tasks.
//!
//! Placeholders use `{name}` syntax and are filled by `util::fill_template`.
//! Every field may be overridden from the TOML config; missing fields keep their default.

use serde::Deserialize;

use crate::util::fill_template;

/// Section labels the answer checker is asked to produce, in order.
pub const FEEDBACK_SECTIONS: [&str; 5] = ["Analysis", "Pros", "Cons", "Score", "Ideal Answer"];

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  // Summarizer (shared by all three steps)
  pub summarizer_system: String,
  /// Placeholders: `{lesson}`
  pub summary_template: String,
  /// Placeholders: `{lesson}`, `{summary}`
  pub key_ideas_template: String,
  /// Placeholders: `{key_ideas}`
  pub questions_template: String,
  // Answer checker
  pub checker_system: String,
  /// Placeholders: `{question}`, `{answer}`, `{context}`
  pub checker_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      summarizer_system: "You are a patient study assistant. You turn lesson material into clear, compact study notes for a learner. Use plain language and stay faithful to the source text.".into(),
      summary_template: "Write a short summary of the following lesson in 2-4 sentences: what it is about, its main topics and ideas, and what the learner should take away. Output only the summary, no preamble.\n\nLesson:\n{lesson}".into(),
      key_ideas_template: "Below are a lesson and its short summary. Extract the key ideas as exactly three subsections with these headings:\n- Concepts: terms with short explanations in plain language\n- Steps/Algorithms: sequences of actions or lines of reasoning (if any)\n- Examples: 1-2 clear examples from life or practice\n\nOutput only these three subsections, no introduction or conclusion.\n\nSummary:\n{summary}\n\nLesson:\n{lesson}".into(),
      questions_template: "Using the key ideas below, write 3-5 self-check questions. No answer options. Put each question on its own line. Keep the wording simple and concrete.\n\nKey ideas:\n{key_ideas}".into(),
      checker_system: "You are an answer-checking specialist. You grade a learner's answer fairly and concretely, using the lesson material as the reference. Be encouraging but honest.".into(),
      checker_template: "Check the learner's answer to the question. The context (key ideas and summary) is given as reference.\n\nQuestion: {question}\n\nLearner's answer: {answer}\n\nContext (lesson material):\n{context}\n\nOutput the review strictly in this format:\n\nAnalysis:\n...\n\nPros:\n...\n\nCons:\n...\n\nScore:\nX/5 — short explanation\n\nIdeal Answer:\n...".into(),
    }
  }
}

impl Prompts {
  pub fn summary(&self, lesson: &str) -> String {
    fill_template(&self.summary_template, &[("lesson", lesson)])
  }

  pub fn key_ideas(&self, lesson: &str, summary: &str) -> String {
    fill_template(&self.key_ideas_template, &[("lesson", lesson), ("summary", summary)])
  }

  pub fn questions(&self, key_ideas: &str) -> String {
    fill_template(&self.questions_template, &[("key_ideas", key_ideas)])
  }

  pub fn checker(&self, question: &str, answer: &str, context: &str) -> String {
    fill_template(
      &self.checker_template,
      &[("question", question), ("answer", answer), ("context", context)],
    )
  }
}
