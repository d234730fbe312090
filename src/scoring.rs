//! Best-effort parsing of feedback reports.

use std::sync::LazyLock;

use regex::Regex;

use crate::prompts::FEEDBACK_SECTIONS;

static SCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)/5").expect("score pattern is valid"));

/// First `<digit>/5` in the report, if the digit is 1..=5.
pub fn extract_score(report: &str) -> Option<u8> {
  let caps = SCORE_RE.captures(report)?;
  let score: u8 = caps[1].parse().ok()?;
  (1..=5).contains(&score).then_some(score)
}

/// Section labels (`Analysis:` etc.) absent from the report. Used for diagnostics only.
pub fn missing_sections(report: &str) -> Vec<&'static str> {
  let lower = report.to_lowercase();
  FEEDBACK_SECTIONS
    .iter()
    .copied()
    .filter(|s| !lower.contains(&format!("{}:", s.to_lowercase())))
    .collect()
}
