//! Text acquisition: multi-line console blocks, lesson files, and the skip check.

use std::io::BufRead;
use std::path::Path;

use tracing::warn;

/// Read lines until a blank line or end of input; return them joined and trimmed.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn read_block<R: BufRead>(reader: &mut R) -> std::io::Result<String> {
  let mut lines = Vec::new();
  let mut buf = Vec::new();
  loop {
    buf.clear();
    if reader.read_until(b'\n', &mut buf)? == 0 {
      break;
    }
    let decoded = String::from_utf8_lossy(&buf);
    let line = decoded.trim_end_matches(['\n', '\r']);
    if line.trim().is_empty() {
      break;
    }
    lines.push(line.to_string());
  }
  Ok(lines.join("\n").trim().to_string())
}

/// Lesson text from a file, trimmed. Errors come back as a diagnostic line instead of text.
pub fn read_lesson_file(path: &Path) -> Result<String, String> {
  match std::fs::read_to_string(path) {
    Ok(s) => Ok(s.trim().to_string()),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      warn!(path = %path.display(), "Lesson file not found");
      Err(format!("[info] File not found: {}", path.display()))
    }
    Err(e) => {
      warn!(path = %path.display(), error = %e, "Lesson file unreadable");
      Err(format!("[info] Could not read file {}: {e}", path.display()))
    }
  }
}

/// True for an empty answer or one of `skip_words` (case-insensitive, trailing punctuation ignored).
pub fn is_skip(answer: &str, skip_words: &[String]) -> bool {
  let a = answer.trim();
  if a.is_empty() {
    return true;
  }
  let word = a
    .trim_end_matches(|c: char| c.is_ascii_punctuation())
    .trim_end()
    .to_lowercase();
  skip_words.iter().any(|w| w.trim().to_lowercase() == word)
}
