//! Learning Assistant · CLI
//!
//! - Summarizes a lesson into a study packet
//! - Walks through the self-check questions and reviews each answer
//!
//! Important env variables:
//!   OPENAI_API_KEY        : required
//!   OPENAI_BASE_URL       : default "https://api.openai.com/v1"
//!   OPENAI_MODEL          : default "gpt-4o-mini"
//!   OPENAI_TEMPERATURE    : default 0.3
//!   OPENAI_TIMEOUT_SECS   : default 120
//!   ASSISTANT_CONFIG_PATH : path to TOML config (prompts + skip words)
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use learning_assistant::config::AssistantConfig;
use learning_assistant::openai::OpenAI;
use learning_assistant::session::{LessonSource, Session};
use learning_assistant::telemetry;

#[derive(Parser)]
#[command(
  name = "learning-assistant",
  version,
  about = "Learning Assistant: study notes and answer review for a lesson text.",
  after_help = "Example with a file (handy when the lesson contains code): learning-assistant lesson.txt"
)]
struct Cli {
  /// Path to a file with the lesson text (optional; read from the console if absent)
  lesson_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let cli = Cli::parse();
  telemetry::init_tracing();

  let config = AssistantConfig::from_env();
  let backend = OpenAI::from_env()?;
  info!(target: "learning_assistant", base_url = %backend.base_url, model = %backend.model, "Backend configured");

  let stdin = io::stdin();
  let mut stdout = io::stdout();
  writeln!(stdout, "[info] Configuration loaded.")?;
  writeln!(stdout, "[info] Using model: {}.", backend.model)?;

  let source = match cli.lesson_file {
    Some(path) => LessonSource::File(path),
    None => LessonSource::Console,
  };

  let mut session = Session::new(&backend, &config.prompts, &config.session, stdin.lock(), stdout);
  let outcome = session.run(source).await?;
  info!(target: "learning_assistant", ?outcome, "Run complete");
  Ok(())
}
