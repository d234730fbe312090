//! Interactive study session: lesson in, study packet out, then one review per question.
//!
//! This module owns:
//!   - acquiring the lesson text (file or console)
//!   - running the summarizer with a console progress sink
//!   - rendering the packet and driving the per-question review
//!   - collecting scores and printing the average
//!
//! Backend calls are awaited one at a time, in question order. Any backend error ends
//! the run; everything else (no text, no questions, skipped or unscored answers) is
//! reported on the console and the run carries on or ends cleanly.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::backend::{BackendError, ChatBackend};
use crate::checker::check_answer;
use crate::config::SessionSettings;
use crate::domain::{Aggregate, QuestionOutcome, SessionState};
use crate::input::{is_skip, read_block, read_lesson_file};
use crate::prompts::Prompts;
use crate::scoring::{extract_score, missing_sections};
use crate::summarizer::{ProgressSink, Summarizer};

/// Where the lesson text comes from.
#[derive(Clone, Debug)]
pub enum LessonSource {
    File(PathBuf),
    Console,
}

/// How a run ended without error.
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    NoLesson,
    NoQuestions,
    Completed(Aggregate),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Progress sink printing each status line straight to the session output.
struct ConsoleSink<'w, W: Write>(&'w mut W);

impl<W: Write> ProgressSink for ConsoleSink<'_, W> {
    fn status(&mut self, message: &str) -> std::io::Result<()> {
        writeln!(self.0, "{message}")?;
        self.0.flush()
    }
}

pub struct Session<'a, R, W> {
    backend: &'a dyn ChatBackend,
    prompts: &'a Prompts,
    settings: &'a SessionSettings,
    input: R,
    out: W,
    run_id: Uuid,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(
        backend: &'a dyn ChatBackend,
        prompts: &'a Prompts,
        settings: &'a SessionSettings,
        input: R,
        out: W,
    ) -> Self {
        Self { backend, prompts, settings, input, out, run_id: Uuid::new_v4() }
    }

    /// Give back the output sink (tests read what was printed).
    pub fn into_output(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl Display) -> std::io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    fn acquire_lesson(&mut self, source: &LessonSource) -> std::io::Result<String> {
        match source {
            LessonSource::File(path) => {
                self.line(format!("[info] Loading lesson text from file: {}", path.display()))?;
                match read_lesson_file(path) {
                    Ok(text) => Ok(text),
                    Err(diagnostic) => {
                        self.line(diagnostic)?;
                        Ok(String::new())
                    }
                }
            }
            LessonSource::Console => {
                self.line("Enter the lesson text (several lines; finish with an empty line).")?;
                self.line("If the lesson contains code, save it to a file and pass the path instead: learning-assistant path/to/lesson.txt")?;
                self.read_console()
            }
        }
    }

    /// One blank-line-terminated block from the console. A failed read prints a
    /// diagnostic and yields empty text, which the callers treat as "nothing entered".
    fn read_console(&mut self) -> std::io::Result<String> {
        match read_block(&mut self.input) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(error = %e, "Console read failed");
                self.line(format!("[info] Could not read console input: {e}"))?;
                Ok(String::new())
            }
        }
    }

    /// Run one full session.
    #[instrument(level = "info", skip_all, fields(run_id = %self.run_id, model = %self.backend.model()))]
    pub async fn run(&mut self, source: LessonSource) -> Result<RunOutcome, SessionError> {
        let lesson = self.acquire_lesson(&source)?;
        if lesson.is_empty() {
            self.line("[info] No lesson text provided. Exiting.")?;
            info!("No lesson text; run ends");
            return Ok(RunOutcome::NoLesson);
        }

        self.line("[summarizer] Lesson text received, starting the summarizer...")?;
        let packet = {
            let summarizer = Summarizer::new(self.backend, self.prompts);
            let mut sink = ConsoleSink(&mut self.out);
            summarizer.run(&lesson, Some(&mut sink)).await?
        };

        self.render_packet(&packet.summary, &packet.key_ideas, &packet.questions)?;

        if packet.questions.is_empty() {
            self.line("[review] No questions were generated; answer review is not possible.")?;
            return Ok(RunOutcome::NoQuestions);
        }

        let mut state = SessionState::new(packet);
        self.review(&mut state).await?;

        let aggregate = state.aggregate();
        self.line("")?;
        self.line(format!("=== AVERAGE SCORE === {aggregate}"))?;
        self.line("Done.")?;
        info!(scored = state.scores.len(), total = state.total_questions(), "Session finished");
        Ok(RunOutcome::Completed(aggregate))
    }

    fn render_packet(&mut self, summary: &str, key_ideas: &str, questions: &[String]) -> std::io::Result<()> {
        self.line("")?;
        self.line("=== SUMMARY ===")?;
        self.line(if summary.is_empty() { "(no summary)" } else { summary })?;
        self.line("")?;
        self.line("=== KEY IDEAS ===")?;
        self.line(if key_ideas.is_empty() { "(no key ideas)" } else { key_ideas })?;
        self.line("")?;
        self.line("=== SELF-CHECK QUESTIONS ===")?;
        for (i, q) in questions.iter().enumerate() {
            self.line(format!("  {}. {}", i + 1, q))?;
        }
        self.line("")
    }

    async fn review(&mut self, state: &mut SessionState) -> Result<(), SessionError> {
        let context = state.packet.question_context();
        let total = state.total_questions();
        self.line("[review] Moving on to the questions, one at a time.")?;
        self.line("Answer in order (question 1 of N, then 2 of N, and so on).")?;

        for i in 0..total {
            let question = state.packet.questions[i].clone();
            let outcome = self.review_one(i + 1, total, &question, &context).await?;
            info!(question = i + 1, ?outcome, "Question processed");
            state.record(outcome);
        }

        debug_assert!(state.is_complete());
        self.line("[review] All questions processed.")?;
        Ok(())
    }

    async fn review_one(
        &mut self,
        number: usize,
        total: usize,
        question: &str,
        context: &str,
    ) -> Result<QuestionOutcome, SessionError> {
        self.line("")?;
        self.line(format!("--- Question {number} of {total} ---"))?;
        self.line(question)?;
        self.line("")?;
        let hint = match self.settings.skip_words.first() {
            Some(word) => format!("Enter your answer (an empty line or \"{word}\" skips the question):"),
            None => "Enter your answer (an empty line skips the question):".to_string(),
        };
        self.line(hint)?;

        let answer = self.read_console()?;
        if is_skip(&answer, &self.settings.skip_words) {
            self.line("[review] Question skipped.")?;
            return Ok(QuestionOutcome::Skipped);
        }

        self.line("[review] Checking the answer...")?;
        let report = check_answer(self.backend, self.prompts, question, &answer, context).await?;
        self.line("[review] Review and ideal answer received.")?;

        self.line("")?;
        self.line("=== ANSWER REVIEW ===")?;
        self.line(&report)?;

        let missing = missing_sections(&report);
        if !missing.is_empty() {
            warn!(question = number, ?missing, "Feedback report is missing sections");
        }

        Ok(match extract_score(&report) {
            Some(score) => QuestionOutcome::Scored(score),
            None => QuestionOutcome::Unscored,
        })
    }
}
