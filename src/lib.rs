//! Learning assistant: turns lesson text into a study packet (summary, key ideas,
//! self-check questions) and reviews the learner's answers with a chat model.

pub mod backend;
pub mod checker;
pub mod config;
pub mod domain;
pub mod input;
pub mod openai;
pub mod prompts;
pub mod scoring;
pub mod session;
pub mod summarizer;
pub mod telemetry;
pub mod util;
