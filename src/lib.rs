//! LM-driven LaTeX handout generator.
//!
//! Prompts an OpenAI-compatible model for the sections of a course-method
//! handout, assembles the responses into a LaTeX document, and writes it to
//! a timestamped file under the output directory.

pub mod cli;
pub mod config;
pub mod document;
pub mod lm;
pub mod output;
pub mod pipeline;
pub mod prompts;
