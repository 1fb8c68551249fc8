//! CLI argument parsing for the handout generator.
//!
//! The CLI is intentionally thin: parsing only, no policy. Defaults
//! reproduce the stock run, so a bare `methodoc` invocation generates the
//! built-in course/method pair.
use clap::Parser;
use std::path::PathBuf;

use crate::config::{self, RunConfig};
use crate::pipeline::Shape;

#[derive(Parser, Debug)]
#[command(
    name = "methodoc",
    version,
    about = "Generate a LaTeX handout for a course method with an LM",
    after_help = "Examples:\n  methodoc\n  methodoc --course \"Optimización\" --method \"Descenso de Gradiente\" --language es\n  methodoc --shape fan-out --out-dir handouts"
)]
pub struct Args {
    /// Course the method belongs to
    #[arg(long, default_value = config::DEFAULT_COURSE)]
    pub course: String,

    /// Method to document
    #[arg(long, default_value = config::DEFAULT_METHOD)]
    pub method: String,

    /// Two-letter handout language code (en, es)
    #[arg(long, default_value = config::DEFAULT_LANGUAGE)]
    pub language: String,

    /// Orchestration shape for the generation stages
    #[arg(long, value_enum, default_value_t = Shape::Pipeline)]
    pub shape: Shape,

    /// Model identifier sent to the chat completions API
    #[arg(long, default_value = config::DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature, fixed for the whole run
    #[arg(long, default_value_t = config::DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Directory the finished .tex file is written to
    #[arg(long, default_value = config::DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,
}

impl Args {
    pub fn into_config(self) -> RunConfig {
        RunConfig {
            course: self.course,
            method: self.method,
            language: self.language,
            shape: self.shape,
            model: self.model,
            temperature: self.temperature,
            out_dir: self.out_dir,
        }
    }
}
