//! Run configuration and credential resolution.
//!
//! Defaults reproduce the stock invocation (the built-in course/method pair
//! in Spanish); everything is overridable from the CLI. Credentials come
//! from the environment, read once at startup.

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use crate::lm;
use crate::pipeline::Shape;
use crate::prompts;

pub const DEFAULT_COURSE: &str = "Computational Mathematics";
pub const DEFAULT_METHOD: &str = "Interior Point Method";
pub const DEFAULT_LANGUAGE: &str = "es";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_OUT_DIR: &str = "log";

/// Everything a run needs besides the API credential.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub course: String,
    pub method: String,
    pub language: String,
    pub shape: Shape,
    pub model: String,
    pub temperature: f32,
    pub out_dir: PathBuf,
}

impl RunConfig {
    /// Reject broken configuration before any model call is made.
    pub fn validate(&self) -> Result<()> {
        if self.course.trim().is_empty() {
            return Err(anyhow!("course must be non-empty"));
        }
        if self.method.trim().is_empty() {
            return Err(anyhow!("method must be non-empty"));
        }
        prompts::language_instruction(&self.language)?;
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(anyhow!(
                "temperature must be within 0.0..=2.0 (got {})",
                self.temperature
            ));
        }
        Ok(())
    }
}

/// Read the API key. Absence is a deployment error, never retried.
pub fn openai_api_key() -> Result<String> {
    std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY is not set (export it or add it to a .env file)")
}

/// Endpoint override hook, mainly for tests and compatible gateways.
pub fn openai_base_url() -> String {
    std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| lm::DEFAULT_BASE_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunConfig {
        RunConfig {
            course: DEFAULT_COURSE.to_string(),
            method: DEFAULT_METHOD.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            shape: Shape::Pipeline,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }

    #[test]
    fn defaults_validate() {
        config().validate().unwrap();
    }

    #[test]
    fn empty_course_is_rejected() {
        let mut bad = config();
        bad.course = "  ".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn unknown_language_is_rejected() {
        let mut bad = config();
        bad.language = "xx".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut bad = config();
        bad.temperature = 3.5;
        assert!(bad.validate().is_err());
    }
}
