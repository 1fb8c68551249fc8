//! Text generation against an OpenAI-compatible chat completions API.
//!
//! The whole system exists to wrap this single external dependency, so the
//! call is kept behind the [`TextGenerator`] trait: the orchestrator takes
//! the collaborator by reference, and tests substitute a canned double.
//!
//! Transient failures (rate limits, server errors, transport problems) get a
//! bounded retry with exponential backoff. Configuration problems and
//! non-retryable HTTP statuses fail the run immediately.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::{Duration, Instant};

/// One generation call: instantiated prompt in, opaque response text out.
pub trait TextGenerator: Sync {
    fn generate(&self, prompt: &str) -> Result<String>;
}

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Bounds hung calls; a section can take seconds, not minutes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Additional attempts granted to transient failures.
const MAX_GENERATE_RETRIES: u32 = 2;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Connection settings fixed for the whole run.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

pub struct OpenAiClient {
    agent: ureq::Agent,
    config: OpenAiConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Self { agent, config }
    }

    fn request(&self, prompt: &str) -> Result<ChatResponse, ureq::Error> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", &format!("Bearer {}", self.config.api_key))
            .send_json(body)?;
        response.body_mut().read_json::<ChatResponse>()
    }
}

impl TextGenerator for OpenAiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let mut attempt = 0;
        let response = loop {
            match self.request(prompt) {
                Ok(response) => break response,
                Err(err) if attempt < MAX_GENERATE_RETRIES && is_transient(&err) => {
                    let delay = INITIAL_BACKOFF * 2u32.pow(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient generation failure, retrying"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err).context("call chat completions API"),
            }
        };

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| anyhow!("model returned an empty response"))?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            prompt_bytes = prompt.len(),
            response_bytes = content.len(),
            "generate complete"
        );
        Ok(content)
    }
}

/// Retry rate limiting, server-side failures, and transport errors; a
/// response body that fails to parse is not going to parse on a retry.
fn is_transient(err: &ureq::Error) -> bool {
    match err {
        ureq::Error::StatusCode(code) => is_retryable_status(*code),
        ureq::Error::Json(_) => false,
        _ => true,
    }
}

const fn is_retryable_status(code: u16) -> bool {
    matches!(code, 408 | 429 | 500..=599)
}
