use anyhow::Result;
use clap::Parser;

use methodoc::cli::Args;
use methodoc::config;
use methodoc::document;
use methodoc::lm::{OpenAiClient, OpenAiConfig};
use methodoc::output;
use methodoc::pipeline::{self, TaskInputs};
use methodoc::prompts;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.into_config();
    config.validate()?;

    let api_key = config::openai_api_key()?;
    let client = OpenAiClient::new(OpenAiConfig {
        api_key,
        base_url: config::openai_base_url(),
        model: config.model.clone(),
        temperature: config.temperature,
    });

    let inputs = TaskInputs {
        course: config.course.clone(),
        method: config.method.clone(),
        language_instruction: prompts::language_instruction(&config.language)?.to_string(),
    };

    tracing::info!(
        course = %inputs.course,
        method = %inputs.method,
        shape = ?config.shape,
        model = %config.model,
        "starting generation run"
    );

    let generated = pipeline::run(config.shape, &inputs, &client)?;
    let latex = document::wrap_document(&generated.body);
    let path = output::write_document(&config.out_dir, &config.course, &config.method, &latex)?;
    println!("Wrote {}", path.display());
    Ok(())
}
