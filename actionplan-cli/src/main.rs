//! Actionplan CLI - turn one prompt into a structured action plan.

#![allow(clippy::print_stdout)]

use std::sync::Arc;
use std::time::Duration;

use actionplan::PlannerConfig;
use actionplan::agent::DEFAULT_MAX_STEPS;
use actionplan::planner::DEFAULT_MODEL;
use actionplan::providers::{OpenAIClient, SharedModel};
use actionplan::schema::DEFAULT_CITY;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEMO_PROMPT: &str =
    "Plan a 3-step economic policy for India. Include weather and effort estimate.";

/// Actionplan CLI - structured action plans from free text
#[derive(Parser, Debug)]
#[command(name = "actionplan")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// What to plan
    #[arg(default_value = DEMO_PROMPT)]
    prompt: String,

    /// Model name
    #[arg(short, long, env = "ACTIONPLAN_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// City used for weather lookups that do not name one
    #[arg(long, env = "ACTIONPLAN_DEFAULT_CITY", default_value = DEFAULT_CITY)]
    default_city: String,

    /// API key for the model provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Abort the run after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Maximum number of model calls
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Completion token limit per model call
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            model: self.model.clone(),
            default_city: self.default_city.clone(),
            max_steps: self.max_steps,
            timeout: self.timeout_secs.map(Duration::from_secs),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn model(&self) -> actionplan::Result<SharedModel> {
        let mut builder = OpenAIClient::builder().api_key(self.api_key.clone().unwrap_or_default());
        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(timeout) = self.timeout_secs {
            builder = builder.timeout_secs(timeout);
        }
        Ok(Arc::new(builder.build()?.completion_model(&self.model)))
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("actionplan=debug,actionplan_cli=debug")
    } else {
        EnvFilter::new("actionplan=warn,actionplan_cli=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let model = args.model()?;
    let config = args.planner_config();

    let result = actionplan::run_with(model, &args.prompt, &config).await?;
    info!(
        steps = result.steps,
        tokens = result.usage.total(),
        "Planner finished"
    );

    println!("{}", serde_json::to_string_pretty(&result.output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["actionplan"]).unwrap();
        assert_eq!(args.prompt, DEMO_PROMPT);
        assert_eq!(args.max_steps, DEFAULT_MAX_STEPS);

        let config = args.planner_config();
        assert!(config.timeout.is_none());
        assert!(config.temperature.is_none());
        assert!(config.max_tokens.is_none());
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "actionplan",
            "Plan a launch",
            "--model",
            "gpt-4o-mini",
            "--default-city",
            "Pune",
            "--timeout-secs",
            "30",
            "--max-steps",
            "3",
            "--temperature",
            "0.3",
            "--max-tokens",
            "1024",
        ])
        .unwrap();

        let config = args.planner_config();
        assert_eq!(args.prompt, "Plan a launch");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.default_city, "Pune");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.max_steps, 3);
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.max_tokens, Some(1024));
    }

    #[test]
    fn test_missing_api_key_is_auth_error() {
        let args = Args::try_parse_from(["actionplan", "--api-key", ""]).unwrap();
        assert!(matches!(args.model(), Err(actionplan::Error::Llm(_))));
    }
}
