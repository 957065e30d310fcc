//! The planning agent: system prompt, tools and entry points.
//!
//! [`run`] is the one-call entry point. It reads `OPENAI_API_KEY` from the
//! environment, drives a single run on a private current-thread runtime and
//! blocks until an [`ActionPlan`] comes back or the run fails.
//!
//! ```rust,ignore
//! let plan = actionplan::run("Plan a 3-step rollout. Include weather and effort.")?;
//! println!("{}", plan.to_json_pretty()?);
//! ```
//!
//! Use [`run_with`] from async code or to supply a different model.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::agent::{Agent, DEFAULT_MAX_STEPS, RunConfig, RunResult};
use crate::error::Result;
use crate::providers::SharedModel;
use crate::providers::openai::OpenAIClient;
use crate::schema::{ActionPlan, DEFAULT_CITY, Deps};
use crate::tools::default_tools;

/// Instructions given to the model on every run.
pub const SYSTEM_PROMPT: &str = "You are a precise, delivery-focused assistant. \
    Use tools when helpful and ensure the final output strictly matches ActionPlan.";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Settings for one planning run.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Model identifier, used by [`run`] when building the `OpenAI` model.
    pub model: String,
    /// City for weather lookups that do not name one.
    pub default_city: String,
    /// Maximum number of model calls.
    pub max_steps: usize,
    /// Abort the run after this long.
    pub timeout: Option<Duration>,
    /// Sampling temperature; the provider default when unset.
    pub temperature: Option<f32>,
    /// Completion token limit per model call; the provider default when unset.
    pub max_tokens: Option<u32>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            default_city: DEFAULT_CITY.to_owned(),
            max_steps: DEFAULT_MAX_STEPS,
            timeout: None,
            temperature: None,
            max_tokens: None,
        }
    }
}

impl PlannerConfig {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            max_steps: Some(self.max_steps),
            timeout: self.timeout,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Build the planning agent around `model` with both built-in tools.
#[must_use]
pub fn plan_agent(model: SharedModel) -> Agent<Deps, ActionPlan> {
    Agent::new("planner")
        .instructions(SYSTEM_PROMPT)
        .model(model)
        .tools(default_tools())
}

/// Run the planner once with an explicit model and configuration.
///
/// Each call gets its own fresh [`Deps`].
///
/// # Errors
///
/// Propagates every error of the run unchanged; see
/// [`Runner::run`](crate::agent::Runner::run).
pub async fn run_with(
    model: SharedModel,
    user_prompt: &str,
    config: &PlannerConfig,
) -> Result<RunResult<ActionPlan>> {
    let agent = plan_agent(model).max_steps(config.max_steps);
    let deps = Deps::new(config.default_city.as_str());

    let result = agent.run(user_prompt, deps, config.run_config()).await?;
    info!(
        title = %result.output.title,
        steps = result.steps,
        tool_calls = result.tool_calls.len(),
        "Plan ready"
    );
    Ok(result)
}

/// Turn one free-text prompt into a validated [`ActionPlan`].
///
/// Blocks the calling thread. Must not be called from inside an async
/// runtime; use [`run_with`] there.
///
/// # Errors
///
/// - [`LlmError`](crate::error::LlmError) with kind `Auth` if
///   `OPENAI_API_KEY` is not set
/// - any error of the run, unchanged
pub fn run(user_prompt: &str) -> Result<ActionPlan> {
    let config = PlannerConfig::default();
    let model: SharedModel = Arc::new(OpenAIClient::from_env()?.completion_model(&config.model));
    run_blocking(model, user_prompt, &config)
}

/// Blocking [`run_with`] on a private current-thread runtime, keeping only
/// the plan.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::error::Error::Io) if the runtime cannot be
/// built, otherwise any error of the run, unchanged.
pub fn run_blocking(
    model: SharedModel,
    user_prompt: &str,
    config: &PlannerConfig,
) -> Result<ActionPlan> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(run_with(model, user_prompt, config))?;
    Ok(result.into_output())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::message::Role;
    use crate::providers::MockModel;

    #[test]
    fn test_system_prompt() {
        assert!(SYSTEM_PROMPT.ends_with("strictly matches ActionPlan."));
        assert!(SYSTEM_PROMPT.contains("assistant. Use tools"));
    }

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.default_city, "Bengaluru");
        assert_eq!(config.max_steps, DEFAULT_MAX_STEPS);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_plan_agent_wiring() {
        let agent = plan_agent(Arc::new(MockModel::new("mock")));
        assert_eq!(agent.name(), "planner");
        assert_eq!(agent.get_instructions(), SYSTEM_PROMPT);
        assert_eq!(agent.get_model(), Some("mock"));
        assert_eq!(
            agent.get_tools().names(),
            ["estimate_effort", "get_weather"]
        );
    }

    #[test]
    fn test_run_blocking_returns_plan() {
        let model = Arc::new(
            MockModel::new("mock")
                .with_tool_call("call_1", "estimate_effort", json!({ "tasks": ["Draft", "Ship"] }))
                .with_text(r#"{"title":"Release","steps":["Draft","Ship"],"effort_hours":1.0}"#),
        );

        let plan =
            run_blocking(Arc::<MockModel>::clone(&model), "Plan a release", &PlannerConfig::default())
                .unwrap();

        assert_eq!(plan.title, "Release");
        assert_eq!(plan.steps, ["Draft", "Ship"]);
        assert!(plan.weather.is_none());
    }

    #[test]
    fn test_run_blocking_propagates_errors() {
        let model = Arc::new(MockModel::new("mock").with_text("not json"));
        let err = run_blocking(model, "Plan a release", &PlannerConfig::default()).unwrap_err();
        assert!(matches!(err, crate::error::Error::Validation(_)));
    }

    #[test]
    fn test_run_config_carries_sampling_options() {
        let config = PlannerConfig {
            temperature: Some(0.2),
            max_tokens: Some(512),
            ..PlannerConfig::default()
        };
        let run_config = config.run_config();
        assert_eq!(run_config.max_steps, Some(DEFAULT_MAX_STEPS));
        assert_eq!(run_config.temperature, Some(0.2));
        assert_eq!(run_config.max_tokens, Some(512));
    }

    #[tokio::test]
    async fn test_run_with_uses_configured_city() {
        let model = Arc::new(
            MockModel::new("mock")
                .with_tool_call("call_1", "get_weather", json!({}))
                .with_text(
                    r#"{"title":"Trip","steps":["Pack"],"effort_hours":0.5,
                        "weather":{"location":"Mysuru","temperature_c":24.5,"condition":"Partly Cloudy"}}"#,
                ),
        );
        let config = PlannerConfig {
            default_city: "Mysuru".into(),
            ..PlannerConfig::default()
        };

        let result = run_with(Arc::<MockModel>::clone(&model), "Plan a trip", &config).await.unwrap();
        assert_eq!(result.output.weather.unwrap().location, "Mysuru");

        let requests = model.requests().await;
        let tool_message = &requests[1].messages[3];
        assert_eq!(tool_message.role, Role::Tool);
        assert!(tool_message.text_content().unwrap().contains("\"Mysuru\""));
    }
}
