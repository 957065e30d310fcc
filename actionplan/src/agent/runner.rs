//! Runner: the agent execution engine.
//!
//! The [`Runner`] drives an [`Agent`] through one run:
//!
//! 1. Build messages from instructions + user input
//! 2. Call the model with the tool definitions and the output schema
//! 3. If the model requested tools, execute them in order and append results
//! 4. Otherwise parse the answer as JSON and validate it as the output type
//!
//! Calls the model could fix itself (unknown tool, malformed arguments) are
//! reported back to it as tool results. Any other failure ends the run with
//! that error. The final answer is never repaired or retried.

use serde_json::Value;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::error::{Error, Result, ToolError, ValidationError};
use crate::message::{ChatMessage, ToolCall};
use crate::providers::{GenerateOptions, TokenUsage, json_schema_format};
use crate::schema::{StructuredOutput, json_schema_for};

use super::config::Agent;
use super::result::{RunConfig, RunResult, ToolCallRecord};

/// Stateless execution engine for [`Agent`] runs.
///
/// All per-run state lives inside [`Runner::run`], so concurrent runs never
/// share anything but the agent's immutable configuration.
#[derive(Debug, Clone, Copy)]
pub struct Runner;

impl Runner {
    /// Execute one run to completion.
    ///
    /// `deps` is owned by the run and lent to each tool call by shared
    /// reference.
    ///
    /// # Errors
    ///
    /// - [`Error::Agent`] if the agent has no model
    /// - [`Error::Llm`] when the provider call fails
    /// - [`Error::Tool`] when a tool fails while executing
    /// - [`Error::Validation`] when the final answer does not match `O`
    /// - [`Error::MaxSteps`] when the step limit is reached
    /// - [`Error::Timeout`] when [`RunConfig::timeout`] elapses
    pub async fn run<D, O>(
        agent: &Agent<D, O>,
        input: &str,
        deps: D,
        config: RunConfig,
    ) -> Result<RunResult<O>>
    where
        D: Send + Sync + 'static,
        O: StructuredOutput,
    {
        let span = info_span!("agent_run", agent = %agent.name);
        let run = Self::run_inner(agent, input, deps, config).instrument(span);

        match config.timeout {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|_| Error::Timeout(limit))?,
            None => run.await,
        }
    }

    async fn run_inner<D, O>(
        agent: &Agent<D, O>,
        input: &str,
        deps: D,
        config: RunConfig,
    ) -> Result<RunResult<O>>
    where
        D: Send + Sync + 'static,
        O: StructuredOutput,
    {
        let model = agent.model.as_deref().ok_or_else(|| {
            Error::agent(format!(
                "Agent '{}' has no model configured. Call .model() before running.",
                agent.name
            ))
        })?;
        let max_steps = config.max_steps.unwrap_or(agent.max_steps);

        let options = config.apply(
            GenerateOptions::new()
                .with_tools(agent.tools.definitions())
                .with_response_format(json_schema_format(O::NAME, json_schema_for::<O>())),
        );

        let mut messages = Vec::new();
        if !agent.instructions.is_empty() {
            messages.push(ChatMessage::system(agent.instructions.as_str()));
        }
        messages.push(ChatMessage::user(input));

        let mut usage = TokenUsage::default();
        let mut tool_calls = Vec::new();

        for step in 1..=max_steps {
            debug!(step, model = model.model_id(), "Starting step");

            let response = model.generate(&messages, &options).await?;
            if let Some(step_usage) = response.token_usage {
                usage += step_usage;
            }

            if response.has_tool_calls() {
                let calls = response.tool_calls().unwrap_or_default().to_vec();
                messages.push(response.message);

                for call in &calls {
                    let record = Self::execute_tool_call(agent, &deps, call).await?;
                    let content = match &record.result {
                        Ok(value) => value.to_string(),
                        Err(reason) => reason.clone(),
                    };
                    messages.push(ChatMessage::tool_result(record.id.as_str(), content));
                    tool_calls.push(record);
                }
                continue;
            }

            let output = parse_output::<O>(response.text().unwrap_or_default())?;
            info!(
                steps = step,
                tool_calls = tool_calls.len(),
                tokens = usage.total(),
                "Run finished"
            );

            return Ok(RunResult {
                output,
                usage,
                steps: step,
                tool_calls,
                agent_name: agent.name.clone(),
            });
        }

        warn!(max_steps, "Step limit reached without a final answer");
        Err(Error::max_steps(max_steps))
    }

    async fn execute_tool_call<D, O>(
        agent: &Agent<D, O>,
        deps: &D,
        call: &ToolCall,
    ) -> Result<ToolCallRecord>
    where
        D: Send + Sync + 'static,
        O: StructuredOutput,
    {
        let name = call.name();
        let (arguments, outcome) = match call.arguments() {
            Ok(args) => {
                let outcome = agent.tools.call(name, deps, args.clone()).await;
                (args, outcome)
            }
            Err(err) => (
                Value::String(call.function.arguments.clone()),
                Err(ToolError::invalid_args(format!(
                    "arguments are not valid JSON: {err}"
                ))),
            ),
        };

        let result = match outcome {
            Ok(value) => {
                debug!(tool = name, "Tool call succeeded");
                Ok(value)
            }
            Err(err) if err.is_call_rejection() => {
                warn!(tool = name, error = %err, "Tool call rejected, reporting back to model");
                Err(format!("Error: {err}. Fix the errors and try again."))
            }
            Err(err) => return Err(err.into()),
        };

        Ok(ToolCallRecord {
            id: call.id.clone(),
            name: name.to_owned(),
            arguments,
            result,
        })
    }
}

/// Parse and validate the model's final answer.
fn parse_output<O: StructuredOutput>(text: &str) -> Result<O> {
    let json = strip_code_fence(text);
    if json.is_empty() {
        return Err(ValidationError::field("", "model returned an empty final answer").into());
    }

    let value: Value = serde_json::from_str(json).map_err(|err| {
        ValidationError::field("", format!("final answer is not valid JSON: {err}"))
    })?;

    Ok(O::from_output(&value)?)
}

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````), if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ActionPlan;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_parse_output_valid() {
        let plan: ActionPlan =
            parse_output(r#"{"title":"t","steps":["a"],"effort_hours":0.5}"#).unwrap();
        assert_eq!(plan.steps, ["a"]);
    }

    #[test]
    fn test_parse_output_not_json() {
        let err = parse_output::<ActionPlan>("Here is your plan!").unwrap_err();
        let Error::Validation(err) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(err.violations()[0].message.starts_with("final answer is not valid JSON"));
    }

    #[test]
    fn test_parse_output_empty() {
        assert!(matches!(
            parse_output::<ActionPlan>("   "),
            Err(Error::Validation(_))
        ));
    }
}
