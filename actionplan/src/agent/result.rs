//! Run-level configuration and results.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::providers::{GenerateOptions, TokenUsage};

/// Per-run overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunConfig {
    /// Overrides the agent's maximum number of model calls.
    pub max_steps: Option<usize>,
    /// Abort the run if it has not finished after this long.
    pub timeout: Option<Duration>,
    /// Sampling temperature sent with every model call.
    pub temperature: Option<f32>,
    /// Completion token limit sent with every model call.
    pub max_tokens: Option<u32>,
}

impl RunConfig {
    /// Set the step limit for this run.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Set a timeout for this run.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the sampling temperature for this run.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the completion token limit for this run.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub(crate) fn apply(&self, mut options: GenerateOptions) -> GenerateOptions {
        if let Some(temperature) = self.temperature {
            options = options.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            options = options.with_max_tokens(max_tokens);
        }
        options
    }
}

/// A tool call executed during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallRecord {
    /// Provider-assigned call id.
    pub id: String,
    /// Tool name.
    pub name: String,
    /// Arguments the model supplied.
    pub arguments: Value,
    /// What the tool returned, or the rejection reported back to the model.
    pub result: Result<Value, String>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunResult<O> {
    /// The validated structured output.
    pub output: O,
    /// Tokens consumed across all model calls.
    pub usage: TokenUsage,
    /// Number of model calls made.
    pub steps: usize,
    /// Every tool call, in execution order.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Name of the agent that produced the output.
    pub agent_name: String,
}

impl<O> RunResult<O> {
    /// Discard run metadata and keep the output.
    pub fn into_output(self) -> O {
        self.output
    }

    /// Whether a tool with this name ran successfully during the run.
    #[must_use]
    pub fn called(&self, tool: &str) -> bool {
        self.tool_calls
            .iter()
            .any(|call| call.name == tool && call.result.is_ok())
    }
}
