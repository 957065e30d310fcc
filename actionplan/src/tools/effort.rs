//! Effort estimation tool.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::schema::Deps;
use crate::tool::{Tool, ToolResult};

/// Tasks longer than this many characters count as a full hour.
const LONG_TASK_CHARS: usize = 60;

/// Estimate hours for a list of tasks.
///
/// Each task longer than 60 characters adds `1.0`, anything else adds `0.5`.
/// An empty list is `0.0`. Length is counted in characters, not bytes.
#[must_use]
pub fn estimate_effort<S: AsRef<str>>(tasks: &[S]) -> f64 {
    tasks
        .iter()
        .map(|task| {
            if task.as_ref().chars().count() > LONG_TASK_CHARS {
                1.0
            } else {
                0.5
            }
        })
        .sum()
}

/// Arguments for [`EstimateEffort`].
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EstimateEffortArgs {
    /// Tasks to estimate, in order.
    pub tasks: Vec<String>,
}

/// `estimate_effort` tool: total hours for a list of tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimateEffort;

#[async_trait]
impl Tool<Deps> for EstimateEffort {
    const NAME: &'static str = "estimate_effort";
    type Args = EstimateEffortArgs;
    type Output = f64;

    fn description(&self) -> String {
        "Estimate the effort in hours for a list of tasks. \
         Longer, more detailed tasks take more time."
            .into()
    }

    async fn call(&self, _deps: &Deps, args: EstimateEffortArgs) -> ToolResult<f64> {
        Ok(estimate_effort(&args.tasks))
    }
}
