//! Agent configuration.

use std::fmt;
use std::marker::PhantomData;

use crate::error::Result;
use crate::providers::SharedModel;
use crate::schema::StructuredOutput;
use crate::tool::{Tool, ToolRegistry};

use super::result::{RunConfig, RunResult};
use super::runner::Runner;

/// Default limit on model calls per run.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// A model plus instructions, tools over dependency bag `D`, and output type `O`.
pub struct Agent<D, O> {
    pub(crate) name: String,
    pub(crate) instructions: String,
    pub(crate) model: Option<SharedModel>,
    pub(crate) tools: ToolRegistry<D>,
    pub(crate) max_steps: usize,
    output: PhantomData<fn() -> O>,
}

impl<D, O> Agent<D, O>
where
    D: Send + Sync + 'static,
    O: StructuredOutput,
{
    /// Create an agent with no model, instructions or tools.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: String::new(),
            model: None,
            tools: ToolRegistry::new(),
            max_steps: DEFAULT_MAX_STEPS,
            output: PhantomData,
        }
    }

    /// Set the system prompt.
    #[must_use]
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Set the model.
    #[must_use]
    pub fn model(mut self, model: SharedModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Register a tool.
    #[must_use]
    pub fn tool<T: Tool<D> + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    /// Replace the whole tool registry.
    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry<D>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the default step limit.
    #[must_use]
    pub const fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// System prompt.
    #[must_use]
    pub fn get_instructions(&self) -> &str {
        &self.instructions
    }

    /// Identifier of the configured model, if any.
    #[must_use]
    pub fn get_model(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.model_id())
    }

    /// Registered tools.
    #[must_use]
    pub const fn get_tools(&self) -> &ToolRegistry<D> {
        &self.tools
    }

    /// Run the agent once. `deps` is owned by the run and lent to every tool.
    ///
    /// # Errors
    ///
    /// See [`Runner::run`].
    pub async fn run(&self, input: &str, deps: D, config: RunConfig) -> Result<RunResult<O>> {
        Runner::run(self, input, deps, config).await
    }
}

impl<D, O> fmt::Debug for Agent<D, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model.as_deref().map(|m| m.model_id()))
            .field("tools", &self.tools)
            .field("max_steps", &self.max_steps)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ActionPlan, Deps};
    use crate::tools::{EstimateEffort, GetWeather};

    #[test]
    fn test_builder() {
        let agent: Agent<Deps, ActionPlan> = Agent::new("planner")
            .instructions("Be precise.")
            .tool(GetWeather::default())
            .tool(EstimateEffort)
            .max_steps(4);

        assert_eq!(agent.name(), "planner");
        assert_eq!(agent.get_instructions(), "Be precise.");
        assert_eq!(agent.get_model(), None);
        assert_eq!(agent.get_tools().len(), 2);
        assert_eq!(agent.max_steps, 4);
    }
}
