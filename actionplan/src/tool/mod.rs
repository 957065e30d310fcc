//! Tool traits and the explicit tool registry.
//!
//! A [`Tool`] is a typed function the model may call mid-run. Its argument
//! and return types declare JSON Schemas through `schemars`, and every call
//! receives the run's dependency bag as its first argument.
//!
//! Tools are collected in a [`ToolRegistry`] by explicit
//! [`register`](ToolRegistry::register) calls. The registry erases the
//! argument/output types behind [`ToolDyn`] so tools of different shapes
//! can live side by side.
//!
//! # Example
//!
//! ```rust,ignore
//! use actionplan::schema::Deps;
//! use actionplan::tool::ToolRegistry;
//! use actionplan::tools::{EstimateEffort, GetWeather};
//!
//! let mut registry = ToolRegistry::<Deps>::new();
//! registry.register(GetWeather::default());
//! registry.register(EstimateEffort);
//! assert_eq!(registry.names(), ["estimate_effort", "get_weather"]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ToolError;
use crate::schema::json_schema_for;

/// Result type for tool calls.
pub type ToolResult<T> = Result<T, ToolError>;

/// Declared signature of a tool, as presented to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name the model refers to.
    pub name: String,
    /// What the tool does.
    pub description: String,
    /// JSON Schema of the arguments object.
    pub parameters: Value,
    /// JSON Schema of the returned value.
    pub returns: Value,
}

/// A typed tool operating on dependency bag `D`.
#[async_trait]
pub trait Tool<D: Sync>: Send + Sync {
    /// Unique tool name.
    const NAME: &'static str;

    /// Arguments the model must supply.
    type Args: DeserializeOwned + JsonSchema + Send;

    /// Value returned to the model.
    type Output: Serialize + JsonSchema + Send;

    /// Human-readable description for the model.
    fn description(&self) -> String;

    /// JSON Schema of [`Self::Args`].
    fn parameters_schema(&self) -> Value {
        json_schema_for::<Self::Args>()
    }

    /// JSON Schema of [`Self::Output`].
    fn return_schema(&self) -> Value {
        json_schema_for::<Self::Output>()
    }

    /// Run the tool. `deps` is shared, read-only run context.
    async fn call(&self, deps: &D, args: Self::Args) -> ToolResult<Self::Output>;
}

/// Object-safe, JSON-in/JSON-out view of a [`Tool`].
#[async_trait]
pub trait ToolDyn<D>: Send + Sync {
    /// Tool name.
    fn name(&self) -> &str;

    /// Declared signature.
    fn definition(&self) -> ToolDefinition;

    /// Validate `args`, run the tool, and serialize its output.
    async fn call_json(&self, deps: &D, args: Value) -> ToolResult<Value>;
}

#[async_trait]
impl<D, T> ToolDyn<D> for T
where
    D: Send + Sync + 'static,
    T: Tool<D> + 'static,
{
    fn name(&self) -> &str {
        T::NAME
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: T::NAME.to_owned(),
            description: self.description(),
            parameters: self.parameters_schema(),
            returns: self.return_schema(),
        }
    }

    async fn call_json(&self, deps: &D, args: Value) -> ToolResult<Value> {
        let args: T::Args = serde_path_to_error::deserialize(args).map_err(|err| {
            let path = err.path().to_string();
            if path == "." {
                ToolError::invalid_args(err.into_inner().to_string())
            } else {
                ToolError::invalid_args(format!("{path}: {}", err.into_inner()))
            }
        })?;
        let output = self.call(deps, args).await?;
        Ok(serde_json::to_value(output)?)
    }
}

/// A boxed tool for dynamic dispatch.
pub type BoxedTool<D> = Box<dyn ToolDyn<D>>;

/// Name → tool mapping, built by explicit registration.
pub struct ToolRegistry<D> {
    tools: BTreeMap<String, BoxedTool<D>>,
}

impl<D: Send + Sync + 'static> ToolRegistry<D> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool, replacing any tool already registered under its name.
    pub fn register<T: Tool<D> + 'static>(&mut self, tool: T) -> &mut Self {
        self.register_boxed(Box::new(tool))
    }

    /// Register an already-boxed tool.
    pub fn register_boxed(&mut self, tool: BoxedTool<D>) -> &mut Self {
        let name = tool.name().to_owned();
        if self.tools.insert(name.clone(), tool).is_some() {
            debug!(tool = %name, "Replaced previously registered tool");
        }
        self
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with<T: Tool<D> + 'static>(mut self, tool: T) -> Self {
        self.register(tool);
        self
    }

    /// Whether a tool with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tool names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions of every registered tool, sorted by name.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// Call a tool by name with raw JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] for unknown names,
    /// [`ToolError::InvalidArguments`] when `args` does not match the tool's
    /// parameter schema, or whatever error the tool itself produces.
    pub async fn call(&self, name: &str, deps: &D, args: Value) -> ToolResult<Value> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::not_found(name))?;
        debug!(tool = name, %args, "Calling tool");
        tool.call_json(deps, args).await
    }
}

impl<D: Send + Sync + 'static> Default for ToolRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for ToolRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}
