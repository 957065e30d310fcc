//! Commonly used types, for glob import.

pub use crate::agent::{Agent, RunConfig, RunResult, Runner, ToolCallRecord};
pub use crate::error::{Error, LlmError, Result, ToolError, ValidationError};
pub use crate::message::{ChatMessage, Role, ToolCall};
pub use crate::planner::{PlannerConfig, plan_agent, run, run_blocking, run_with};
pub use crate::providers::{
    GenerateOptions, MockModel, Model, ModelResponse, OpenAIClient, SharedModel, TokenUsage,
};
pub use crate::schema::{ActionPlan, Deps, StructuredOutput, Weather};
pub use crate::tool::{Tool, ToolDefinition, ToolRegistry, ToolResult};
pub use crate::tools::{EstimateEffort, GetWeather, default_tools};
