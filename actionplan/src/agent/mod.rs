//! Agent module: configuration and the run loop.
//!
//! - **[`Agent`]** bundles a model, system instructions, a typed tool
//!   registry over dependency bag `D`, and the structured output type `O`.
//! - **[`Runner`]** is a stateless engine that drives one run: it calls the
//!   model, executes requested tools with a shared reference to the run's
//!   dependencies, and validates the final answer against `O`.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use actionplan::agent::{Agent, RunConfig};
//! use actionplan::providers::OpenAIClient;
//! use actionplan::schema::{ActionPlan, Deps};
//! use actionplan::tools::{EstimateEffort, GetWeather};
//!
//! let model = Arc::new(OpenAIClient::from_env()?.completion_model("gpt-4o"));
//! let agent: Agent<Deps, ActionPlan> = Agent::new("planner")
//!     .instructions("You are a precise, delivery-focused assistant.")
//!     .model(model)
//!     .tool(GetWeather::default())
//!     .tool(EstimateEffort);
//!
//! let result = agent.run("Plan a picnic", Deps::default(), RunConfig::default()).await?;
//! println!("{}", result.output.title);
//! ```

mod config;
mod result;
mod runner;

pub use config::{Agent, DEFAULT_MAX_STEPS};
pub use result::{RunConfig, RunResult, ToolCallRecord};
pub use runner::Runner;
