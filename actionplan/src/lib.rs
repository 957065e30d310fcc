#![cfg_attr(docsrs, feature(doc_cfg))]
//! Actionplan turns a free-text request into a validated, structured
//! [`ActionPlan`](schema::ActionPlan) by letting a language model call two
//! tools (weather lookup and effort estimation) and then checking its final
//! answer against a declared schema.
//!
//! # Quick start
//!
//! ```rust,ignore
//! let plan = actionplan::run("Plan a 3-step economic policy for India. Include weather and effort estimate.")?;
//! println!("{}", plan.to_json_pretty()?);
//! ```
//!
//! # Layout
//!
//! - [`schema`]: `Weather`, `ActionPlan`, `Deps` and their validation
//! - [`tool`]: the `Tool` trait and the name-keyed `ToolRegistry`
//! - [`tools`]: `get_weather` and `estimate_effort`
//! - [`providers`]: the `Model` trait, `OpenAI` and a scripted mock
//! - [`agent`]: the run loop tying model, tools and output schema together
//! - [`planner`]: the configured planning agent and the [`run`] entry point

pub mod agent;
pub mod error;
pub mod message;
pub mod planner;
pub mod prelude;
pub mod providers;
pub mod schema;
pub mod tool;
pub mod tools;

pub use error::{Error, Result};
pub use planner::{PlannerConfig, run, run_blocking, run_with};
pub use schema::{ActionPlan, Deps, Weather};
