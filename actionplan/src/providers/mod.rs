//! Model providers.
//!
//! The agent never talks HTTP itself; it hands messages, tool definitions and
//! an output schema to a [`Model`] and gets one [`ModelResponse`] back. Two
//! providers ship with the crate:
//!
//! - **`OpenAI`** ([`OpenAIClient`]): the Chat Completions API and compatible
//!   endpoints
//! - **Mock** ([`MockModel`]): scripted responses for tests and offline runs
//!
//! # Example
//!
//! ```rust,ignore
//! use actionplan::providers::OpenAIClient;
//!
//! let client = OpenAIClient::from_env()?;
//! let gpt4o = client.completion_model("gpt-4o");
//! ```

mod config;
mod types;

pub mod mock;
pub mod openai;

pub use config::HttpClientConfig;
pub use mock::MockModel;
pub use openai::{OpenAIClient, OpenAIModel};
pub use types::{GenerateOptions, ModelResponse, TokenUsage, json_schema_format};

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::message::ChatMessage;

/// The core trait for language model implementations.
#[async_trait]
pub trait Model: Send + Sync {
    /// Get the model identifier (e.g., "gpt-4o").
    fn model_id(&self) -> &str;

    /// Generate one response for the given conversation.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails or the response cannot be parsed.
    async fn generate(
        &self,
        messages: &[ChatMessage],
        options: &GenerateOptions,
    ) -> Result<ModelResponse, LlmError>;

    /// Get the provider name (e.g., "openai").
    fn provider(&self) -> &'static str {
        "unknown"
    }
}

/// A model shared between agents.
pub type SharedModel = Arc<dyn Model>;

/// Check if a model requires `max_completion_tokens` instead of `max_tokens`.
///
/// `OpenAI`'s o-series and gpt-5 series require the new parameter name.
#[must_use]
pub fn model_requires_max_completion_tokens(model_id: &str) -> bool {
    let model_name = model_id.rsplit('/').next().unwrap_or(model_id);

    model_name.starts_with("o1")
        || model_name.starts_with("o3")
        || model_name.starts_with("o4")
        || model_name.starts_with("gpt-5")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_requires_max_completion_tokens() {
        assert!(!model_requires_max_completion_tokens("gpt-4o"));
        assert!(!model_requires_max_completion_tokens("gpt-4.1-mini"));

        assert!(model_requires_max_completion_tokens("o1-mini"));
        assert!(model_requires_max_completion_tokens("o3"));
        assert!(model_requires_max_completion_tokens("o4-mini"));
        assert!(model_requires_max_completion_tokens("gpt-5"));
    }

    #[test]
    fn test_model_with_provider_prefix() {
        assert!(model_requires_max_completion_tokens("openai/o3"));
        assert!(!model_requires_max_completion_tokens("openai/gpt-4o"));
    }
}
