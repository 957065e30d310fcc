//! Core types for model providers.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::message::{ChatMessage, ToolCall};
use crate::tool::ToolDefinition;

/// Token usage information from a model response.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    /// Number of tokens in the input/prompt.
    pub input_tokens: u32,
    /// Number of tokens in the output/completion.
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Create new token usage with specified counts.
    #[must_use]
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Get total token count.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

impl std::ops::Add for TokenUsage {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            input_tokens: self.input_tokens.saturating_add(rhs.input_tokens),
            output_tokens: self.output_tokens.saturating_add(rhs.output_tokens),
        }
    }
}

impl std::ops::AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::fmt::Display for TokenUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} tokens (in: {}, out: {})",
            self.total(),
            self.input_tokens,
            self.output_tokens
        )
    }
}

/// Response from a model generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The generated message.
    pub message: ChatMessage,
    /// Token usage information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsage>,
}

impl ModelResponse {
    /// Create a new model response.
    #[must_use]
    pub const fn new(message: ChatMessage) -> Self {
        Self {
            message,
            token_usage: None,
        }
    }

    /// Set token usage.
    #[must_use]
    pub const fn with_token_usage(mut self, usage: TokenUsage) -> Self {
        self.token_usage = Some(usage);
        self
    }

    /// Get the text content of the response.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.message.text_content()
    }

    /// Get tool calls from the response.
    #[must_use]
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        self.message.tool_calls.as_deref()
    }

    /// Check if the response contains tool calls.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls().is_some_and(|tc| !tc.is_empty())
    }
}

/// Options for model generation requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Available tools for function calling.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    /// Temperature for sampling (0.0 to 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Response format (see [`json_schema_format`]).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

impl GenerateOptions {
    /// Create new default generate options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set available tools for function calling.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Set temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens.
    #[must_use]
    pub const fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set response format.
    #[must_use]
    pub fn with_response_format(mut self, format: Value) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Check if tools are configured.
    #[must_use]
    pub fn has_tools(&self) -> bool {
        !self.tools.is_empty()
    }
}

/// A `json_schema` response format asking the model for JSON matching `schema`.
///
/// Non-strict: optional fields stay optional, and the answer is validated
/// locally anyway.
#[must_use]
pub fn json_schema_format(name: &str, schema: Value) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": name,
            "schema": schema,
            "strict": false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_add_assign() {
        let mut usage = TokenUsage::new(100, 50);
        usage += TokenUsage::new(200, 100);

        assert_eq!(usage.input_tokens, 300);
        assert_eq!(usage.output_tokens, 150);
        assert_eq!(usage.total(), 450);
    }

    #[test]
    fn test_token_usage_saturating_add() {
        let sum = TokenUsage::new(u32::MAX, u32::MAX) + TokenUsage::new(1, 1);
        assert_eq!(sum.input_tokens, u32::MAX);
        assert_eq!(sum.total(), u32::MAX);
    }

    #[test]
    fn test_token_usage_display() {
        assert_eq!(
            TokenUsage::new(10, 5).to_string(),
            "15 tokens (in: 10, out: 5)"
        );
    }

    #[test]
    fn test_generate_options_builder() {
        let opts = GenerateOptions::new()
            .with_temperature(0.2)
            .with_max_tokens(500)
            .with_response_format(json_schema_format("Plan", json!({ "type": "object" })));

        assert_eq!(opts.temperature, Some(0.2));
        assert_eq!(opts.max_tokens, Some(500));
        assert!(!opts.has_tools());

        let format = opts.response_format.unwrap();
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], "Plan");
        assert_eq!(format["json_schema"]["strict"], false);
    }

    #[test]
    fn test_model_response_tool_calls() {
        let response = ModelResponse::new(ChatMessage::assistant("done"));
        assert!(!response.has_tool_calls());
        assert_eq!(response.text(), Some("done"));

        let response = ModelResponse::new(ChatMessage::assistant_tool_calls(vec![]));
        assert!(!response.has_tool_calls());
    }
}
