//! Chat messages in the shape of the OpenAI Chat Completions API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// End-user input.
    User,
    /// Model output.
    Assistant,
    /// Result of a tool call.
    Tool,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message.
    pub role: Role,
    /// Text content. Assistant messages that only call tools have none.
    #[serde(default)]
    pub content: Option<String>,
    /// Tool calls requested by the assistant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// For [`Role::Tool`] messages, the call being answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    /// Create an assistant text message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// Create an assistant message that only requests tool calls.
    #[must_use]
    pub const fn assistant_tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: None,
            tool_calls: Some(calls),
            tool_call_id: None,
        }
    }

    /// Create a tool result message answering `tool_call_id`.
    #[must_use]
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::text(Role::Tool, content)
        }
    }

    /// Text content, if any.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id.
    pub id: String,
    /// Always `"function"`.
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    /// The function being called.
    pub function: FunctionCall,
}

/// Function name and JSON-encoded arguments of a [`ToolCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Tool name.
    pub name: String,
    /// Arguments as a JSON string, exactly as the model produced them.
    pub arguments: String,
}

fn function_kind() -> String {
    "function".to_owned()
}

impl ToolCall {
    /// Create a tool call with already-structured arguments.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: &Value) -> Self {
        Self {
            id: id.into(),
            kind: function_kind(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.to_string(),
            },
        }
    }

    /// Tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Decode the arguments. An empty string means no arguments (`{}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the model produced malformed JSON.
    pub fn arguments(&self) -> serde_json::Result<Value> {
        let raw = self.function.arguments.trim();
        if raw.is_empty() {
            Ok(Value::Object(serde_json::Map::new()))
        } else {
            serde_json::from_str(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tool_result_wire_format() {
        let msg = ChatMessage::tool_result("call_1", "42");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "role": "tool", "content": "42", "tool_call_id": "call_1" })
        );
    }

    #[test]
    fn test_assistant_tool_calls_wire_format() {
        let msg = ChatMessage::assistant_tool_calls(vec![ToolCall::new(
            "call_1",
            "get_weather",
            &json!({ "city": "Delhi" }),
        )]);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["content"], Value::Null);
        assert_eq!(value["tool_calls"][0]["type"], "function");
        assert_eq!(value["tool_calls"][0]["function"]["name"], "get_weather");
        assert_eq!(
            value["tool_calls"][0]["function"]["arguments"],
            "{\"city\":\"Delhi\"}"
        );
    }

    #[test]
    fn test_parse_provider_message() {
        let msg: ChatMessage = serde_json::from_value(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_9",
                "type": "function",
                "function": { "name": "estimate_effort", "arguments": "{\"tasks\":[]}" }
            }],
            "refusal": null
        }))
        .unwrap();

        let calls = msg.tool_calls.unwrap();
        assert_eq!(calls[0].name(), "estimate_effort");
        assert_eq!(calls[0].arguments().unwrap(), json!({ "tasks": [] }));
    }

    #[test]
    fn test_empty_arguments() {
        let mut call = ToolCall::new("c", "get_weather", &json!({}));
        call.function.arguments = String::new();
        assert_eq!(call.arguments().unwrap(), json!({}));

        call.function.arguments = "{not json".into();
        assert!(call.arguments().is_err());
    }
}
