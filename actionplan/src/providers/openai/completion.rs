//! Chat Completions request/response mapping.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::client::OpenAIClient;
use crate::error::LlmError;
use crate::message::ChatMessage;
use crate::providers::{
    GenerateOptions, Model, ModelResponse, TokenUsage, model_requires_max_completion_tokens,
};

/// An `OpenAI` chat model bound to a client.
#[derive(Debug, Clone)]
pub struct OpenAIModel {
    client: OpenAIClient,
    model_id: String,
}

impl OpenAIModel {
    /// Create a model handle.
    #[must_use]
    pub fn new(client: OpenAIClient, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl Model for OpenAIModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(
        &self,
        messages: &[ChatMessage],
        options: &GenerateOptions,
    ) -> Result<ModelResponse, LlmError> {
        let url = format!("{}/chat/completions", self.client.base_url());
        let body = build_request_body(&self.model_id, messages, options);

        debug!(
            model = %self.model_id,
            messages = messages.len(),
            tools = options.tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .http_client()
            .post(&url)
            .headers(self.client.auth_headers())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(
                "openai",
                status.as_u16(),
                error_message(&text),
            ));
        }

        let completion: CompletionResponse = response.json().await?;
        completion.into_model_response()
    }

    fn provider(&self) -> &'static str {
        "openai"
    }
}

/// Build the JSON body of a `POST /chat/completions` request.
pub(crate) fn build_request_body(
    model_id: &str,
    messages: &[ChatMessage],
    options: &GenerateOptions,
) -> Value {
    let mut body = json!({
        "model": model_id,
        "messages": messages,
    });

    if options.has_tools() {
        body["tools"] = Value::Array(
            options
                .tools
                .iter()
                .map(|tool| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": tool.name,
                            "description": tool.description,
                            "parameters": tool.parameters,
                        }
                    })
                })
                .collect(),
        );
    }

    if let Some(temperature) = options.temperature {
        body["temperature"] = json!(temperature);
    }

    if let Some(max_tokens) = options.max_tokens {
        let key = if model_requires_max_completion_tokens(model_id) {
            "max_completion_tokens"
        } else {
            "max_tokens"
        };
        body[key] = json!(max_tokens);
    }

    if let Some(format) = &options.response_format {
        body["response_format"] = format.clone();
    }

    body
}

/// Pull `error.message` out of an `OpenAI` error body, or return the body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| body.to_owned())
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(flatten)]
    message: ChatMessage,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl CompletionResponse {
    fn into_model_response(self) -> Result<ModelResponse, LlmError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::response_format("at least one choice", "none"))?;

        if let Some(refusal) = choice.message.refusal {
            return Err(LlmError::provider(
                "openai",
                format!("model refused: {refusal}"),
            ));
        }

        let mut response = ModelResponse::new(choice.message.message);
        if let Some(usage) = self.usage {
            response = response.with_token_usage(TokenUsage::new(
                u32::try_from(usage.prompt_tokens).unwrap_or(u32::MAX),
                u32::try_from(usage.completion_tokens).unwrap_or(u32::MAX),
            ));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmErrorKind;
    use crate::message::Role;
    use crate::providers::json_schema_format;
    use crate::tool::ToolDefinition;

    fn weather_tool() -> ToolDefinition {
        ToolDefinition {
            name: "get_weather".into(),
            description: "Get the weather".into(),
            parameters: json!({ "type": "object", "properties": {} }),
            returns: json!({ "type": "object" }),
        }
    }

    #[test]
    fn test_request_body_minimal() {
        let body = build_request_body(
            "gpt-4o",
            &[ChatMessage::user("hi")],
            &GenerateOptions::new(),
        );
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o",
                "messages": [{ "role": "user", "content": "hi" }]
            })
        );
    }

    #[test]
    fn test_request_body_tools_and_format() {
        let options = GenerateOptions::new()
            .with_tools(vec![weather_tool()])
            .with_response_format(json_schema_format("ActionPlan", json!({ "type": "object" })))
            .with_max_tokens(256);
        let body = build_request_body("gpt-4o", &[ChatMessage::user("hi")], &options);

        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "get_weather");
        assert!(body["tools"][0]["function"].get("returns").is_none());
        assert_eq!(body["response_format"]["json_schema"]["name"], "ActionPlan");
        assert_eq!(body["max_tokens"], 256);
    }

    #[test]
    fn test_request_body_reasoning_model_token_limit() {
        let options = GenerateOptions::new().with_max_tokens(64);
        let body = build_request_body("o4-mini", &[], &options);
        assert_eq!(body["max_completion_tokens"], 64);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_parse_tool_call_response() {
        let completion: CompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": null,
                    "refusal": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "get_weather", "arguments": "{}" }
                    }]
                }
            }],
            "usage": { "prompt_tokens": 120, "completion_tokens": 12, "total_tokens": 132 }
        }))
        .unwrap();

        let response = completion.into_model_response().unwrap();
        assert_eq!(response.message.role, Role::Assistant);
        assert!(response.has_tool_calls());
        assert_eq!(response.token_usage, Some(TokenUsage::new(120, 12)));
    }

    #[test]
    fn test_parse_refusal() {
        let completion: CompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": { "role": "assistant", "content": null, "refusal": "I can't help with that." }
            }]
        }))
        .unwrap();

        let err = completion.into_model_response().unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Provider);
        assert!(err.message.contains("I can't help"));
    }

    #[test]
    fn test_parse_no_choices() {
        let completion: CompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        let err = completion.into_model_response().unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::ResponseFormat);
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided");
        assert_eq!(error_message("upstream timeout"), "upstream timeout");
    }
}
