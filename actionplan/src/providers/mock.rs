//! Scripted model for tests and offline runs.
//!
//! [`MockModel`] replays a queue of prepared responses in order and records
//! every request it receives, so a whole agent run can be exercised without a
//! network.
//!
//! ```rust,ignore
//! use actionplan::providers::MockModel;
//! use serde_json::json;
//!
//! let model = MockModel::new("mock")
//!     .with_tool_call("call_1", "get_weather", json!({}))
//!     .with_text(r#"{"title":"t","steps":[],"effort_hours":0}"#);
//! ```

use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::LlmError;
use crate::message::{ChatMessage, ToolCall};
use crate::providers::{GenerateOptions, Model, ModelResponse};

/// A request seen by [`MockModel`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Conversation sent to the model.
    pub messages: Vec<ChatMessage>,
    /// Options sent with it.
    pub options: GenerateOptions,
}

/// One scripted step: a response or a provider failure.
type Scripted = Result<ModelResponse, LlmError>;

/// Model that replays scripted responses.
#[derive(Debug)]
pub struct MockModel {
    model_id: String,
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockModel {
    /// Create a mock with no scripted responses.
    #[must_use]
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a full response.
    #[must_use]
    pub fn with_response(mut self, response: ModelResponse) -> Self {
        self.responses.get_mut().push_back(Ok(response));
        self
    }

    /// Queue a plain assistant text answer.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_response(ModelResponse::new(ChatMessage::assistant(text)))
    }

    /// Queue a single tool call.
    #[must_use]
    pub fn with_tool_call(
        self,
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: Value,
    ) -> Self {
        self.with_tool_calls(vec![ToolCall::new(id, name, &arguments)])
    }

    /// Queue several tool calls issued in one step.
    #[must_use]
    pub fn with_tool_calls(self, calls: Vec<ToolCall>) -> Self {
        self.with_response(ModelResponse::new(ChatMessage::assistant_tool_calls(calls)))
    }

    /// Queue a provider failure.
    #[must_use]
    pub fn with_error(mut self, error: LlmError) -> Self {
        self.responses.get_mut().push_back(Err(error));
        self
    }

    /// Requests received so far.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of scripted responses not yet consumed.
    pub async fn remaining(&self) -> usize {
        self.responses.lock().await.len()
    }
}

#[async_trait]
impl Model for MockModel {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(
        &self,
        messages: &[ChatMessage],
        options: &GenerateOptions,
    ) -> Result<ModelResponse, LlmError> {
        self.requests.lock().await.push(RecordedRequest {
            messages: messages.to_vec(),
            options: options.clone(),
        });

        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::provider("mock", "no scripted responses left")))
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::LlmErrorKind;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let model = MockModel::new("mock")
            .with_tool_call("c1", "get_weather", json!({}))
            .with_text("done");

        let first = model
            .generate(&[ChatMessage::user("one")], &GenerateOptions::new())
            .await
            .unwrap();
        assert!(first.has_tool_calls());

        let second = model
            .generate(&[ChatMessage::user("two")], &GenerateOptions::new())
            .await
            .unwrap();
        assert_eq!(second.text(), Some("done"));

        let requests = model.requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].messages[0].text_content(), Some("two"));
        assert_eq!(model.remaining().await, 0);
    }

    #[tokio::test]
    async fn test_exhausted_script_is_provider_error() {
        let model = MockModel::new("mock");
        let err = model
            .generate(&[], &GenerateOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Provider);
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let model = MockModel::new("mock").with_error(LlmError::rate_limited("mock"));
        let err = model
            .generate(&[], &GenerateOptions::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::RateLimited);
    }
}
