//! Unified error types for actionplan.
//!
//! The hierarchy mirrors the three failure families of a planning run:
//! - [`ValidationError`]: data does not match a declared schema
//! - [`LlmError`]: the model provider call failed
//! - [`ToolError`]: a tool failed while executing
//!
//! The runner reports rejected tool calls back to the model. Every other
//! error propagates to the caller of [`run`](crate::planner::run) unchanged.

use std::fmt;
use std::time::Duration;

/// Result type alias for actionplan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for actionplan.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Schema validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// LLM provider error.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Tool execution error.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Agent configuration or runtime error.
    #[error("Agent error: {0}")]
    Agent(String),

    /// Maximum steps reached during agent execution.
    #[error("Maximum steps ({max_steps}) reached without final answer")]
    MaxSteps {
        /// The maximum number of steps configured.
        max_steps: usize,
    },

    /// The run did not finish within the configured timeout.
    #[error("Run timed out after {0:?}")]
    Timeout(Duration),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an agent error with a message.
    #[must_use]
    pub fn agent(msg: impl Into<String>) -> Self {
        Self::Agent(msg.into())
    }

    /// Create a max steps error.
    #[must_use]
    pub const fn max_steps(max_steps: usize) -> Self {
        Self::MaxSteps { max_steps }
    }
}

/// A single violated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dot-separated path to the field (e.g. `weather.temperature_c`, `steps.2`).
    /// Empty when the value itself has the wrong shape.
    pub path: String,
    /// What is wrong with the field.
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Structured validation failure listing every violated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Create a validation error from a list of violations.
    #[must_use]
    pub const fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Create a validation error for a single field.
    #[must_use]
    pub fn field(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation {
            path: path.into(),
            message: message.into(),
        }])
    }

    /// All violations, in the order they were found.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Whether any violation was recorded at `path`.
    #[must_use]
    pub fn has_path(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }

    /// Consume the error, returning its violations.
    #[must_use]
    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.violations.len();
        write!(
            f,
            "{count} validation error{}",
            if count == 1 { "" } else { "s" }
        )?;
        for violation in &self.violations {
            write!(f, "; {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Error type for LLM provider operations.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct LlmError {
    /// The error kind.
    pub kind: LlmErrorKind,
    /// The provider name (e.g., "openai").
    pub provider: Option<String>,
    /// Additional error message.
    pub message: String,
    /// Optional error code from the provider.
    pub code: Option<String>,
}

/// Categories of LLM errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LlmErrorKind {
    /// Authentication or authorization failure.
    Auth,
    /// Rate limit exceeded.
    RateLimited,
    /// Invalid request parameters.
    InvalidRequest,
    /// Response format error.
    ResponseFormat,
    /// Network or connection error.
    Network,
    /// HTTP status error.
    HttpStatus,
    /// Provider-specific error.
    Provider,
}

impl LlmError {
    const fn with_kind(kind: LlmErrorKind, message: String) -> Self {
        Self {
            kind,
            provider: None,
            message,
            code: None,
        }
    }

    /// Create an authentication error.
    #[must_use]
    pub fn auth(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            ..Self::with_kind(LlmErrorKind::Auth, message.into())
        }
    }

    /// Create a rate limit error.
    #[must_use]
    pub fn rate_limited(provider: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            ..Self::with_kind(
                LlmErrorKind::RateLimited,
                "Rate limit exceeded. Please retry after some time.".into(),
            )
        }
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::with_kind(LlmErrorKind::InvalidRequest, message.into())
    }

    /// Create a response format error.
    #[must_use]
    pub fn response_format(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::with_kind(
            LlmErrorKind::ResponseFormat,
            format!("Expected {}, got {}", expected.into(), got.into()),
        )
    }

    /// Create a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::with_kind(LlmErrorKind::Network, message.into())
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            code: Some(status.to_string()),
            ..Self::with_kind(
                LlmErrorKind::HttpStatus,
                format!("HTTP {status}: {}", body.into()),
            )
        }
    }

    /// Create a provider-specific error.
    #[must_use]
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            ..Self::with_kind(LlmErrorKind::Provider, message.into())
        }
    }

    /// Classify a non-success HTTP response from a provider.
    #[must_use]
    pub fn from_status(provider: &str, status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let mut err = match status {
            401 | 403 => Self::auth(provider, body),
            429 => Self::rate_limited(provider),
            400 => Self::invalid_request(body),
            _ => Self::http_status(status, body),
        };
        err.provider = Some(provider.to_owned());
        err.code.get_or_insert_with(|| status.to_string());
        err
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{provider}] ")?;
        }
        write!(f, "{}", self.message)?;
        if let Some(code) = &self.code {
            write!(f, " (code: {code})")?;
        }
        Ok(())
    }
}

impl std::error::Error for LlmError {}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else if err.is_decode() {
            Self::response_format("chat completion JSON", err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Error type for tool execution failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ToolError {
    /// Error during tool execution.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Arguments did not match the tool's parameter schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Tool not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// A backing service could not produce a result.
    #[error("Lookup failed: {0}")]
    Lookup(String),
}

impl ToolError {
    /// Create an execution error.
    #[must_use]
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create an invalid arguments error.
    #[must_use]
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a lookup error.
    #[must_use]
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Whether the model can fix this by issuing a different call.
    ///
    /// The runner reports these back to the model instead of aborting.
    #[must_use]
    pub const fn is_call_rejection(&self) -> bool {
        matches!(self, Self::InvalidArguments(_) | Self::NotFound(_))
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Execution(err.to_string())
    }
}
