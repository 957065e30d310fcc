//! `OpenAI` API client implementation.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use super::completion::OpenAIModel;
use crate::error::LlmError;
use crate::providers::HttpClientConfig;

/// Default `OpenAI` API base URL.
pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";

/// `OpenAI` API client for creating completion models.
///
/// # Example
///
/// ```rust,ignore
/// use actionplan::providers::OpenAIClient;
///
/// // From environment variable OPENAI_API_KEY
/// let client = OpenAIClient::from_env()?;
///
/// // With custom base URL (for Azure, local models, etc.)
/// let client = OpenAIClient::builder()
///     .api_key("sk-...")
///     .base_url("https://my-openai-proxy.com/v1")
///     .build()?;
/// ```
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: reqwest::Client,
    api_key: Arc<str>,
    base_url: Arc<str>,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl OpenAIClient {
    /// Create a new `OpenAI` client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::builder().api_key(api_key).build()
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> OpenAIClientBuilder {
        OpenAIClientBuilder::default()
    }

    /// Create a client from environment variables.
    ///
    /// - `OPENAI_API_KEY` (required): the API key
    /// - `OPENAI_BASE_URL` (optional): custom base URL
    ///
    /// # Errors
    ///
    /// Returns an [`Auth`](crate::error::LlmErrorKind::Auth) error if
    /// `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            LlmError::auth("openai", "OPENAI_API_KEY environment variable not set")
        })?;

        let mut builder = Self::builder().api_key(api_key);

        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        builder.build()
    }

    /// Create a completion model with the specified model ID.
    #[must_use]
    pub fn completion_model(&self, model_id: impl Into<String>) -> OpenAIModel {
        OpenAIModel::new(self.clone(), model_id)
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) const fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    pub(crate) fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);

        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

/// Builder for [`OpenAIClient`].
#[derive(Debug, Default)]
pub struct OpenAIClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    http: HttpClientConfig,
}

impl OpenAIClientBuilder {
    /// Set the API key.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a custom base URL. A trailing slash is ignored.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub const fn timeout_secs(mut self, timeout: u64) -> Self {
        self.http.timeout_secs = Some(timeout);
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.http.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an [`Auth`](crate::error::LlmErrorKind::Auth) error if no API
    /// key was set, or a network error if the HTTP client fails to build.
    pub fn build(self) -> Result<OpenAIClient, LlmError> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| LlmError::auth("openai", "API key is required"))?;
        let base_url = self
            .base_url
            .unwrap_or_else(|| OPENAI_API_BASE_URL.to_owned());
        let http_client = self.http.build_client()?;

        Ok(OpenAIClient {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmErrorKind;

    #[test]
    fn test_client_builder() {
        let client = OpenAIClient::builder()
            .api_key("test-key")
            .base_url("https://custom.api.com/v1/")
            .timeout_secs(30)
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://custom.api.com/v1");
    }

    #[test]
    fn test_default_base_url() {
        let client = OpenAIClient::new("test-key").unwrap();
        assert_eq!(client.base_url(), OPENAI_API_BASE_URL);
    }

    #[test]
    fn test_missing_api_key() {
        let err = OpenAIClient::builder().build().unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Auth);

        let err = OpenAIClient::new("").unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Auth);
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = OpenAIClient::new("sk-secret").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_auth_headers() {
        let client = OpenAIClient::new("sk-test").unwrap();
        let headers = client.auth_headers();
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }
}
