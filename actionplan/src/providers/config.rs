//! HTTP client configuration shared by providers.

use std::time::Duration;

use crate::error::LlmError;

/// Shared HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// User agent string.
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(120),
            user_agent: Some(concat!("actionplan/", env!("CARGO_PKG_VERSION")).to_owned()),
        }
    }
}

impl HttpClientConfig {
    /// Build a reqwest client with this configuration.
    ///
    /// # Errors
    ///
    /// Returns a network error if the TLS backend cannot be initialised.
    pub fn build_client(&self) -> Result<reqwest::Client, LlmError> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        if let Some(ref user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        builder
            .build()
            .map_err(|err| LlmError::network(format!("Failed to build HTTP client: {err}")))
    }
}
