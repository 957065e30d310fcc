//! `OpenAI` Chat Completions provider.
//!
//! Works with api.openai.com and any endpoint speaking the same protocol
//! (Azure `OpenAI`, local proxies, self-hosted gateways).

mod client;
mod completion;

pub use client::{OPENAI_API_BASE_URL, OpenAIClient, OpenAIClientBuilder};
pub use completion::OpenAIModel;
