//! External language-model capability.
//!
//! One backend is supported: OpenAI chat completions over HTTP. The
//! capability is strictly additive — without a credential the pipeline runs
//! rule-only and stays fully functional.

pub mod provider;

pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, OpenAiProvider,
};

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: SecretString,
    pub model: String,
    pub timeout: Duration,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = OpenAiProvider::new(config.api_key.clone(), config.model.clone(), config.timeout)?;
    tracing::info!("Using OpenAI (model: {})", config.model);
    Ok(Arc::new(provider))
}
