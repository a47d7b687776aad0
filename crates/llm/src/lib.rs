//! LLM integration for the lead qualification agent
//!
//! Features:
//! - Local backend (Ollama) with retry and backoff
//! - Cloud backend (Anthropic Messages API) for escalated turns
//! - Prompt construction with live profile state
//! - `Responder` implementation that degrades to an apology reply on failure

pub mod backend;
pub mod claude;
pub mod prompt;
pub mod responder;

pub use backend::{GenerationResult, LlmBackend, LlmConfig, OllamaBackend};
pub use claude::{ClaudeBackend, ClaudeConfig};
pub use prompt::{Message, PromptBuilder, Role};
pub use responder::TieredResponder;

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for lead_agent_core::Error {
    fn from(err: LlmError) -> Self {
        lead_agent_core::Error::Llm(err.to_string())
    }
}
