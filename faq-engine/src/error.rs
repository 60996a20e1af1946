//! Typed error for the faq-engine crate.

use thiserror::Error;

/// Only construction can fail; answering always yields text.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The chat client could not be created from its config.
    #[error("LLM client error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),
}
