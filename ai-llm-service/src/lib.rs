//! Chat-completion client for the FAQ assistant.
//!
//! - [`config`]: model/endpoint/retry settings loaded from the environment.
//! - [`error_handler`]: unified [`AiLlmError`] with classified provider failures.
//! - [`services::open_ai_service`]: non-streaming `/v1/chat/completions` client.
//! - [`telemetry`]: formatting layer and filter helpers for the binary.

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use chat::{ChatMessage, Role};
pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{AiLlmError, ConfigError, ProviderError};
pub use services::open_ai_service::OpenAiService;
