//! Service configuration resolved from the environment at startup.

use std::path::PathBuf;

use ai_llm_service::{
    LlmModelConfig,
    config::default_config::config_openai_chat_from,
    error_handler::{EnvLookup, env_or, process_env},
};

use crate::error_handler::AppResult;

pub const DEFAULT_API_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_KB_FILE: &str = "knowledge_base.json";
pub const DEFAULT_QUERY_LOG_PATH: &str = "data/query_logs.jsonl";

/// Everything the HTTP service needs to boot.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Listen address (`API_ADDRESS`).
    pub address: String,
    /// Knowledge file (`KB_FILE`).
    pub kb_file: PathBuf,
    /// Query log collection (`QUERY_LOG_PATH`).
    pub query_log_path: PathBuf,
    /// Provider settings; `OPENAI_API_KEY` is mandatory.
    pub llm: LlmModelConfig,
}

impl ApiConfig {
    /// Loads the config from process environment variables.
    ///
    /// # Errors
    /// Fails when the provider credential is missing or a value is malformed.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(env: EnvLookup<'_>) -> AppResult<Self> {
        Ok(Self {
            address: env_or(env, "API_ADDRESS", DEFAULT_API_ADDRESS),
            kb_file: env_or(env, "KB_FILE", DEFAULT_KB_FILE).into(),
            query_log_path: env_or(env, "QUERY_LOG_PATH", DEFAULT_QUERY_LOG_PATH).into(),
            llm: config_openai_chat_from(env)?,
        })
    }
}
