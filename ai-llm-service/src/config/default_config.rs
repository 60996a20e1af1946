//! Default chat config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`        = provider credential (mandatory)
//! - `OPENAI_URL`            = API base URL (default `https://api.openai.com`)
//! - `OPENAI_MODEL`          = model identifier (default `gpt-4o-mini`)
//! - `LLM_MAX_TOKENS`        = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS`      = per-attempt timeout (default 60)
//! - `LLM_MAX_RETRIES`       = retries for transient failures (default 2)
//! - `LLM_RETRY_BACKOFF_MS`  = first retry delay, doubled per attempt (default 500)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        ConfigError, EnvLookup, Result, env_opt_u32, env_or, env_u64_or, must_env,
        validate_http_endpoint,
    },
};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Builds the chat config from `env` (see [`crate::error_handler::process_env`]).
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if `OPENAI_API_KEY` is missing
/// - [`ConfigError::InvalidNumber`] for malformed numeric knobs
/// - [`ConfigError::InvalidFormat`] if `OPENAI_URL` is not http(s)
pub fn config_openai_chat_from(env: EnvLookup<'_>) -> Result<LlmModelConfig> {
    let api_key = must_env(env, "OPENAI_API_KEY")?;

    let endpoint = env_or(env, "OPENAI_URL", DEFAULT_OPENAI_URL);
    validate_http_endpoint("OPENAI_URL", endpoint.trim())?;

    let model = env_or(env, "OPENAI_MODEL", DEFAULT_OPENAI_MODEL);
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let retries = env_u64_or(env, "LLM_MAX_RETRIES", 2)?;
    let max_retries = u32::try_from(retries).map_err(|_| ConfigError::InvalidNumber {
        var: "LLM_MAX_RETRIES",
        reason: "expected u32",
    })?;

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key,
        max_tokens: env_opt_u32(env, "LLM_MAX_TOKENS")?,
        temperature: None,
        top_p: None,
        timeout_secs: env_u64_or(env, "LLM_TIMEOUT_SECS", 60)?,
        max_retries,
        retry_backoff_ms: env_u64_or(env, "LLM_RETRY_BACKOFF_MS", 500)?,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error_handler::AiLlmError;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn missing_key_is_fatal() {
        let env = lookup(&[]);
        let err = config_openai_chat_from(&env).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn defaults_apply() {
        let env = lookup(&[("OPENAI_API_KEY", "sk-test")]);
        let cfg = config_openai_chat_from(&env).unwrap();
        assert_eq!(cfg.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(cfg.endpoint, DEFAULT_OPENAI_URL);
        assert_eq!(cfg.timeout_secs, 60);
        assert_eq!(cfg.max_retries, 2);
        assert_eq!(cfg.retry_backoff_ms, 500);
        assert_eq!(cfg.max_tokens, None);
    }

    #[test]
    fn overrides_and_validation() {
        let env = lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_URL", "http://127.0.0.1:9999"),
            ("OPENAI_MODEL", "gpt-test"),
            ("LLM_MAX_TOKENS", "256"),
            ("LLM_MAX_RETRIES", "0"),
        ]);
        let cfg = config_openai_chat_from(&env).unwrap();
        assert_eq!(cfg.endpoint, "http://127.0.0.1:9999");
        assert_eq!(cfg.model, "gpt-test");
        assert_eq!(cfg.max_tokens, Some(256));
        assert_eq!(cfg.max_retries, 0);

        let bad = lookup(&[("OPENAI_API_KEY", "k"), ("OPENAI_URL", "api.openai.com")]);
        assert!(config_openai_chat_from(&bad).is_err());
    }
}
