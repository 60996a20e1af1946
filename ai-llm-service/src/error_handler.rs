//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested enums ([`ConfigError`],
//! [`ProviderError`]). Provider failures are classified so callers can decide
//! what is worth retrying ([`AiLlmError::is_transient`]).
//!
//! Small helpers for reading/validating environment variables are provided and
//! return the unified [`Result<T>`] alias. They take an [`EnvLookup`] so the
//! same code path reads the process environment in production and a plain map
//! in tests.
//!
//! All messages include the suffix `[AI LLM Service]` to simplify attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Classified failure reported by (or while talking to) the provider.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// HTTP client could not be constructed.
    #[error("[AI LLM Service] http client error: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl AiLlmError {
    /// `true` when the same request may succeed if sent again.
    pub fn is_transient(&self) -> bool {
        match self {
            AiLlmError::Provider(p) => p.is_transient(),
            _ => false,
        }
    }

    /// Short, stable label for structured logs (e.g. `rate_limited`).
    pub fn kind(&self) -> &'static str {
        match self {
            AiLlmError::Config(_) => "config",
            AiLlmError::HttpClient(_) => "http_client",
            AiLlmError::Provider(p) => p.kind(),
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_MAX_TOKENS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `OPENAI_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// Model name was empty.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Details of a non-successful HTTP response.
#[derive(Debug, Clone)]
pub struct HttpError {
    /// HTTP status code.
    pub status: StatusCode,
    /// Request URL.
    pub url: String,
    /// Short snippet of the response body (trimmed).
    pub snippet: String,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {} from {}: {}", self.status, self.url, self.snippet)
    }
}

/// Classified provider failure.
///
/// HTTP mapping: 401/403 → `Unauthorized`, 429 → `QuotaExceeded` when the body
/// reports `insufficient_quota` and `RateLimited` otherwise, 5xx → `Server`,
/// everything else non-2xx → `HttpStatus`.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credential rejected (HTTP 401/403).
    #[error("[AI LLM Service] unauthorized: {0}")]
    Unauthorized(HttpError),

    /// Account quota or billing limit reached.
    #[error("[AI LLM Service] quota exceeded: {0}")]
    QuotaExceeded(HttpError),

    /// Too many requests (HTTP 429).
    #[error("[AI LLM Service] rate limited (retry after {retry_after_secs:?}s)")]
    RateLimited {
        retry_after_secs: Option<u64>,
        http: HttpError,
    },

    /// Upstream server error (HTTP 5xx).
    #[error("[AI LLM Service] server error: {0}")]
    Server(HttpError),

    /// Any other non-successful status (malformed request, unknown model, ...).
    #[error("[AI LLM Service] {0}")]
    HttpStatus(HttpError),

    /// The request did not complete within the configured timeout.
    #[error("[AI LLM Service] request timed out after {0}s")]
    Timeout(u64),

    /// Connection/DNS/TLS failure without an HTTP status.
    #[error("[AI LLM Service] network error: {0}")]
    Network(String),

    /// Response payload could not be decoded as expected.
    #[error("[AI LLM Service] decode error: {0}")]
    Decode(String),

    /// Successful response without any message content.
    #[error("[AI LLM Service] response contained no choices")]
    EmptyChoices,
}

impl ProviderError {
    /// Classifies a non-2xx response.
    ///
    /// `body` is inspected in full; only a bounded snippet of it is kept for logs.
    pub fn from_status(
        status: StatusCode,
        url: impl Into<String>,
        body: &str,
        retry_after_secs: Option<u64>,
    ) -> Self {
        let quota = body.contains("insufficient_quota");
        let http = HttpError {
            status,
            url: url.into(),
            snippet: make_snippet(body),
        };
        match status.as_u16() {
            401 | 403 => ProviderError::Unauthorized(http),
            429 if quota => ProviderError::QuotaExceeded(http),
            429 => ProviderError::RateLimited {
                retry_after_secs,
                http,
            },
            500..=599 => ProviderError::Server(http),
            _ => ProviderError::HttpStatus(http),
        }
    }

    /// Classifies a transport-level failure.
    pub fn from_transport(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(timeout_secs)
        } else if err.is_decode() || err.is_body() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited { .. }
                | ProviderError::Server(_)
                | ProviderError::Timeout(_)
                | ProviderError::Network(_)
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Unauthorized(_) => "unauthorized",
            ProviderError::QuotaExceeded(_) => "quota_exceeded",
            ProviderError::RateLimited { .. } => "rate_limited",
            ProviderError::Server(_) => "server",
            ProviderError::HttpStatus(_) => "http_status",
            ProviderError::Timeout(_) => "timeout",
            ProviderError::Network(_) => "network",
            ProviderError::Decode(_) => "decode",
            ProviderError::EmptyChoices => "empty_choices",
        }
    }
}

/// Trims a response body down to a log-friendly snippet.
pub fn make_snippet(body: &str) -> String {
    const MAX: usize = 300;
    let body = body.trim();
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Source of configuration values, keyed by variable name.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Reads from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty(env: EnvLookup<'_>, name: &str) -> Option<String> {
    env(name).filter(|v| !v.trim().is_empty())
}

/// Fetches a required, non-empty variable.
///
/// # Errors
/// Returns [`ConfigError::MissingVar`] if the variable is absent or empty.
pub fn must_env(env: EnvLookup<'_>, name: &'static str) -> Result<String> {
    non_empty(env, name).ok_or_else(|| ConfigError::MissingVar(name).into())
}

/// Returns the variable or `default` when it is unset/empty.
pub fn env_or(env: EnvLookup<'_>, name: &str, default: &str) -> String {
    non_empty(env, name).unwrap_or_else(|| default.to_string())
}

/// Parses an optional `u32` (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u32`.
pub fn env_opt_u32(env: EnvLookup<'_>, name: &'static str) -> Result<Option<u32>> {
    match non_empty(env, name) {
        Some(v) => v.trim().parse::<u32>().map(Some).map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        None => Ok(None),
    }
}

/// Parses a `u64` with a default for unset/empty values.
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u64`.
pub fn env_u64_or(env: EnvLookup<'_>, name: &'static str, default: u64) -> Result<u64> {
    match non_empty(env, name) {
        Some(v) => v.trim().parse::<u64>().map_err(|_| {
            AiLlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        None => Ok(default),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers                                                        */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with
/// a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}
