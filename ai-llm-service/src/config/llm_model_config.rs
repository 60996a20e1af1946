/// Configuration for chat-completion calls against an OpenAI-compatible API.
///
/// # Fields
///
/// - `model`: fixed model identifier (e.g. `"gpt-4o-mini"`).
/// - `endpoint`: API base URL without the `/v1/...` suffix.
/// - `api_key`: bearer credential.
/// - `max_tokens`: optional completion cap.
/// - `temperature` / `top_p`: optional sampling overrides.
/// - `timeout_secs`: per-attempt request timeout.
/// - `max_retries`: extra attempts for transient failures (0 disables retries).
/// - `retry_backoff_ms`: first backoff delay, doubled on each retry.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "gpt-4o-mini".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: "sk-...".to_string(),
///     max_tokens: None,
///     temperature: None,
///     top_p: None,
///     timeout_secs: 60,
///     max_retries: 2,
///     retry_backoff_ms: 500,
/// };
/// assert_eq!(cfg.model, "gpt-4o-mini");
/// ```
#[derive(Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// Base URL of the API (e.g. `https://api.openai.com`).
    pub endpoint: String,

    /// API key sent as `Authorization: Bearer ...`.
    pub api_key: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Request timeout for a single attempt, in seconds.
    pub timeout_secs: u64,

    /// How many times a transient failure is retried.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds.
    pub retry_backoff_ms: u64,
}

// The key must never end up in logs.
impl std::fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}
