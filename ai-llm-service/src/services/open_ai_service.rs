//! OpenAI (ChatGPT) chat-completion service.
//!
//! Minimal, non-streaming client around the OpenAI REST API:
//! - POST {endpoint}/v1/chat/completions
//!
//! Every attempt is bounded by `timeout_secs`. Transient failures (rate
//! limiting, 5xx, timeouts, network errors) are retried up to `max_retries`
//! times with exponential backoff starting at `retry_backoff_ms`; a
//! `Retry-After` header from the provider raises the delay when it is longer.
//!
//! Errors are normalized via the classified types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::{
    chat::ChatMessage,
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiLlmError, ConfigError, ProviderError},
};

/// Upper bound for a single backoff sleep.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Thin client for the OpenAI chat-completion API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers); clone
/// the service into an `Arc` and share it.
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::MissingVar`] if the API key is empty
    /// - [`ConfigError::InvalidFormat`] if the endpoint is not http(s)
    /// - [`AiLlmError::HttpClient`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.api_key.trim().is_empty() {
            return Err(ConfigError::MissingVar("OPENAI_API_KEY").into());
        }

        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidFormat {
                var: "OPENAI_URL",
                reason: "must start with http:// or https://",
            }
            .into());
        }

        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", cfg.api_key.trim()))
            .map_err(|_| ConfigError::InvalidFormat {
                var: "OPENAI_API_KEY",
                reason: "must be a valid header value",
            })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(AiLlmError::HttpClient)?;

        let url_chat = format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'));

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs,
            max_retries = cfg.max_retries,
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// Model identifier every request is sent with.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Sends `messages` to `/v1/chat/completions` and returns the content of
    /// the first choice (untrimmed).
    ///
    /// # Errors
    /// Returns the last [`AiLlmError::Provider`] once retries are exhausted or
    /// immediately for non-transient kinds (unauthorized, quota, bad request,
    /// decode, empty choices).
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, messages);
        let mut attempt: u32 = 0;

        loop {
            match self.send_once(&body).await {
                Ok(content) => {
                    info!(
                        model = %self.cfg.model,
                        attempts = attempt + 1,
                        latency_ms = started.elapsed().as_millis(),
                        "chat completion completed"
                    );
                    return Ok(content);
                }
                Err(err) if err.is_transient() && attempt < self.cfg.max_retries => {
                    let delay = self.backoff(attempt, &err);
                    warn!(
                        error = %err,
                        kind = err.kind(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis(),
                        "transient chat completion failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    error!(
                        error = %err,
                        kind = err.kind(),
                        attempts = attempt + 1,
                        latency_ms = started.elapsed().as_millis(),
                        "chat completion failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    async fn send_once(&self, body: &ChatCompletionRequest<'_>) -> Result<String, AiLlmError> {
        debug!(
            model = %self.cfg.model,
            messages = body.messages.len(),
            "POST {}", self.url_chat
        );

        let resp = self
            .client
            .post(&self.url_chat)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(&e, self.cfg.timeout_secs))?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let text = resp.text().await.unwrap_or_default();
            return Err(
                ProviderError::from_status(status, self.url_chat.as_str(), &text, retry_after)
                    .into(),
            );
        }

        let out: ChatCompletionResponse = resp.json().await.map_err(|e| {
            ProviderError::Decode(format!(
                "serde error: {e}; expected `choices[0].message.content`"
            ))
        })?;

        out.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::EmptyChoices.into())
    }

    fn backoff(&self, attempt: u32, err: &AiLlmError) -> Duration {
        let exp = self
            .cfg
            .retry_backoff_ms
            .saturating_mul(1u64 << attempt.min(16));
        let mut delay = Duration::from_millis(exp);
        if let AiLlmError::Provider(ProviderError::RateLimited {
            retry_after_secs: Some(secs),
            ..
        }) = err
        {
            delay = delay.max(Duration::from_secs(*secs));
        }
        delay.min(MAX_BACKOFF)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, messages: &'a [ChatMessage]) -> Self {
        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
        }
    }
}

/// Minimal response for `/v1/chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    use super::*;

    /// Scripted fake provider: replies with `statuses[n]` for the n-th call
    /// (the last entry repeats) and counts calls.
    #[derive(Clone)]
    struct Fake {
        statuses: Arc<Vec<u16>>,
        calls: Arc<AtomicUsize>,
    }

    async fn fake_handler(State(fake): State<Fake>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        let n = fake.calls.fetch_add(1, Ordering::SeqCst);
        let code = fake.statuses[n.min(fake.statuses.len() - 1)];
        let status = StatusCode::from_u16(code).unwrap();
        if status.is_success() {
            let echo = body["messages"][1]["content"].as_str().unwrap_or_default().to_string();
            (status, Json(json!({ "choices": [{ "message": { "content": format!(" {echo} ") } }] })))
        } else {
            (status, Json(json!({ "error": { "message": "scripted failure" } })))
        }
    }

    async fn spawn_fake(statuses: Vec<u16>) -> (String, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let fake = Fake {
            statuses: Arc::new(statuses),
            calls: calls.clone(),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(fake_handler))
            .with_state(fake);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), calls)
    }

    fn cfg(endpoint: String, max_retries: u32) -> LlmModelConfig {
        LlmModelConfig {
            model: "gpt-4o-mini".into(),
            endpoint,
            api_key: "sk-test".into(),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: 5,
            max_retries,
            retry_backoff_ms: 1,
        }
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::system("sys"), ChatMessage::user("hello")]
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let (url, calls) = spawn_fake(vec![200]).await;
        let svc = OpenAiService::new(cfg(url, 0)).unwrap();
        let out = svc.chat(&messages()).await.unwrap();
        assert_eq!(out, " hello ");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_then_succeeds() {
        let (url, calls) = spawn_fake(vec![503, 429, 200]).await;
        let svc = OpenAiService::new(cfg(url, 2)).unwrap();
        assert_eq!(svc.chat(&messages()).await.unwrap(), " hello ");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let (url, calls) = spawn_fake(vec![500]).await;
        let svc = OpenAiService::new(cfg(url, 1)).unwrap();
        let err = svc.chat(&messages()).await.unwrap_err();
        assert_eq!(err.kind(), "server");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unauthorized_is_not_retried() {
        let (url, calls) = spawn_fake(vec![401]).await;
        let svc = OpenAiService::new(cfg(url, 3)).unwrap();
        let err = svc.chat(&messages()).await.unwrap_err();
        assert_eq!(err.kind(), "unauthorized");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let svc = OpenAiService::new(cfg(format!("http://{addr}"), 0)).unwrap();
        let err = svc.chat(&messages()).await.unwrap_err();
        assert_eq!(err.kind(), "network");
    }

    #[test]
    fn rejects_bad_endpoint() {
        let err = OpenAiService::new(cfg("localhost:1".into(), 0)).unwrap_err();
        assert_eq!(err.kind(), "config");
    }
}
