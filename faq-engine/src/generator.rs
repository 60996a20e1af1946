//! Answer generator: one chat completion per question, never failing.

use ai_llm_service::{ChatMessage, LlmModelConfig, OpenAiService};
use tracing::{error, instrument};

use crate::error::EngineError;

/// Returned to the user whenever the provider call fails.
pub const FALLBACK_ANSWER: &str = "I'm sorry, I couldn't process your request at the moment.";

/// Outcome of [`AnswerGenerator::answer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Text to hand back to the caller.
    pub text: String,
    /// Error kind when `text` is the fallback (e.g. `"unauthorized"`).
    pub failure: Option<&'static str>,
}

impl Answer {
    pub fn is_fallback(&self) -> bool {
        self.failure.is_some()
    }
}

/// Wraps the chat client and applies the fallback policy.
#[derive(Debug)]
pub struct AnswerGenerator {
    llm: OpenAiService,
}

impl AnswerGenerator {
    pub fn new(cfg: LlmModelConfig) -> Result<Self, EngineError> {
        Ok(Self {
            llm: OpenAiService::new(cfg)?,
        })
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Sends `messages` and returns the trimmed first choice.
    ///
    /// Provider errors are logged with their classification and replaced by
    /// [`FALLBACK_ANSWER`]; they never reach the caller.
    #[instrument(skip_all, fields(model = %self.llm.model()))]
    pub async fn answer(&self, messages: &[ChatMessage]) -> Answer {
        match self.llm.chat(messages).await {
            Ok(content) => Answer {
                text: content.trim().to_string(),
                failure: None,
            },
            Err(err) => {
                error!(error = %err, kind = err.kind(), "provider call failed, using fallback answer");
                Answer {
                    text: FALLBACK_ANSWER.to_string(),
                    failure: Some(err.kind()),
                }
            }
        }
    }
}
