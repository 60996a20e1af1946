//! Knowledge-grounded answering.
//!
//! Public API: [`answer_question`]. It snapshots the knowledge store, builds
//! the prompt with [`prompt::build_messages`], and asks the
//! [`AnswerGenerator`], which falls back to [`FALLBACK_ANSWER`] on provider
//! errors.

mod error;
mod generator;
pub mod prompt;

pub use error::EngineError;
pub use generator::{Answer, AnswerGenerator, FALLBACK_ANSWER};

use knowledge_store::KnowledgeStore;
use tracing::debug;

/// Answers `question` from the current knowledge snapshot.
///
/// # Example
/// ```no_run
/// # use faq_engine::{answer_question, AnswerGenerator};
/// # use knowledge_store::KnowledgeStore;
/// # async fn demo(store: KnowledgeStore, generator: AnswerGenerator) {
/// let answer = answer_question(&store, &generator, "When do you open?").await;
/// println!("{}", answer.text);
/// # }
/// ```
pub async fn answer_question(
    store: &KnowledgeStore,
    generator: &AnswerGenerator,
    question: &str,
) -> Answer {
    let kb = store.snapshot().await;
    let messages = prompt::build_messages(&kb, question);
    debug!(
        entries = kb.len(),
        prompt_chars = messages.iter().map(|m| m.content.len()).sum::<usize>(),
        "prompt built"
    );
    generator.answer(&messages).await
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use ai_llm_service::LlmModelConfig;
    use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    use super::*;

    type Seen = Arc<Mutex<Vec<Value>>>;

    /// Fake provider: records bodies; replies `reply` or fails with `status`.
    async fn spawn_fake(status: StatusCode, reply: &'static str) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route(
                "/v1/chat/completions",
                post(
                    move |State(seen): State<Seen>, Json(body): Json<Value>| async move {
                        seen.lock().unwrap().push(body);
                        if status.is_success() {
                            (status, Json(json!({ "choices": [{ "message": { "content": reply } }] })))
                        } else {
                            (status, Json(json!({ "error": { "message": "boom" } })))
                        }
                    },
                ),
            )
            .with_state(seen.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), seen)
    }

    fn generator(endpoint: String) -> AnswerGenerator {
        AnswerGenerator::new(LlmModelConfig {
            model: "gpt-4o-mini".into(),
            endpoint,
            api_key: "sk-test".into(),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: 5,
            max_retries: 0,
            retry_backoff_ms: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn answer_is_trimmed_and_prompt_carries_knowledge() {
        let (url, seen) = spawn_fake(StatusCode::OK, "  Opening hours are 9-5.\n").await;
        let dir = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::open(dir.path().join("kb.json")).await.unwrap();
        let mut kb = knowledge_store::KnowledgeBase::new();
        kb.insert("hours".into(), json!("9-5"));
        store.replace_all(kb).await.unwrap();

        let answer = answer_question(&store, &generator(url), "When?").await;
        assert_eq!(answer.text, "Opening hours are 9-5.");
        assert!(!answer.is_fallback());

        let bodies = seen.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["model"], "gpt-4o-mini");
        assert_eq!(bodies[0]["messages"][0]["content"], prompt::SYSTEM_PROMPT);
        assert_eq!(
            bodies[0]["messages"][1]["content"],
            "hours: 9-5\nUser: When?\nAssistant:"
        );
    }

    #[tokio::test]
    async fn provider_failure_yields_fallback() {
        let (url, _seen) = spawn_fake(StatusCode::UNAUTHORIZED, "").await;
        let answer = generator(url)
            .answer(&prompt::build_messages(&Default::default(), "q"))
            .await;
        assert_eq!(answer.text, FALLBACK_ANSWER);
        assert_eq!(answer.failure, Some("unauthorized"));
    }
}
