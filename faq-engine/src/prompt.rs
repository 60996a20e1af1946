//! Prompt builder: fixed system message + the whole knowledge base inlined.

use ai_llm_service::ChatMessage;
use knowledge_store::KnowledgeBase;
use serde_json::Value;

/// System instruction sent with every question.
pub const SYSTEM_PROMPT: &str = "You are a helpful FAQ assistant.";

/// Renders every entry as a `key: value` line, in insertion order.
///
/// String values are written as-is; any other JSON value is written in its
/// compact JSON form.
pub fn render_context(kb: &KnowledgeBase) -> String {
    kb.iter()
        .map(|(k, v)| format!("{k}: {}", render_value(v)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds the two-message conversation for `question`.
///
/// The user message is the rendered context, then `User: <question>`, then
/// an `Assistant:` cue, separated by newlines. No truncation is applied.
///
/// # Example
/// ```
/// # use faq_engine::prompt::build_messages;
/// # use knowledge_store::KnowledgeBase;
/// let mut kb = KnowledgeBase::new();
/// kb.insert("A".into(), "B".into());
/// let msgs = build_messages(&kb, "What is A?");
/// assert_eq!(msgs[1].content, "A: B\nUser: What is A?\nAssistant:");
/// ```
pub fn build_messages(kb: &KnowledgeBase, question: &str) -> Vec<ChatMessage> {
    let context = render_context(kb);
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("{context}\nUser: {question}\nAssistant:")),
    ]
}
