use serde::{Deserialize, Serialize};

/// Request payload for /ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question; absent is treated like empty.
    #[serde(default)]
    pub query: Option<String>,
}

/// Response payload for /ask.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Model answer, or the fallback apology when the provider failed.
    pub response: String,
}
