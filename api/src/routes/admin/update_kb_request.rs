use knowledge_store::KnowledgeBase;
use serde::{Deserialize, Serialize};

/// Request payload for /admin/update_kb.
#[derive(Debug, Deserialize)]
pub struct UpdateKbRequest {
    /// New mapping; absent or `null` installs an empty one.
    #[serde(default)]
    pub knowledge_base: Option<KnowledgeBase>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
