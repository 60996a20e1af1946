use std::sync::Arc;

use faq_engine::AnswerGenerator;
use knowledge_store::KnowledgeStore;
use query_log::QueryLog;
use tracing::info;

use crate::{core::config::ApiConfig, error_handler::AppResult};

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Topic→fact mapping used to ground answers.
    pub knowledge: Arc<KnowledgeStore>,
    /// Append-only record of answered questions.
    pub query_log: Arc<QueryLog>,
    /// Provider client with the fallback policy.
    pub generator: Arc<AnswerGenerator>,
}

impl AppState {
    pub fn new(knowledge: KnowledgeStore, query_log: QueryLog, generator: AnswerGenerator) -> Self {
        Self {
            knowledge: Arc::new(knowledge),
            query_log: Arc::new(query_log),
            generator: Arc::new(generator),
        }
    }

    /// Opens the stores and the provider client described by `cfg`.
    pub async fn init(cfg: &ApiConfig) -> AppResult<Self> {
        let knowledge = KnowledgeStore::open(&cfg.kb_file).await?;
        let query_log = QueryLog::open(&cfg.query_log_path).await?;
        let generator = AnswerGenerator::new(cfg.llm.clone())?;

        info!(
            kb_file = %cfg.kb_file.display(),
            query_log = %cfg.query_log_path.display(),
            model = %generator.model(),
            "application state ready"
        );

        Ok(Self::new(knowledge, query_log, generator))
    }
}
