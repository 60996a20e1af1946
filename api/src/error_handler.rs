use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ai_llm_service::AiLlmError),

    #[error(transparent)]
    Engine(#[from] faq_engine::EngineError),

    // --- IO / network / server ---
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),

    // --- Storage ---
    #[error(transparent)]
    Knowledge(#[from] knowledge_store::KnowledgeError),

    #[error(transparent)]
    QueryLog(#[from] query_log::QueryLogError),

    // --- Request / routing ---
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::EmptyQuery | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,

            // 5xx
            AppError::Config(_)
            | AppError::Engine(_)
            | AppError::Bind(_)
            | AppError::Server(_)
            | AppError::Knowledge(_)
            | AppError::QueryLog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text placed in the `error` field of the response body.
    fn public_message(&self) -> String {
        match self {
            AppError::Knowledge(_) => "Failed to update knowledge base".into(),
            AppError::QueryLog(_) => "Failed to read query logs".into(),
            AppError::Config(_) | AppError::Engine(_) | AppError::Bind(_) | AppError::Server(_) => {
                "Internal server error".into()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn empty_query_shape() {
        let (status, json) = body_of(AppError::EmptyQuery).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({ "error": "Query cannot be empty" }));
    }

    #[tokio::test]
    async fn storage_errors_hide_details() {
        let err = AppError::Knowledge(knowledge_store::KnowledgeError::Io {
            path: "/secret/kb.json".into(),
            source: std::io::Error::other("disk full"),
        });
        let (status, json) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Failed to update knowledge base");
    }
}
