//! POST /ask: answers a question from the knowledge base.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use faq_engine::answer_question;
use tracing::{debug, info, instrument, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::request_id::request_id_of,
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// Handler: POST /ask
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/ask \
///   -H 'content-type: application/json' \
///   -d '{"query":"What are your opening hours?"}'
/// ```
///
/// A failed log write is reported and otherwise ignored: the caller still
/// gets the answer.
#[instrument(name = "ask_route", skip_all)]
pub async fn ask_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Json<AskResponse>> {
    let request_id = request_id_of(&headers);
    let Json(body) = payload?;

    let query = body.query.unwrap_or_default();
    if query.is_empty() {
        debug!(%request_id, "rejecting empty query");
        return Err(AppError::EmptyQuery);
    }

    let answer = answer_question(&state.knowledge, &state.generator, &query).await;

    if let Err(err) = state.query_log.record(&query, &answer.text).await {
        warn!(%request_id, error = %err, "query log write failed, answer delivered anyway");
    }

    info!(
        %request_id,
        query_chars = query.len(),
        fallback = answer.is_fallback(),
        "question answered"
    );

    Ok(Json(AskResponse {
        response: answer.text,
    }))
}
