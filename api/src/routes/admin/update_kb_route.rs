use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use tracing::{info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    middleware_layer::request_id::request_id_of,
    routes::admin::update_kb_request::{MessageResponse, UpdateKbRequest},
};

/// Handler: POST /admin/update_kb
///
/// Replaces the whole knowledge base. The new mapping becomes visible only
/// after it has been written to disk; a write failure answers 500 and keeps
/// the previous mapping.
#[instrument(name = "update_kb_route", skip_all)]
pub async fn update_kb_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<UpdateKbRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let request_id = request_id_of(&headers);
    let Json(body) = payload?;

    let kb = body.knowledge_base.unwrap_or_default();
    let entries = kb.len();
    state.knowledge.replace_all(kb).await?;

    info!(%request_id, entries, "knowledge base updated via admin route");

    Ok(Json(MessageResponse {
        message: "Knowledge base updated successfully".to_string(),
    }))
}
