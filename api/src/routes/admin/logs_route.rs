use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use query_log::LogRecord;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    core::app_state::AppState, error_handler::AppResult,
    middleware_layer::request_id::request_id_of,
};

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<LogRecord>,
}

/// Handler: GET /admin/logs
///
/// Every record in insertion order; storage identifiers are not exposed.
#[instrument(name = "logs_route", skip_all)]
pub async fn logs_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<LogsResponse>> {
    let logs = state.query_log.list().await?;
    debug!(request_id = %request_id_of(&headers), records = logs.len(), "logs listed");
    Ok(Json(LogsResponse { logs }))
}
