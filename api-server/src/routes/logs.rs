//! Audit log API endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};

use tm_core::audit::{AuditLogEntry, LogListQuery};
use tm_core::page::Page;

use crate::error::ApiError;
use crate::routes::list_query;
use crate::state::AppState;

/// GET /api/logs - List audit entries, newest first
async fn list_logs(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Page<AuditLogEntry>>, ApiError> {
    let query: LogListQuery = list_query(query);
    let page = state.logs().list_logs(&query).await?;
    Ok(Json(page))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/logs", get(list_logs))
}
