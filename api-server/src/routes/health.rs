//! Health check endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    time: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        time: tm_core::timestamp::format(&tm_core::timestamp::now()),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
