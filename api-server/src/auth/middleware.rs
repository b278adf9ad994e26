use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::basic::parse_basic_authorization;
use crate::error::ApiError;
use crate::state::AppState;

/// `WWW-Authenticate` value sent with every rejection
pub const CHALLENGE: &str = r#"Basic realm="TaskManager""#;

/// Reject requests without the shared credentials before they reach a handler.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let supplied = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic_authorization);

    let authorized = supplied
        .as_ref()
        .is_some_and(|(username, password)| state.credentials().matches(username, password));

    if !authorized {
        warn!(
            "Rejected {} {}: {}",
            request.method(),
            request.uri().path(),
            if supplied.is_some() {
                "invalid credentials"
            } else {
                "missing credentials"
            }
        );
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}
