//! Route handlers

pub mod health;
pub mod index;
pub mod logs;
pub mod task;

use std::collections::HashMap;

use axum::{
    extract::{rejection::QueryRejection, Query},
    middleware, Router,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_basic_auth;
use crate::error::ApiError;
use crate::state::AppState;

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Parameters of a list endpoint. A key given more than once is unusable and
/// left unset, so the listing falls back to its default for that key.
pub(crate) fn list_query<T: DeserializeOwned + Default>(
    raw: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> T {
    let Ok(Query(pairs)) = raw else {
        return T::default();
    };

    let mut values: HashMap<String, Option<String>> = HashMap::new();
    for (key, value) in pairs {
        values
            .entry(key)
            .and_modify(|existing| *existing = None)
            .or_insert(Some(value));
    }

    let fields: Map<String, Value> = values
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, Value::String(value))))
        .collect();
    serde_json::from_value(Value::Object(fields)).unwrap_or_default()
}

/// Full application router. Everything under `/api` sits behind the access gate.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(task::router())
        .merge(logs::router())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_basic_auth,
        ));

    Router::new()
        .merge(health::router())
        .merge(index::router())
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header::WWW_AUTHENTICATE, Request, StatusCode},
    };
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::Value;
    use tm_core::store::MemoryStore;
    use tower::ServiceExt;

    use super::app;
    use crate::auth::{Credentials, CHALLENGE};
    use crate::state::AppState;

    fn build() -> (axum::Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), Credentials::new("admin", "secret"));
        (app(state), store)
    }

    async fn get(
        router: &axum::Router,
        uri: &str,
        auth: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn api_routes_require_credentials_before_touching_the_store() {
        let (router, store) = build();
        let wrong = format!("Basic {}", STANDARD.encode("admin:wrong"));

        for uri in ["/api/tasks", "/api/tasks/1", "/api/logs", "/api/unknown"] {
            for auth in [None, Some(wrong.as_str()), Some("Bearer token")] {
                let response = get(&router, uri, auth).await;
                assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
                assert_eq!(response.headers()[WWW_AUTHENTICATE], CHALLENGE);
            }
        }

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/tasks")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"title":"t","description":"d"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        assert_eq!(store.reads(), 0);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn valid_credentials_pass_through() {
        let (router, store) = build();
        let auth = format!("Basic {}", STANDARD.encode("admin:secret"));

        let response = get(&router, "/api/tasks", Some(&auth)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.reads(), 1);

        let response = get(&router, "/api/unknown", Some(&auth)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_is_open() {
        let (router, _store) = build();

        let response = get(&router, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["ok"], true);
        assert!(payload["time"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn index_page_is_open() {
        let (router, _store) = build();

        let response = get(&router, "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/api/tasks"));
    }

    #[tokio::test]
    async fn unknown_routes_return_json_404() {
        let (router, _store) = build();

        let response = get(&router, "/nope", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["error"], "Not found");
    }

    #[tokio::test]
    async fn cors_preflight_is_answered() {
        let (router, _store) = build();

        let response = router
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/tasks")
                    .header("Origin", "http://localhost:5173")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
