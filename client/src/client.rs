use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use tm_core::audit::{AuditLogEntry, LogListQuery};
use tm_core::page::Page;
use tm_core::task::{Task, TaskChanges, TaskListQuery};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Response of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub ok: bool,
    pub time: String,
}

pub struct TaskClient {
    client: Client,
    base_url: String,
}

impl TaskClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some((username, password)) = config.credentials() {
            let token = STANDARD.encode(format!("{}:{}", username, password));
            let mut value = HeaderValue::from_str(&format!("Basic {}", token))
                .map_err(|e| ClientError::Config(format!("Invalid credentials: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /api/tasks
    pub async fn fetch_tasks(&self, query: &TaskListQuery) -> Result<Page<Task>> {
        let response = self
            .client
            .get(self.url("/api/tasks"))
            .query(query)
            .send()
            .await?;
        decode(response).await
    }

    /// GET /api/tasks/{id}
    pub async fn get_task(&self, id: u64) -> Result<Task> {
        let response = self
            .client
            .get(self.url(&format!("/api/tasks/{}", id)))
            .send()
            .await?;
        decode::<DataEnvelope<Task>>(response)
            .await
            .map(|envelope| envelope.data)
    }

    /// POST /api/tasks
    pub async fn create_task(&self, title: &str, description: &str) -> Result<Task> {
        let body = serde_json::json!({ "title": title, "description": description });
        let response = self
            .client
            .post(self.url("/api/tasks"))
            .json(&body)
            .send()
            .await?;
        decode::<DataEnvelope<Task>>(response)
            .await
            .map(|envelope| envelope.data)
    }

    /// PUT /api/tasks/{id}; only the fields set in `changes` are sent.
    pub async fn update_task(&self, id: u64, changes: &TaskChanges) -> Result<Task> {
        let mut body = Map::new();
        if let Some(title) = &changes.title {
            body.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(description) = &changes.description {
            body.insert("description".to_string(), Value::String(description.clone()));
        }

        let response = self
            .client
            .put(self.url(&format!("/api/tasks/{}", id)))
            .json(&body)
            .send()
            .await?;
        decode::<DataEnvelope<Task>>(response)
            .await
            .map(|envelope| envelope.data)
    }

    /// DELETE /api/tasks/{id}; returns the removed task.
    pub async fn delete_task(&self, id: u64) -> Result<Task> {
        let response = self
            .client
            .delete(self.url(&format!("/api/tasks/{}", id)))
            .send()
            .await?;
        decode::<DataEnvelope<Task>>(response)
            .await
            .map(|envelope| envelope.data)
    }

    /// GET /api/logs
    pub async fn fetch_logs(&self, query: &LogListQuery) -> Result<Page<AuditLogEntry>> {
        let response = self
            .client
            .get(self.url("/api/logs"))
            .query(query)
            .send()
            .await?;
        decode(response).await
    }

    /// GET /health
    pub async fn health(&self) -> Result<Health> {
        let response = self.client.get(self.url("/health")).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    debug!("API request failed with {}: {}", status, message);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{OriginalUri, State},
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};

    use super::*;

    #[derive(Clone, Default)]
    struct Seen {
        requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
    }

    impl Seen {
        fn push(&self, uri: String, headers: &HeaderMap, body: Value) {
            let auth = headers
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            self.requests.lock().unwrap().push((uri, auth, body));
        }

        fn all(&self) -> Vec<(String, Option<String>, Value)> {
            self.requests.lock().unwrap().clone()
        }
    }

    fn task_json(id: u64, title: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "description": "from the mock",
            "createdAt": "2024-05-01T12:00:00.000Z"
        })
    }

    async fn list(
        State(seen): State<Seen>,
        OriginalUri(uri): OriginalUri,
        headers: HeaderMap,
    ) -> Json<Value> {
        seen.push(uri.to_string(), &headers, Value::Null);
        Json(json!({
            "meta": { "total": 1, "page": 2, "limit": 3, "pages": 1 },
            "data": [task_json(4, "Listed")]
        }))
    }

    async fn create(
        State(seen): State<Seen>,
        OriginalUri(uri): OriginalUri,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        seen.push(uri.to_string(), &headers, body.clone());
        let title = body["title"].as_str().unwrap_or_default().to_string();
        (
            StatusCode::CREATED,
            Json(json!({ "message": "Task created", "data": task_json(1, &title) })),
        )
    }

    async fn update(
        State(seen): State<Seen>,
        OriginalUri(uri): OriginalUri,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        seen.push(uri.to_string(), &headers, body);
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No changes detected" })),
        )
    }

    async fn remove() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "plain failure")
    }

    async fn logs(
        State(seen): State<Seen>,
        OriginalUri(uri): OriginalUri,
        headers: HeaderMap,
    ) -> Json<Value> {
        seen.push(uri.to_string(), &headers, Value::Null);
        Json(json!({
            "meta": { "total": 1, "page": 1, "limit": 10, "pages": 1 },
            "data": [{
                "id": "abc",
                "timestamp": "2024-05-01T12:00:00.000Z",
                "action": "Delete Task",
                "taskId": 4,
                "updatedContent": null,
                "notes": null
            }]
        }))
    }

    async fn health() -> Json<Value> {
        Json(json!({ "ok": true, "time": "2024-05-01T12:00:00.000Z" }))
    }

    async fn spawn_mock() -> (String, Seen) {
        let seen = Seen::default();
        let app = Router::new()
            .route("/api/tasks", get(list).post(create))
            .route("/api/tasks/{id}", axum::routing::put(update).delete(remove))
            .route("/api/logs", get(logs))
            .route("/health", get(health))
            .with_state(seen.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), seen)
    }

    #[tokio::test]
    async fn sends_basic_auth_and_query_parameters() {
        let (base_url, seen) = spawn_mock().await;
        let client = TaskClient::new(
            ClientConfig::new(format!("{}/", base_url)).with_credentials("admin", "secret"),
        )
        .unwrap();

        let page = client
            .fetch_tasks(&TaskListQuery::default().page(2).limit(3).search("milk"))
            .await
            .unwrap();
        assert_eq!(page.meta.page, 2);
        assert_eq!(page.data[0].title, "Listed");

        let requests = seen.all();
        let (uri, auth, _) = &requests[0];
        assert!(uri.starts_with("/api/tasks?"));
        assert!(uri.contains("page=2"));
        assert!(uri.contains("limit=3"));
        assert!(uri.contains("q=milk"));
        assert!(!uri.contains("sort"));
        assert_eq!(
            auth.as_deref(),
            Some(format!("Basic {}", STANDARD.encode("admin:secret")).as_str())
        );
    }

    #[tokio::test]
    async fn omits_authorization_without_credentials() {
        let (base_url, seen) = spawn_mock().await;
        let client = TaskClient::new(ClientConfig::new(base_url)).unwrap();

        let health = client.health().await.unwrap();
        assert!(health.ok);

        client.fetch_logs(&LogListQuery::default().task_id("4")).await.unwrap();
        let requests = seen.all();
        let (uri, auth, _) = &requests[0];
        assert!(uri.contains("taskId=4"));
        assert!(auth.is_none());
    }

    #[tokio::test]
    async fn create_posts_title_and_description() {
        let (base_url, seen) = spawn_mock().await;
        let client = TaskClient::new(ClientConfig::new(base_url)).unwrap();

        let task = client.create_task("Write docs", "All of them").await.unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.title, "Write docs");

        let requests = seen.all();
        let (_, _, body) = &requests[0];
        assert_eq!(body, &json!({ "title": "Write docs", "description": "All of them" }));
    }

    #[tokio::test]
    async fn update_sends_only_requested_fields_and_surfaces_errors() {
        let (base_url, seen) = spawn_mock().await;
        let client = TaskClient::new(ClientConfig::new(base_url)).unwrap();

        let err = client
            .update_task(4, &TaskChanges::default().title("Same"))
            .await
            .unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "No changes detected");
            }
            e => panic!("Expected Api error, got: {:?}", e),
        }

        let requests = seen.all();
        let (uri, _, body) = &requests[0];
        assert_eq!(uri, "/api/tasks/4");
        assert_eq!(body, &json!({ "title": "Same" }));
    }

    #[tokio::test]
    async fn non_json_error_body_is_kept_verbatim() {
        let (base_url, _seen) = spawn_mock().await;
        let client = TaskClient::new(ClientConfig::new(base_url)).unwrap();

        let err = client.delete_task(4).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("plain failure"));
    }
}
