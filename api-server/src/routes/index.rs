//! Landing page for people who open the API in a browser

use axum::{response::Html, routing::get, Router};

use crate::state::AppState;

const INDEX_HTML: &str = r#"<h2>Task Manager API</h2>
<p>Available endpoints (all <code>/api</code> routes require HTTP Basic credentials):</p>
<ul>
  <li>GET /health</li>
  <li>GET, POST /api/tasks</li>
  <li>GET, PUT, DELETE /api/tasks/{id}</li>
  <li>GET /api/logs</li>
</ul>
"#;

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}
