use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::model::AuditLogEntry;
use crate::page::{paginate, parse_positive, Page};
use crate::store::Store;
use crate::Result;

const DEFAULT_PAGE: usize = 1;
const DEFAULT_LIMIT: usize = 10;

/// Raw audit-log listing parameters from the query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl LogListQuery {
    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit.to_string());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }
}

/// Read-only access to the audit trail
#[derive(Clone)]
pub struct LogService {
    store: Arc<dyn Store>,
}

impl LogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Filter and paginate the audit trail, keeping its newest-first order.
    pub async fn list_logs(&self, query: &LogListQuery) -> Result<Page<AuditLogEntry>> {
        let data = self.store.read().await?;
        Ok(select(data.logs, query))
    }
}

fn select(mut logs: Vec<AuditLogEntry>, query: &LogListQuery) -> Page<AuditLogEntry> {
    let page = parse_positive(query.page.as_deref(), DEFAULT_PAGE);
    let limit = parse_positive(query.limit.as_deref(), DEFAULT_LIMIT);

    if let Some(action) = query.action.as_deref().filter(|value| !value.is_empty()) {
        let action = action.to_lowercase();
        logs.retain(|entry| entry.action.as_str().to_lowercase() == action);
    }

    if let Some(raw) = query
        .task_id
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        // A task id that isn't a number can't match any entry.
        let task_id = raw.parse::<u64>().ok();
        logs.retain(|entry| Some(entry.task_id) == task_id);
    }

    paginate(logs, page, limit)
}
