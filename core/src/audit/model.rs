use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::timestamp;

/// Kind of task mutation an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "Create Task")]
    CreateTask,
    #[serde(rename = "Update Task")]
    UpdateTask,
    #[serde(rename = "Delete Task")]
    DeleteTask,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateTask => "Create Task",
            Self::UpdateTask => "Update Task",
            Self::DeleteTask => "Delete Task",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub task_id: u64,
    /// Full record for creates, changed fields for updates, null for deletes
    #[serde(default)]
    pub updated_content: Option<Value>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AuditLogEntry {
    pub fn new(
        action: AuditAction,
        task_id: u64,
        updated_content: Option<Value>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: timestamp::now(),
            action,
            task_id,
            updated_content,
            notes,
        }
    }
}
