use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::model::{AuditAction, AuditLogEntry};
use crate::store::{Database, Store};
use crate::Result;

/// Appends audit entries to the head of the log collection and persists them
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn Store>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Record one mutation against the request's snapshot and write it out.
    ///
    /// Only fails if the store write fails.
    pub async fn record(
        &self,
        data: &mut Database,
        action: AuditAction,
        task_id: u64,
        updated_content: Option<Value>,
        notes: Option<String>,
    ) -> Result<AuditLogEntry> {
        let entry = AuditLogEntry::new(action, task_id, updated_content, notes);
        data.logs.insert(0, entry.clone());
        self.store.write(data).await?;

        debug!("Recorded audit entry {} ({}) for task {}", entry.id, action, task_id);
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn record_prepends_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let recorder = AuditRecorder::new(store.clone());
        let mut data = Database::default();

        let first = recorder
            .record(&mut data, AuditAction::CreateTask, 1, None, None)
            .await
            .unwrap();
        let second = recorder
            .record(
                &mut data,
                AuditAction::DeleteTask,
                1,
                None,
                Some("cleanup".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(store.writes(), 2);
        let persisted = store.read().await.unwrap();
        assert_eq!(persisted.logs.len(), 2);
        assert_eq!(persisted.logs[0], second);
        assert_eq!(persisted.logs[1], first);
        assert_eq!(persisted.logs[0].notes.as_deref(), Some("cleanup"));
    }
}
