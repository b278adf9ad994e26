//! Task service
//!
//! Create, update and delete run as one critical section each: read the
//! document, apply the change, write it back, then append the audit entry.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use super::model::{ChangedFields, Task, TaskChanges, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};
use super::query::{select, TaskListQuery};
use super::sanitize::sanitize_text;
use crate::audit::{AuditAction, AuditRecorder};
use crate::page::Page;
use crate::store::Store;
use crate::timestamp;
use crate::{Error, Result};

pub struct TaskService {
    store: Arc<dyn Store>,
    audit: AuditRecorder,
    /// Serializes read-modify-write sequences against the store
    write_lock: Mutex<()>,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            audit: AuditRecorder::new(Arc::clone(&store)),
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list_tasks(&self, query: &TaskListQuery) -> Result<Page<Task>> {
        let data = self.store.read().await?;
        Ok(select(data.tasks, query))
    }

    pub async fn get_task(&self, id: u64) -> Result<Task> {
        let data = self.store.read().await?;
        data.tasks
            .into_iter()
            .find(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    pub async fn create_task(&self, title: &str, description: &str) -> Result<Task> {
        let title = sanitize_text(title, TITLE_MAX_CHARS);
        let description = sanitize_text(description, DESCRIPTION_MAX_CHARS);
        if title.is_empty() || description.is_empty() {
            return Err(Error::validation(
                "Title and description must not be empty after sanitization",
            ));
        }

        let _guard = self.write_lock.lock().await;
        let mut data = self.store.read().await?;

        let id = data
            .tasks
            .iter()
            .map(|task| task.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| Error::Storage("Task id space exhausted".to_string()))?;
        let task = Task::new(id, title, description);

        data.tasks.insert(0, task.clone());
        self.store.write(&data).await?;

        self.audit
            .record(
                &mut data,
                AuditAction::CreateTask,
                task.id,
                Some(serde_json::to_value(&task)?),
                None,
            )
            .await?;

        info!("Created task {}", task.id);
        Ok(task)
    }

    pub async fn update_task(&self, id: u64, changes: TaskChanges) -> Result<Task> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.store.read().await?;

        let task = data
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))?;

        let mut changed = ChangedFields::default();

        if let Some(raw) = changes.title.as_deref() {
            let title = sanitize_text(raw, TITLE_MAX_CHARS);
            if title.is_empty() {
                return Err(Error::validation(
                    "Title must not be empty after sanitization",
                ));
            }
            if title != task.title {
                changed.title = Some(title);
            }
        }

        if let Some(raw) = changes.description.as_deref() {
            let description = sanitize_text(raw, DESCRIPTION_MAX_CHARS);
            if description.is_empty() {
                return Err(Error::validation(
                    "Description must not be empty after sanitization",
                ));
            }
            if description != task.description {
                changed.description = Some(description);
            }
        }

        if changed.is_empty() {
            return Err(Error::validation("No changes detected"));
        }

        changed.apply_to(task);
        task.updated_at = Some(timestamp::now());
        let updated = task.clone();

        self.store.write(&data).await?;

        self.audit
            .record(
                &mut data,
                AuditAction::UpdateTask,
                id,
                Some(serde_json::to_value(&changed)?),
                None,
            )
            .await?;

        info!("Updated task {}", id);
        Ok(updated)
    }

    pub async fn delete_task(&self, id: u64) -> Result<Task> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.store.read().await?;

        let index = data
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        let removed = data.tasks.remove(index);

        self.store.write(&data).await?;

        self.audit
            .record(&mut data, AuditAction::DeleteTask, id, None, None)
            .await?;

        info!("Deleted task {}", id);
        Ok(removed)
    }
}
