//! JSON file store
//!
//! Keeps the whole document in one pretty-printed JSON file:
//! `{ "tasks": [...], "logs": [...] }`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{CorruptPolicy, Database, Store};
use crate::{Error, Result};

/// File-backed store using a single JSON document
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`, creating the file with empty collections if
    /// it doesn't exist.
    ///
    /// A file that exists but cannot be parsed is handled according to
    /// `policy`.
    pub async fn open(path: impl Into<PathBuf>, policy: CorruptPolicy) -> Result<Self> {
        let store = Self { path: path.into() };

        match store.read().await {
            Ok(data) => {
                info!(
                    "Loaded {} tasks and {} audit entries from {}",
                    data.tasks.len(),
                    data.logs.len(),
                    store.path.display()
                );
            }
            Err(Error::StorageCorrupt(reason)) if policy == CorruptPolicy::Reset => {
                let backup = store.quarantine().await?;
                warn!(
                    "Store file {} was corrupt ({}); moved it to {} and started empty",
                    store.path.display(),
                    reason,
                    backup.display()
                );
                store.write(&Database::default()).await?;
            }
            Err(err) => return Err(err),
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the current file out of the way, keeping it for inspection
    async fn quarantine(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "db.json".to_string());
        let backup = self.path.with_file_name(format!(
            "{}.corrupt-{}",
            file_name,
            Utc::now().timestamp_millis()
        ));

        tokio::fs::rename(&self.path, &backup)
            .await
            .map_err(|e| Error::Storage(format!("Failed to move corrupt store file: {}", e)))?;
        Ok(backup)
    }

    /// Write an empty document unless a file already exists at the path.
    /// An existing document is never replaced.
    async fn create_empty(&self) -> Result<()> {
        let temp_path = self.write_temp(&Database::default()).await?;
        let linked = tokio::fs::hard_link(&temp_path, &self.path).await;
        let _ = tokio::fs::remove_file(&temp_path).await;

        match linked {
            Ok(()) => {
                info!("Created empty store file {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(Error::Storage(format!("Failed to create store file: {}", e))),
        }
    }

    /// Serialize `data` into a fresh temp file next to the target
    async fn write_temp(&self, data: &Database) -> Result<PathBuf> {
        let content = serde_json::to_string_pretty(data)
            .map_err(|e| Error::Storage(format!("Failed to serialize store: {}", e)))?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::Storage(format!("Failed to create directory: {}", e)))?;

        // Readers must never see a half-written document.
        let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4().as_hyphenated()));

        tokio::fs::write(&temp_path, content)
            .await
            .map_err(|e| Error::Storage(format!("Failed to write temp store file: {}", e)))?;
        Ok(temp_path)
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn read(&self) -> Result<Database> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.create_empty().await?;
                tokio::fs::read_to_string(&self.path)
                    .await
                    .map_err(|e| Error::Storage(format!("Failed to read store file: {}", e)))?
            }
            Err(e) => {
                return Err(Error::Storage(format!("Failed to read store file: {}", e)));
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            Error::StorageCorrupt(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn write(&self, data: &Database) -> Result<()> {
        let temp_path = self.write_temp(data).await?;

        if let Err(err) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(Error::Storage(format!(
                "Failed to finalize atomic store write: {}",
                err
            )));
        }

        Ok(())
    }
}
