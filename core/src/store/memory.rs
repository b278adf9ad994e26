//! In-memory store
//!
//! Used by tests and as a drop-in when no file should be touched.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Database, Store};
use crate::Result;

#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<Database>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: Database) -> Self {
        Self {
            data: RwLock::new(data),
            ..Self::default()
        }
    }

    /// Number of completed `read` calls
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of completed `write` calls
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn read(&self) -> Result<Database> {
        let data = self.data.read().await.clone();
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(data)
    }

    async fn write(&self, data: &Database) -> Result<()> {
        *self.data.write().await = data.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
