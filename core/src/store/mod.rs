//! Store module
//!
//! The single persistence boundary for tasks and the audit trail. Every
//! operation reads the whole document and every mutation rewrites it.

mod file_store;
mod memory;

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::audit::AuditLogEntry;
use crate::task::Task;
use crate::{Error, Result};

pub use file_store::JsonFileStore;
pub use memory::MemoryStore;

/// Full contents of the backing document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub logs: Vec<AuditLogEntry>,
}

/// Storage interface for the task document
#[async_trait]
pub trait Store: Send + Sync {
    /// Load the full current contents
    async fn read(&self) -> Result<Database>;

    /// Replace the full contents
    async fn write(&self, data: &Database) -> Result<()>;
}

/// What to do at startup when the backing file cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptPolicy {
    /// Refuse to start
    #[default]
    Fail,
    /// Move the corrupt file aside and start with empty collections
    Reset,
}

impl CorruptPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Reset => "reset",
        }
    }
}

impl FromStr for CorruptPolicy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "reset" => Ok(Self::Reset),
            _ => Err(Error::validation(format!(
                "Unsupported corrupt-file policy '{}'",
                value
            ))),
        }
    }
}
