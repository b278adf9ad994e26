//! Client for the task manager REST API
//!
//! Mirrors what the web frontend does: list/search/paginate tasks, create,
//! edit and delete them, and page through the audit log.

mod client;
mod config;
mod error;

pub use client::{Health, TaskClient};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
