//! Core library for the task manager
//!
//! This crate contains the business logic, including:
//! - The JSON-file store holding tasks and the audit trail
//! - Task creation, update and deletion with input sanitization
//! - Filtering, sorting and pagination for task and audit-log listings

pub mod audit;
pub mod error;
pub mod page;
pub mod store;
pub mod task;
pub mod timestamp;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
