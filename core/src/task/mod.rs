//! Task module
//!
//! This module contains task-related types and logic.

mod model;
mod query;
pub mod sanitize;
mod service;

pub use model::*;
pub use query::TaskListQuery;
pub use service::TaskService;
