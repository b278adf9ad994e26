//! Audit trail
//!
//! Every successful task mutation appends one immutable entry. Entries are
//! stored newest-first and never modified or removed.

mod model;
mod query;
mod recorder;

pub use model::{AuditAction, AuditLogEntry};
pub use query::{LogListQuery, LogService};
pub use recorder::AuditRecorder;
