//! Access gate for the `/api` routes
//!
//! HTTP Basic authentication against one shared credential pair.

mod basic;
mod middleware;

pub use basic::Credentials;
pub use middleware::{require_basic_auth, CHALLENGE};
