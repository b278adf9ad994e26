//! Application state

use std::sync::Arc;

use tm_core::audit::LogService;
use tm_core::store::Store;
use tm_core::task::TaskService;

use crate::auth::Credentials;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    tasks: TaskService,
    logs: LogService,
    credentials: Credentials,
}

impl AppState {
    /// Create a new AppState backed by `store`
    pub fn new(store: Arc<dyn Store>, credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                tasks: TaskService::new(Arc::clone(&store)),
                logs: LogService::new(store),
                credentials,
            }),
        }
    }

    pub fn tasks(&self) -> &TaskService {
        &self.inner.tasks
    }

    pub fn logs(&self) -> &LogService {
        &self.inner.logs
    }

    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }
}
