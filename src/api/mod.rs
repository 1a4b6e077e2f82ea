// Task service - CRUD against the remote task store
// The app only talks to stores through the TaskStore trait

mod http;
mod memory;

pub use http::HttpTaskStore;
pub use memory::MemoryTaskStore;

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;
use crate::models::{Task, TaskFields, TaskPatch};

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks, newest `createdAt` first
    async fn listTasks(&self) -> Result<Vec<Task>>;

    /// Create an incomplete task stamped with the current time; returns the stored record
    async fn createTask(&self, fields: &TaskFields) -> Result<Task>;

    /// Apply a partial update; returns the full updated record
    async fn updateTask(&self, id: &str, patch: &TaskPatch) -> Result<Task>;

    async fn deleteTask(&self, id: &str) -> Result<()>;
}

/// Result of the initial listing. Keeps "no tasks" apart from "store unreachable".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Loaded(Vec<Task>),
    Unavailable(String),
}

impl ListOutcome {
    /// Task list for rendering; an unreachable store shows as empty
    pub fn intoTasks(self) -> Vec<Task> {
        match self {
            Self::Loaded(tasks) => tasks,
            Self::Unavailable(_) => Vec::new(),
        }
    }

    pub fn isUnavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// List tasks without failing: errors are logged and reported as `Unavailable`
pub async fn fetchTasks(store: &dyn TaskStore) -> ListOutcome {
    match store.listTasks().await {
        Ok(tasks) => ListOutcome::Loaded(tasks),
        Err(e) => {
            warn!(error = %e, "Task list unavailable, showing an empty list");
            ListOutcome::Unavailable(e.to_string())
        }
    }
}
