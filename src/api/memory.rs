// In-process task store with the same contract as the REST resource
// Used for `store: memory` and as the store behind app tests

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::TaskStore;
use crate::error::{Result, TaskError};
use crate::models::{NewTask, Task, TaskFields, TaskPatch};

#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store; records are kept in the order given
    pub fn withTasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.tasks.read().iter().find(|t| t.id == id).cloned()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn listTasks(&self) -> Result<Vec<Task>> {
        let mut tasks = self.tasks.read().clone();
        // Stable sort keeps the insert order for equal stamps
        tasks.sort_by(|a, b| b.createdAt.cmp(&a.createdAt));
        Ok(tasks)
    }

    async fn createTask(&self, fields: &TaskFields) -> Result<Task> {
        let body = NewTask::new(fields.clone());
        let task = Task {
            id: Uuid::new_v4().to_string(),
            fields: body.fields,
            isCompleted: body.isCompleted,
            createdAt: body.createdAt,
        };
        self.tasks.write().insert(0, task.clone());
        Ok(task)
    }

    async fn updateTask(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        let mut tasks = self.tasks.write();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        patch.applyTo(task);
        Ok(task.clone())
    }

    async fn deleteTask(&self, id: &str) -> Result<()> {
        let mut tasks = self.tasks.write();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(TaskError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
