// Local task cache - the single data source for rendering and filtering
// Reconciled from each mutation's response, never by re-fetching

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::error::{Result, TaskError};
use crate::models::Task;

/// Tasks in creation order, newest first
#[derive(Debug, Default, Clone)]
pub struct TaskCache {
    tasks: Vec<Task>,
}

impl TaskCache {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn replaceAll(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// A freshly created task goes to the head
    pub fn insertFront(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    /// Swap in the server's copy of a task. Returns false when the id is not cached.
    pub fn replace(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn isEmpty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Case-insensitive, trimmed title match against every task except `excludeId`
    pub fn isDuplicateTitle(&self, title: &str, excludeId: Option<&str>) -> bool {
        let wanted = title.trim().to_lowercase();
        self.tasks.iter().any(|t| {
            t.title().trim().to_lowercase() == wanted && Some(t.id.as_str()) != excludeId
        })
    }
}

/// Reserved key for form submissions that create a task
pub const CREATE_KEY: &str = "<new>";

/// Task ids with a request in flight. A second request for the same id is refused.
#[derive(Debug, Default)]
pub struct PendingGuard {
    keys: Mutex<HashSet<String>>,
}

impl PendingGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, key: &str) -> Result<PendingTicket<'_>> {
        if !self.keys.lock().insert(key.to_string()) {
            return Err(TaskError::Busy(key.to_string()));
        }
        Ok(PendingTicket {
            guard: self,
            key: key.to_string(),
        })
    }

    pub fn isPending(&self, key: &str) -> bool {
        self.keys.lock().contains(key)
    }
}

/// Holds a pending key until dropped
#[derive(Debug)]
pub struct PendingTicket<'a> {
    guard: &'a PendingGuard,
    key: String,
}

impl Drop for PendingTicket<'_> {
    fn drop(&mut self) {
        self.guard.keys.lock().remove(&self.key);
    }
}
