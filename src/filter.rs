// Tab and search filtering over the task cache
// Filters borrow from the cache and never change it

use crate::cache::TaskCache;
use crate::models::{Tab, Task};

pub fn filterByTab(tasks: &[Task], tab: Tab) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| match tab {
            Tab::All => true,
            Tab::Active => !t.isCompleted,
            Tab::Completed => t.isCompleted,
        })
        .collect()
}

/// Substring match on title or description. A blank query keeps everything.
pub fn search<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return tasks.iter().collect();
    }
    tasks
        .iter()
        .filter(|t| {
            t.fields.title.trim().to_lowercase().contains(&query)
                || t.fields.description.trim().to_lowercase().contains(&query)
        })
        .collect()
}

/// What the list currently shows. Tab and search do not compose: the last one applied wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    Tab(Tab),
    Search(String),
}

impl Default for ViewMode {
    fn default() -> Self {
        Self::Tab(Tab::All)
    }
}

/// List view plus the visible state of the tab bar and search box
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub highlighted: Tab,
    pub query: String,  // Raw search box text
    pub mode: ViewMode,
}

impl ViewState {
    pub fn selectTab(&mut self, tab: Tab) {
        self.highlighted = tab;
        self.mode = ViewMode::Tab(tab);
    }

    /// Focusing the search box jumps back to the full list
    pub fn focusSearch(&mut self) {
        self.highlighted = Tab::All;
        self.mode = ViewMode::Tab(Tab::All);
    }

    pub fn search(&mut self, input: &str) {
        self.query = input.to_string();
        self.mode = ViewMode::Search(input.to_string());
    }

    /// After a cache mutation the whole cache is shown again; tab bar and search box stay put
    pub fn showAll(&mut self) {
        self.mode = ViewMode::Tab(Tab::All);
    }

    pub fn apply<'a>(&self, cache: &'a TaskCache) -> Vec<&'a Task> {
        match &self.mode {
            ViewMode::Tab(tab) => filterByTab(cache.tasks(), *tab),
            ViewMode::Search(query) => search(cache.tasks(), query),
        }
    }
}
