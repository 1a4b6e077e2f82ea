// Task form controller - create vs edit mode, trimming and duplicate checks
// Network dispatch lives in the app; this module only decides what to send

use crate::cache::TaskCache;
use crate::error::{Result, TaskError};
use crate::models::{Task, TaskFields, TaskPatch};
use crate::notify::{PendingAction, Prompt};

pub const TITLE_REQUIRED: &str = "Please enter a title for the task.";
pub const DUPLICATE_ON_CREATE: &str = "Title already exists in the list. Please enter a new title.";
pub const DUPLICATE_ON_EDIT: &str = "Title can't be the same.";
pub const SUBMIT_FAILED: &str = "An error occurred while processing the task. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(String),  // Task id being edited
}

/// Request the form resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(TaskFields),
    Update { id: String, patch: TaskPatch },
}

#[derive(Debug, Default)]
pub struct FormController {
    mode: FormMode,
    values: TaskFields,
    open: bool,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn editTarget(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id.as_str()),
        }
    }

    pub fn isOpen(&self) -> bool {
        self.open
    }

    pub fn values(&self) -> &TaskFields {
        &self.values
    }

    pub fn titleLabel(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Task",
            FormMode::Edit(_) => "Edit Task",
        }
    }

    pub fn submitLabel(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create Task",
            FormMode::Edit(_) => "Save Task",
        }
    }

    /// Blank form in create mode
    pub fn openCreate(&mut self) {
        self.reset();
        self.open = true;
    }

    /// Form pre-filled from `task`, in edit mode
    pub fn openEdit(&mut self, task: &Task) {
        self.mode = FormMode::Edit(task.id.clone());
        self.values = task.fields.clone();
        self.open = true;
    }

    /// Back to a closed, empty create form
    pub fn reset(&mut self) {
        self.mode = FormMode::Create;
        self.values = TaskFields::default();
        self.open = false;
    }

    /// Keep what the user typed so a rejected form re-renders as entered
    pub fn remember(&mut self, fields: &TaskFields) {
        self.values = fields.clone();
    }

    pub fn closePrompt(&self) -> Prompt {
        let message = match self.mode {
            FormMode::Edit(_) => "Are you sure you want to close the form?",
            FormMode::Create => "Closing the form will reset all entered data. Are you sure?",
        };
        Prompt::confirm(message, PendingAction::CloseForm)
    }

    /// Trim the fields, then require a title that no other cached task uses
    pub fn prepare(&self, fields: &TaskFields, cache: &TaskCache) -> Result<Submission> {
        let fields = fields.trimmed();
        let editing = self.editTarget();

        if fields.title.is_empty() {
            return Err(TaskError::BlankTitle(TITLE_REQUIRED.to_string()));
        }

        if cache.isDuplicateTitle(&fields.title, editing) {
            let message = if editing.is_some() { DUPLICATE_ON_EDIT } else { DUPLICATE_ON_CREATE };
            return Err(TaskError::DuplicateTitle(message.to_string()));
        }

        Ok(match editing {
            Some(id) => Submission::Update {
                id: id.to_string(),
                patch: TaskPatch::fromFields(fields),
            },
            None => Submission::Create(fields),
        })
    }
}
