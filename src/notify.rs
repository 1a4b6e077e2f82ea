// Presentation collaborators - toasts and alert prompts
// The core raises them through Notifier; the page renders whatever the board holds

use parking_lot::Mutex;
use tracing::info;

use crate::models::NoticeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

/// Work waiting on a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteTask(String),
    CloseForm,
}

/// Alert modal. With an action it asks Yes/Cancel, without one it is a plain OK.
/// Resolving consumes the prompt, so it answers once.
#[derive(Debug, PartialEq, Eq)]
pub struct Prompt {
    message: String,
    action: Option<PendingAction>,
}

impl Prompt {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action: None,
        }
    }

    pub fn confirm(message: impl Into<String>, action: PendingAction) -> Self {
        Self {
            message: message.into(),
            action: Some(action),
        }
    }

    pub fn text(&self) -> &str {
        &self.message
    }

    pub fn action(&self) -> Option<&PendingAction> {
        self.action.as_ref()
    }

    pub fn isConfirmable(&self) -> bool {
        self.action.is_some()
    }

    /// The action to run, if the answer was yes
    pub fn resolve(self, answer: Confirmation) -> Option<PendingAction> {
        match answer {
            Confirmation::Confirmed => self.action,
            Confirmation::Cancelled => None,
        }
    }

    pub fn view(&self) -> AlertView {
        AlertView {
            message: self.message.clone(),
            confirmable: self.isConfirmable(),
        }
    }
}

/// What the alert modal needs to draw a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertView {
    pub message: String,
    pub confirmable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

pub trait Notifier: Send + Sync {
    fn toast(&self, message: &str, kind: NoticeKind);
    fn alert(&self, prompt: Prompt);
}

/// Notifier that parks notices until the next page render
#[derive(Debug, Default)]
pub struct NoticeBoard {
    toasts: Mutex<Vec<Notice>>,
    prompt: Mutex<Option<Prompt>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drainToasts(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.toasts.lock())
    }

    pub fn toasts(&self) -> Vec<Notice> {
        self.toasts.lock().clone()
    }

    pub fn currentPrompt(&self) -> Option<AlertView> {
        self.prompt.lock().as_ref().map(Prompt::view)
    }

    pub fn takePrompt(&self) -> Option<Prompt> {
        self.prompt.lock().take()
    }
}

impl Notifier for NoticeBoard {
    fn toast(&self, message: &str, kind: NoticeKind) {
        info!(kind = kind.name(), message, "Toast");
        self.toasts.lock().push(Notice {
            message: message.to_string(),
            kind,
        });
    }

    /// A newer prompt replaces an unanswered one
    fn alert(&self, prompt: Prompt) {
        info!(message = prompt.text(), confirmable = prompt.isConfirmable(), "Alert");
        *self.prompt.lock() = Some(prompt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_runs_action_only_when_confirmed() {
        let ask = || Prompt::confirm("Delete?", PendingAction::DeleteTask("42".into()));
        assert_eq!(
            ask().resolve(Confirmation::Confirmed),
            Some(PendingAction::DeleteTask("42".into()))
        );
        assert_eq!(ask().resolve(Confirmation::Cancelled), None);
        assert_eq!(Prompt::message("OK?").resolve(Confirmation::Confirmed), None);
    }

    #[test]
    fn board_drains_toasts_once() {
        let board = NoticeBoard::new();
        board.toast("Task added successfully!", NoticeKind::Success);
        board.toast("Task deleted successfully!", NoticeKind::Deleted);

        let drained = board.drainToasts();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].kind, NoticeKind::Deleted);
        assert!(board.drainToasts().is_empty());
    }

    #[test]
    fn newer_prompt_replaces_older() {
        let board = NoticeBoard::new();
        board.alert(Prompt::confirm("first", PendingAction::CloseForm));
        board.alert(Prompt::message("second"));

        let view = board.currentPrompt().unwrap();
        assert_eq!(view.message, "second");
        assert!(!view.confirmable);
        assert!(board.takePrompt().is_some());
        assert!(board.takePrompt().is_none());
    }
}
