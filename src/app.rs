// Todo application state - cache, view, form and in-flight guard in one place
// Locks are short and never held across a request to the store

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{error, info, warn};

use crate::api::{ListOutcome, TaskStore, fetchTasks};
use crate::cache::{CREATE_KEY, PendingGuard, TaskCache};
use crate::error::{Result, TaskError};
use crate::filter::ViewState;
use crate::form::{FormController, SUBMIT_FAILED, Submission};
use crate::models::{NoticeKind, Tab, Task, TaskFields, TaskPatch};
use crate::notify::{AlertView, Confirmation, Notice, Notifier, PendingAction, Prompt};
use crate::render::{self, FormView, PageView};

pub const TOGGLE_FAILED: &str = "An error occurred while updating the task. Please try again.";
pub const DELETE_FAILED: &str = "An error occurred while deleting the task. Please try again.";

/// How the initial listing went
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded,
    Unavailable(String),
}

/// What a form submit ended in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Task),
    Updated(Task),
    Rejected(String),
}

pub struct TodoApp {
    store: Arc<dyn TaskStore>,
    notifier: Arc<dyn Notifier>,
    cache: RwLock<TaskCache>,
    view: RwLock<ViewState>,
    form: RwLock<FormController>,
    pending: PendingGuard,
    load: RwLock<LoadState>,
}

impl TodoApp {
    pub fn new(store: Arc<dyn TaskStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            cache: RwLock::new(TaskCache::default()),
            view: RwLock::new(ViewState::default()),
            form: RwLock::new(FormController::new()),
            pending: PendingGuard::new(),
            load: RwLock::new(LoadState::NotLoaded),
        }
    }

    /// Load the task list into the cache
    pub async fn initialise(&self) -> LoadState {
        let outcome = fetchTasks(self.store.as_ref()).await;
        let state = match &outcome {
            ListOutcome::Loaded(tasks) => {
                info!(count = tasks.len(), "Loaded tasks");
                LoadState::Loaded
            }
            ListOutcome::Unavailable(reason) => LoadState::Unavailable(reason.clone()),
        };
        self.cache.write().replaceAll(outcome.intoTasks());
        *self.load.write() = state.clone();
        state
    }

    pub fn loadState(&self) -> LoadState {
        self.load.read().clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.cache.read().tasks().to_vec()
    }

    pub fn task(&self, id: &str) -> Option<Task> {
        self.cache.read().find(id).cloned()
    }

    pub fn viewState(&self) -> ViewState {
        self.view.read().clone()
    }

    pub fn isPending(&self, id: &str) -> bool {
        self.pending.isPending(id)
    }

    // ============================================
    // FILTERS
    // ============================================

    pub fn visibleTasks(&self) -> Vec<Task> {
        let cache = self.cache.read();
        self.view.read().apply(&cache).into_iter().cloned().collect()
    }

    pub fn renderList(&self) -> String {
        let cache = self.cache.read();
        let view = self.view.read();
        render::renderTasks(view.apply(&cache))
    }

    pub fn selectTab(&self, tab: Tab) {
        self.view.write().selectTab(tab);
    }

    pub fn focusSearch(&self) {
        self.view.write().focusSearch();
    }

    pub fn search(&self, input: &str) {
        self.view.write().search(input);
    }

    // ============================================
    // FORM
    // ============================================

    pub fn openCreate(&self) {
        self.form.write().openCreate();
    }

    pub fn openEdit(&self, id: &str) -> Result<TaskFields> {
        let task = self.task(id).ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        let mut form = self.form.write();
        form.openEdit(&task);
        Ok(form.values().clone())
    }

    pub fn isFormOpen(&self) -> bool {
        self.form.read().isOpen()
    }

    pub fn editTarget(&self) -> Option<String> {
        self.form.read().editTarget().map(str::to_string)
    }

    /// Closing asks first; the answer comes back through `resolve`
    pub fn requestCloseForm(&self) {
        let prompt = self.form.read().closePrompt();
        self.notifier.alert(prompt);
    }

    pub async fn submitForm(&self, fields: &TaskFields) -> Result<SubmitOutcome> {
        let prepared = {
            let cache = self.cache.read();
            let mut form = self.form.write();
            form.remember(fields);
            form.prepare(fields, &cache)
        };

        let submission = match prepared {
            Ok(submission) => submission,
            Err(e @ (TaskError::BlankTitle(_) | TaskError::DuplicateTitle(_))) => {
                let message = e.to_string();
                info!(title = %fields.title.trim(), reason = %message, "Rejected form");
                self.notifier.alert(Prompt::message(message.clone()));
                return Ok(SubmitOutcome::Rejected(message));
            }
            Err(e) => return Err(e),
        };

        match self.dispatch(submission).await {
            Ok(outcome) => {
                self.form.write().reset();
                Ok(outcome)
            }
            Err(e) => {
                error!(error = %e, "Error in submitForm");
                self.notifier.alert(Prompt::message(SUBMIT_FAILED));
                Err(e)
            }
        }
    }

    async fn dispatch(&self, submission: Submission) -> Result<SubmitOutcome> {
        match submission {
            Submission::Create(fields) => {
                let _ticket = self.pending.acquire(CREATE_KEY)?;
                let task = self.store.createTask(&fields).await?;
                info!(id = %task.id, "Created task");
                self.cache.write().insertFront(task.clone());
                self.view.write().showAll();
                self.notifier.toast("Task added successfully!", NoticeKind::Success);
                Ok(SubmitOutcome::Created(task))
            }
            Submission::Update { id, patch } => {
                let _ticket = self.pending.acquire(&id)?;
                let task = self.store.updateTask(&id, &patch).await?;
                info!(id = %task.id, "Updated task");
                self.reconcile(task.clone());
                self.notifier.toast("Task updated successfully!", NoticeKind::Updated);
                Ok(SubmitOutcome::Updated(task))
            }
        }
    }

    fn reconcile(&self, task: Task) {
        let id = task.id.clone();
        if !self.cache.write().replace(task) {
            warn!(%id, "Updated task is no longer cached");
        }
        self.view.write().showAll();
    }

    // ============================================
    // CARD ACTIONS
    // ============================================

    /// Flip `isCompleted` on the server and take its copy
    pub async fn toggleComplete(&self, id: &str) -> Result<Task> {
        let current = self.task(id).ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        let _ticket = self.pending.acquire(id)?;

        match self.store.updateTask(id, &TaskPatch::completion(!current.isCompleted)).await {
            Ok(task) => {
                self.reconcile(task.clone());
                self.notifier.toast("Task updated successfully!", NoticeKind::Updated);
                Ok(task)
            }
            Err(e) => {
                error!(%id, error = %e, "Failed to toggle task");
                self.notifier.alert(Prompt::message(TOGGLE_FAILED));
                Err(e)
            }
        }
    }

    pub fn requestDelete(&self, id: &str) -> Result<()> {
        let task = self.task(id).ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        self.notifier.alert(Prompt::confirm(
            format!("Are you sure you want to delete \"{}\"?", task.title()),
            PendingAction::DeleteTask(task.id),
        ));
        Ok(())
    }

    pub async fn deleteTask(&self, id: &str) -> Result<()> {
        if self.task(id).is_none() {
            return Err(TaskError::NotFound(id.to_string()));
        }
        let _ticket = self.pending.acquire(id)?;

        match self.store.deleteTask(id).await {
            Ok(()) => {
                info!(%id, "Deleted task");
                self.cache.write().remove(id);
                self.view.write().showAll();
                self.notifier.toast("Task deleted successfully!", NoticeKind::Deleted);
                Ok(())
            }
            Err(e) => {
                error!(%id, error = %e, "Failed to delete task");
                self.notifier.alert(Prompt::message(DELETE_FAILED));
                Err(e)
            }
        }
    }

    /// Run a prompt's action if it was confirmed
    pub async fn resolve(&self, prompt: Prompt, answer: Confirmation) -> Result<()> {
        match prompt.resolve(answer) {
            Some(PendingAction::DeleteTask(id)) => self.deleteTask(&id).await,
            Some(PendingAction::CloseForm) => {
                self.form.write().reset();
                Ok(())
            }
            None => Ok(()),
        }
    }

    // ============================================
    // PAGE
    // ============================================

    /// Full page for the current state, with the notices handed in
    pub fn renderPage(&self, notices: Vec<Notice>, alert: Option<AlertView>) -> String {
        let cache = self.cache.read();
        let view = self.view.read();
        let form = self.form.read();
        let load = self.load.read();
        let unavailable = match &*load {
            LoadState::Unavailable(reason) => Some(reason.as_str()),
            _ => None,
        };

        render::renderPage(&PageView {
            tasks: view.apply(&cache),
            view: &*view,
            form: FormView {
                open: form.isOpen(),
                title: form.titleLabel(),
                submitLabel: form.submitLabel(),
                values: form.values(),
            },
            alert,
            notices,
            unavailable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryTaskStore;
    use crate::notify::NoticeBoard;
    use async_trait::async_trait;

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: id.to_string(),
            fields: TaskFields {
                title: title.to_string(),
                description: format!("{title} notes"),
                category: "home".to_string(),
                ..TaskFields::default()
            },
            isCompleted: false,
            createdAt: format!("2024-05-0{id}T09:00:00.000Z"),
        }
    }

    fn fields(title: &str) -> TaskFields {
        TaskFields {
            title: title.to_string(),
            ..TaskFields::default()
        }
    }

    async fn appWith(tasks: Vec<Task>) -> (TodoApp, Arc<MemoryTaskStore>, Arc<NoticeBoard>) {
        let store = Arc::new(MemoryTaskStore::withTasks(tasks));
        let board = Arc::new(NoticeBoard::new());
        let app = TodoApp::new(store.clone(), board.clone());
        app.initialise().await;
        (app, store, board)
    }

    /// Store whose every call fails like an unreachable server
    struct DownStore;

    #[async_trait]
    impl TaskStore for DownStore {
        async fn listTasks(&self) -> Result<Vec<Task>> {
            Err(TaskError::Transport("connection refused".into()))
        }
        async fn createTask(&self, _: &TaskFields) -> Result<Task> {
            Err(TaskError::Transport("connection refused".into()))
        }
        async fn updateTask(&self, _: &str, _: &TaskPatch) -> Result<Task> {
            Err(TaskError::Status { status: 500 })
        }
        async fn deleteTask(&self, _: &str) -> Result<()> {
            Err(TaskError::Status { status: 500 })
        }
    }

    #[tokio::test]
    async fn initialise_fills_cache_newest_first() {
        let (app, _, _) = appWith(vec![task("1", "Old"), task("2", "New")]).await;
        assert_eq!(app.loadState(), LoadState::Loaded);
        let titles: Vec<_> = app.tasks().into_iter().map(|t| t.fields.title).collect();
        assert_eq!(titles, ["New", "Old"]);
    }

    #[tokio::test]
    async fn unreachable_store_degrades_to_empty_list() {
        let board = Arc::new(NoticeBoard::new());
        let app = TodoApp::new(Arc::new(DownStore), board);
        let state = app.initialise().await;
        assert!(matches!(state, LoadState::Unavailable(_)));
        assert!(app.tasks().is_empty());
        assert!(app.renderList().contains("No results found"));
    }

    #[tokio::test]
    async fn create_goes_to_head_of_cache() {
        let (app, store, board) = appWith(vec![task("1", "Walk dog")]).await;
        app.openCreate();

        let outcome = app.submitForm(&fields("  Buy milk ")).await.unwrap();
        let SubmitOutcome::Created(created) = outcome else {
            panic!("expected create");
        };
        assert_eq!(created.title(), "Buy milk");
        assert_eq!(app.tasks()[0].id, created.id);
        assert_eq!(store.len(), 2);
        assert!(!app.isFormOpen());
        assert_eq!(board.toasts()[0].kind, NoticeKind::Success);
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected_without_store_call() {
        let (app, store, board) = appWith(vec![]).await;
        app.openCreate();
        app.submitForm(&fields("Buy milk")).await.unwrap();

        app.openCreate();
        let outcome = app.submitForm(&fields("buy MILK")).await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected(crate::form::DUPLICATE_ON_CREATE.to_string())
        );
        assert_eq!(app.tasks().len(), 1);
        assert_eq!(store.len(), 1);
        assert!(app.isFormOpen());
        let alert = board.currentPrompt().unwrap();
        assert_eq!(alert.message, crate::form::DUPLICATE_ON_CREATE);
        assert!(!alert.confirmable);
    }

    #[tokio::test]
    async fn blank_title_is_rejected_without_store_call() {
        let (app, store, board) = appWith(vec![]).await;
        app.openCreate();

        let outcome = app.submitForm(&fields("   ")).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected(crate::form::TITLE_REQUIRED.to_string()));
        assert!(app.tasks().is_empty());
        assert_eq!(store.len(), 0);
        assert!(app.isFormOpen());
        assert_eq!(board.currentPrompt().unwrap().message, crate::form::TITLE_REQUIRED);

        // A second blank submit is still a missing title, not a duplicate
        let again = app.submitForm(&fields("")).await.unwrap();
        assert_eq!(again, SubmitOutcome::Rejected(crate::form::TITLE_REQUIRED.to_string()));
    }

    #[tokio::test]
    async fn busy_create_alerts_and_keeps_form_open() {
        let (app, store, board) = appWith(vec![]).await;
        app.openCreate();
        let _held = app.pending.acquire(CREATE_KEY).unwrap();

        assert!(matches!(app.submitForm(&fields("Buy milk")).await, Err(TaskError::Busy(_))));
        assert_eq!(board.currentPrompt().unwrap().message, SUBMIT_FAILED);
        assert_eq!(store.len(), 0);
        assert!(app.isFormOpen());
    }

    #[tokio::test]
    async fn edit_replaces_slot_in_place() {
        let (app, _, _) = appWith(vec![task("1", "A"), task("2", "B"), task("3", "C")]).await;
        let mut values = app.openEdit("2").unwrap();
        assert_eq!(app.editTarget().as_deref(), Some("2"));
        values.title = "B2".into();

        let outcome = app.submitForm(&values).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Updated(_)));
        let ids: Vec<_> = app.tasks().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["3", "2", "1"]);
        assert_eq!(app.task("2").unwrap().title(), "B2");
        assert_eq!(app.editTarget(), None);
    }

    #[tokio::test]
    async fn toggling_twice_restores_task() {
        let (app, _, board) = appWith(vec![task("1", "Buy milk")]).await;
        let original = app.task("1").unwrap();

        let once = app.toggleComplete("1").await.unwrap();
        assert!(once.isCompleted);
        let twice = app.toggleComplete("1").await.unwrap();
        assert_eq!(twice, original);
        assert_eq!(board.toasts().len(), 2);
        assert!(board.toasts().iter().all(|n| n.kind == NoticeKind::Updated));
    }

    #[tokio::test]
    async fn confirmed_delete_removes_task() {
        let (app, store, board) = appWith(vec![task("1", "Keep"), task("42", "Drop")]).await;

        app.requestDelete("42").unwrap();
        let prompt = board.takePrompt().unwrap();
        assert_eq!(prompt.text(), "Are you sure you want to delete \"Drop\"?");
        app.resolve(prompt, Confirmation::Confirmed).await.unwrap();

        assert!(app.task("42").is_none());
        assert!(store.get("42").is_none());
        assert_eq!(board.toasts().last().unwrap().kind, NoticeKind::Deleted);
    }

    #[tokio::test]
    async fn cancelled_delete_keeps_task() {
        let (app, _, board) = appWith(vec![task("42", "Drop")]).await;
        app.requestDelete("42").unwrap();
        let prompt = board.takePrompt().unwrap();
        app.resolve(prompt, Confirmation::Cancelled).await.unwrap();
        assert!(app.task("42").is_some());
        assert!(board.toasts().is_empty());
    }

    #[tokio::test]
    async fn failed_mutations_leave_cache_alone() {
        let board = Arc::new(NoticeBoard::new());
        let app = TodoApp::new(Arc::new(DownStore), board.clone());
        app.cache.write().replaceAll(vec![task("1", "Buy milk")]);

        assert!(app.toggleComplete("1").await.is_err());
        assert_eq!(board.currentPrompt().unwrap().message, TOGGLE_FAILED);
        assert!(!app.task("1").unwrap().isCompleted);

        assert!(app.deleteTask("1").await.is_err());
        assert_eq!(board.currentPrompt().unwrap().message, DELETE_FAILED);
        assert!(app.task("1").is_some());

        app.openCreate();
        assert!(app.submitForm(&fields("New")).await.is_err());
        assert_eq!(board.currentPrompt().unwrap().message, SUBMIT_FAILED);
        assert_eq!(app.tasks().len(), 1);
        assert!(app.isFormOpen());
        assert!(!app.isPending("1"));
    }

    #[tokio::test]
    async fn busy_task_refuses_second_request() {
        let (app, _, _) = appWith(vec![task("1", "Buy milk")]).await;
        let _held = app.pending.acquire("1").unwrap();
        assert!(matches!(app.toggleComplete("1").await, Err(TaskError::Busy(_))));
        assert!(matches!(app.deleteTask("1").await, Err(TaskError::Busy(_))));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (app, _, _) = appWith(vec![]).await;
        assert!(matches!(app.toggleComplete("9").await, Err(TaskError::NotFound(_))));
        assert!(matches!(app.requestDelete("9"), Err(TaskError::NotFound(_))));
        assert!(matches!(app.openEdit("9"), Err(TaskError::NotFound(_))));
    }

    #[tokio::test]
    async fn close_form_only_on_confirm() {
        let (app, _, board) = appWith(vec![task("1", "Buy milk")]).await;
        app.openEdit("1").unwrap();

        app.requestCloseForm();
        let prompt = board.takePrompt().unwrap();
        assert_eq!(prompt.text(), "Are you sure you want to close the form?");
        app.resolve(prompt, Confirmation::Cancelled).await.unwrap();
        assert!(app.isFormOpen());

        app.requestCloseForm();
        app.resolve(board.takePrompt().unwrap(), Confirmation::Confirmed).await.unwrap();
        assert!(!app.isFormOpen());
        assert_eq!(app.editTarget(), None);
    }

    #[tokio::test]
    async fn mutation_shows_full_cache_but_keeps_tab_highlight() {
        let (app, _, _) = appWith(vec![task("1", "Buy milk"), task("2", "Walk dog")]).await;
        app.selectTab(Tab::Active);
        app.toggleComplete("1").await.unwrap();

        assert_eq!(app.visibleTasks().len(), 2);
        assert_eq!(app.viewState().highlighted, Tab::Active);

        app.selectTab(Tab::Active);
        assert_eq!(app.visibleTasks().len(), 1);
    }

    #[tokio::test]
    async fn search_then_focus_shows_everything() {
        let (app, _, _) = appWith(vec![task("1", "Buy milk"), task("2", "Walk dog")]).await;
        app.search("DOG");
        assert_eq!(app.visibleTasks().len(), 1);
        app.focusSearch();
        assert_eq!(app.visibleTasks().len(), 2);
        assert_eq!(app.viewState().query, "DOG");
    }
}
