// Local web shell - serves the rendered page and maps form posts onto the app
// Mutating routes answer 303 back to the list; failures show up as alerts on the page

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::TaskStore;
use crate::app::TodoApp;
use crate::error::{Result, TaskError};
use crate::models::{Tab, TaskFields};
use crate::notify::{Confirmation, NoticeBoard};

/// App state shared by every route
pub struct Shell {
    pub app: TodoApp,
    pub board: Arc<NoticeBoard>,
}

impl Shell {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        let board = Arc::new(NoticeBoard::new());
        Self {
            app: TodoApp::new(store, board.clone()),
            board,
        }
    }

    /// Current page; toasts are shown once
    fn page(&self) -> Html<String> {
        Html(self.app.renderPage(self.board.drainToasts(), self.board.currentPrompt()))
    }
}

pub type ShellState = Arc<Shell>;

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let status = match &self {
            TaskError::NotFound(_) => StatusCode::NOT_FOUND,
            TaskError::Busy(_) => StatusCode::CONFLICT,
            TaskError::BlankTitle(_) | TaskError::DuplicateTitle(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TaskError::Transport(_) | TaskError::Status { .. } | TaskError::Decode(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

fn backToList() -> Response {
    Redirect::to("/").into_response()
}

/// Missing tasks and busy tasks answer with a status; other failures were already raised as alerts
fn afterAction<T>(result: Result<T>) -> Response {
    match result {
        Ok(_) => backToList(),
        Err(e @ (TaskError::NotFound(_) | TaskError::Busy(_))) => {
            warn!(error = %e, "Action refused");
            e.into_response()
        }
        Err(_) => backToList(),
    }
}

/// A busy create or edit has already raised its alert, so the form goes back to the page
fn afterSubmit<T>(result: Result<T>) -> Response {
    match result {
        Err(TaskError::Busy(key)) => {
            warn!(%key, "Submit while a request is in flight");
            backToList()
        }
        other => afterAction(other),
    }
}

pub fn router(shell: ShellState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", get(searchTasks))
        .route("/tabs/{tab}", post(selectTab))
        .route("/form", post(submitForm))
        .route("/form/new", get(openCreate))
        .route("/form/close", post(closeForm))
        .route("/tasks/{id}/edit", get(openEdit))
        .route("/tasks/{id}/complete", post(toggleComplete))
        .route("/tasks/{id}/delete", post(requestDelete))
        .route("/prompt/confirm", post(confirmPrompt))
        .route("/prompt/cancel", post(cancelPrompt))
        .with_state(shell)
}

// ============================================
// HANDLERS
// ============================================

async fn index(State(shell): State<ShellState>) -> Html<String> {
    shell.page()
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn searchTasks(State(shell): State<ShellState>, Query(query): Query<SearchQuery>) -> Html<String> {
    shell.app.focusSearch();
    shell.app.search(&query.q);
    shell.page()
}

async fn selectTab(State(shell): State<ShellState>, Path(tab): Path<String>) -> Response {
    match Tab::fromName(&tab) {
        Some(tab) => {
            shell.app.selectTab(tab);
            backToList()
        }
        None => (StatusCode::NOT_FOUND, "Unknown tab").into_response(),
    }
}

async fn openCreate(State(shell): State<ShellState>) -> Html<String> {
    shell.app.openCreate();
    shell.page()
}

async fn openEdit(State(shell): State<ShellState>, Path(id): Path<String>) -> Response {
    match shell.app.openEdit(&id) {
        Ok(_) => shell.page().into_response(),
        Err(e) => e.into_response(),
    }
}

async fn submitForm(State(shell): State<ShellState>, Form(fields): Form<TaskFields>) -> Response {
    afterSubmit(shell.app.submitForm(&fields).await)
}

async fn closeForm(State(shell): State<ShellState>) -> Response {
    shell.app.requestCloseForm();
    backToList()
}

async fn toggleComplete(State(shell): State<ShellState>, Path(id): Path<String>) -> Response {
    afterAction(shell.app.toggleComplete(&id).await)
}

async fn requestDelete(State(shell): State<ShellState>, Path(id): Path<String>) -> Response {
    afterAction(shell.app.requestDelete(&id))
}

async fn confirmPrompt(State(shell): State<ShellState>) -> Response {
    resolvePrompt(&shell, Confirmation::Confirmed).await
}

async fn cancelPrompt(State(shell): State<ShellState>) -> Response {
    resolvePrompt(&shell, Confirmation::Cancelled).await
}

async fn resolvePrompt(shell: &Shell, answer: Confirmation) -> Response {
    match shell.board.takePrompt() {
        Some(prompt) => afterAction(shell.app.resolve(prompt, answer).await),
        None => backToList(),
    }
}

// ============================================
// SERVER
// ============================================

/// Serve until `shutdown` is cancelled
pub async fn serve(shell: ShellState, addr: SocketAddr, shutdown: CancellationToken) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Todo app listening");

    axum::serve(listener, router(shell))
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
        })
        .await?;

    info!("Todo app stopped");
    Ok(())
}
