// HTML rendering for the task list and the page around it
// Every user-supplied string goes through escapeHtml before it is embedded

use std::fmt::Write;

use crate::filter::ViewState;
use crate::models::{Tab, Task, TaskFields};
use crate::notify::{AlertView, Notice};

pub const EMPTY_STATE: &str = r#"<div class="empty-tasks">
    <img src="https://cdn.jsdelivr.net/gh/twitter/twemoji@14.0.2/assets/72x72/1f4dd.png" alt="Empty" class="empty-illustration">
    <p class="empty-text">No results found</p>
</div>"#;

pub fn escapeHtml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `13:30` -> `1:30 PM`. Blank stays blank; anything without an hour and minutes is shown as given.
pub fn convertTime(time: &str) -> String {
    if time.is_empty() {
        return String::new();
    }
    let mut parts = time.splitn(2, ':');
    let hour = parts.next().and_then(|h| h.trim().parse::<u32>().ok());
    match (hour, parts.next()) {
        (Some(hour), Some(minutes)) => {
            let shown = if hour % 12 == 0 { 12 } else { hour % 12 };
            let suffix = if hour >= 12 { "PM" } else { "AM" };
            format!("{shown}:{minutes} {suffix}")
        }
        _ => time.to_string(),
    }
}

/// Reverses the dash-separated segments: `2024-05-01` -> `01-05-2024`
pub fn formatDate(date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }
    date.split('-').rev().collect::<Vec<_>>().join("-")
}

pub fn capitaliseFirstLetter(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn taskCard(task: &Task) -> String {
    let f = &task.fields;
    let id = escapeHtml(&task.id);
    let path = escapeHtml(&urlencoding::encode(&task.id));
    let completed = if task.isCompleted { " completed" } else { "" };
    let toggleLabel = if task.isCompleted { "Mark as Active" } else { "Mark as Complete" };

    format!(
        r#"<div class="task-card {color}{completed}" data-id="{id}">
    <div class="task-header">
        <div class="task-meta">
            <span class="task-category">{category}</span> -
            <span class="task-priority">{priority} Priority</span>
        </div>
        <div class="task-menu">
            <i class="fa-solid fa-ellipsis fa-icon"></i>
            <div class="dropdown-menu">
                <a class="dropdown-item edit-btn" href="/tasks/{path}/edit"><i class="fa-solid fa-pen-to-square fa-icon"></i> Edit</a>
                <form method="post" action="/tasks/{path}/complete"><button type="submit" class="dropdown-item complete-btn"><i class="fa-solid fa-check fa-icon"></i> {toggleLabel}</button></form>
                <form method="post" action="/tasks/{path}/delete"><button type="submit" class="dropdown-item delete-btn"><i class="fa-solid fa-trash fa-icon"></i> Delete</button></form>
            </div>
        </div>
    </div>
    <h3 class="task-title">{title}</h3>
    <p class="task-description">{description}</p>
    <div class="task-time-row">
        <div class="task-time">{start} - {end}</div>
        <div class="task-due-date">Due: {due}</div>
    </div>
</div>"#,
        color = escapeHtml(&f.cardColor),
        category = escapeHtml(&capitaliseFirstLetter(&f.category)),
        priority = escapeHtml(&capitaliseFirstLetter(&f.priority)),
        title = escapeHtml(&f.title),
        description = escapeHtml(&f.description),
        start = escapeHtml(&convertTime(&f.startTime)),
        end = escapeHtml(&convertTime(&f.endTime)),
        due = escapeHtml(&formatDate(&f.dueDate)),
    )
}

/// One card per task in the given order, or the empty-state placeholder
pub fn renderTasks<'a, I>(tasks: I) -> String
where
    I: IntoIterator<Item = &'a Task>,
{
    let cards: Vec<String> = tasks.into_iter().map(taskCard).collect();
    if cards.is_empty() {
        return EMPTY_STATE.to_string();
    }
    cards.join("\n")
}

// ============================================
// PAGE PIECES
// ============================================

pub fn renderTabs(highlighted: Tab) -> String {
    let mut html = String::from(r#"<div class="tab-list">"#);
    for tab in Tab::EVERY {
        let active = if tab == highlighted { " active" } else { "" };
        let _ = write!(
            html,
            r#"<form method="post" action="/tabs/{name}"><button type="submit" class="tab-button tab-{name}{active}">{label}</button></form>"#,
            name = tab.name(),
            label = tab.label(),
        );
    }
    html.push_str("</div>");
    html
}

pub fn renderSearch(query: &str) -> String {
    format!(
        r#"<form method="get" action="/search" class="search-form"><input class="search-input" type="search" name="q" placeholder="Search tasks..." value="{}"></form>"#,
        escapeHtml(query)
    )
}

/// Form modal contents as the controller currently holds them
#[derive(Debug, Clone)]
pub struct FormView<'a> {
    pub open: bool,
    pub title: &'a str,
    pub submitLabel: &'a str,
    pub values: &'a TaskFields,
}

fn textInput(label: &str, name: &str, kind: &str, value: &str) -> String {
    let required = if name == "title" { " required" } else { "" };
    format!(
        r#"<label class="form-label">{label}<input class="form-input" type="{kind}" name="{name}" value="{value}"{required}></label>"#,
        value = escapeHtml(value),
    )
}

fn selectInput(label: &str, name: &str, options: &[&str], current: &str) -> String {
    let mut html = format!(r#"<label class="form-label">{label}<select class="form-input" name="{name}">"#);
    for option in options {
        let selected = if option.eq_ignore_ascii_case(current) { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{option}"{selected}>{shown}</option>"#,
            shown = capitaliseFirstLetter(option),
        );
    }
    html.push_str("</select></label>");
    html
}

pub fn renderForm(form: &FormView<'_>) -> String {
    let v = form.values;
    let show = if form.open { " show" } else { "" };
    let mut fields = String::new();
    fields.push_str(&textInput("Task Title", "title", "text", &v.title));
    let _ = write!(
        fields,
        r#"<label class="form-label">Description<textarea class="form-input" name="description">{}</textarea></label>"#,
        escapeHtml(&v.description)
    );
    fields.push_str(&textInput("Category", "category", "text", &v.category));
    fields.push_str(&selectInput("Priority", "priority", &["low", "medium", "high"], &v.priority));
    fields.push_str(&textInput("Card Color", "cardColor", "text", &v.cardColor));
    fields.push_str(&textInput("Start Time", "startTime", "time", &v.startTime));
    fields.push_str(&textInput("End Time", "endTime", "time", &v.endTime));
    fields.push_str(&textInput("Due Date", "dueDate", "date", &v.dueDate));

    format!(
        r#"<div class="modal-overlay{show}" id="addTaskModal">
    <div class="modal">
        <div class="modal-header">
            <h2 class="modal-title">{title}</h2>
            <form method="post" action="/form/close"><button type="submit" class="modal-close-btn">&times;</button></form>
        </div>
        <form class="todo-app-form" method="post" action="/form">
            {fields}
            <div class="modal-footer">
                <button type="submit" class="btn submit-btn">{submit}</button>
            </div>
        </form>
        <form method="post" action="/form/close"><button type="submit" class="btn cancel-btn">Cancel</button></form>
    </div>
</div>"#,
        title = escapeHtml(form.title),
        submit = escapeHtml(form.submitLabel),
    )
}

/// Yes/Cancel for a confirmable prompt, a single OK otherwise
pub fn renderAlert(alert: Option<&AlertView>) -> String {
    let Some(alert) = alert else {
        return r#"<div class="modal-overlay" id="alertModal"></div>"#.to_string();
    };
    let buttons = if alert.confirmable {
        r#"<form method="post" action="/prompt/cancel"><button type="submit" id="alertCancel" class="btn">Cancel</button></form>
            <form method="post" action="/prompt/confirm"><button type="submit" id="alertConfirm" class="btn">Yes</button></form>"#
    } else {
        r#"<form method="post" action="/prompt/cancel"><button type="submit" id="alertConfirm" class="btn">OK</button></form>"#
    };
    format!(
        r#"<div class="modal-overlay show" id="alertModal">
    <div class="modal alert-modal">
        <p class="alert-message">{message}</p>
        <div class="alert-actions">
            {buttons}
        </div>
    </div>
</div>"#,
        message = escapeHtml(&alert.message),
    )
}

pub fn renderToasts(notices: &[Notice]) -> String {
    let mut html = String::from(r#"<div id="toast-container">"#);
    for notice in notices {
        let _ = write!(
            html,
            r#"<div class="toast toast-{kind}"><span class="toast-icon"><i class="{icon}"></i></span><div class="toast-message">{message}</div><a class="toast-close" href="/">&times;</a></div>"#,
            kind = notice.kind.name(),
            icon = notice.kind.iconClass(),
            message = escapeHtml(&notice.message),
        );
    }
    html.push_str("</div>");
    html
}

/// Everything the page shows in one render
pub struct PageView<'a> {
    pub tasks: Vec<&'a Task>,
    pub view: &'a ViewState,
    pub form: FormView<'a>,
    pub alert: Option<AlertView>,
    pub notices: Vec<Notice>,
    pub unavailable: Option<&'a str>,
}

pub fn renderPage(page: &PageView<'_>) -> String {
    let banner = match page.unavailable {
        Some(reason) => format!(
            r#"<div class="load-error" title="{}">Tasks could not be loaded. The list may be incomplete.</div>"#,
            escapeHtml(reason)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Todo App</title>
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
</head>
<body>
<div class="todo-app">
    <header class="todo-header">
        <h1>Todo App</h1>
        <a class="btn add-btn" href="/form/new">Add New Task</a>
    </header>
    {search}
    {tabs}
    {banner}
    <div id="todo-list">
{list}
    </div>
</div>
{form}
{alert}
{toasts}
</body>
</html>"#,
        search = renderSearch(&page.view.query),
        tabs = renderTabs(page.view.highlighted),
        list = renderTasks(page.tasks.iter().copied()),
        form = renderForm(&page.form),
        alert = renderAlert(page.alert.as_ref()),
        toasts = renderToasts(&page.notices),
    )
}
