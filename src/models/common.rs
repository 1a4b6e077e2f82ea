// Common types for the tasklist client
// Wire names stay lowercase to match the task API and the page markup

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Current time as an ISO-8601 string with millisecond precision (`2024-05-01T09:30:00.000Z`)
pub fn nowIso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Tab filter shown above the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    All,
    Active,
    Completed,
}

impl Tab {
    pub const EVERY: [Tab; 3] = [Tab::All, Tab::Active, Tab::Completed];

    pub fn fromName(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All Tasks",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

/// Notification category, picks the toast styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Updated,
    Deleted,
}

impl NoticeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }

    pub fn iconClass(&self) -> &'static str {
        match self {
            Self::Success => "fa-solid fa-circle-check",
            Self::Updated => "fa-solid fa-bullhorn",
            Self::Deleted => "fa-solid fa-circle-exclamation",
        }
    }
}
