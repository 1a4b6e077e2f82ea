// Error type shared by the task service, the app and the web shell

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("HTTP error! Status: {status}")]
    Status { status: u16 },
    #[error("Could not decode response: {0}")]
    Decode(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Task not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    BlankTitle(String),
    #[error("{0}")]
    DuplicateTitle(String),
    #[error("Another request for {0} is still in flight")]
    Busy(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for TaskError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            Self::Status { status: status.as_u16() }
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl TaskError {
    /// Validation failures are shown as-is; everything else gets the generic retry message
    pub fn isValidation(&self) -> bool {
        matches!(self, Self::BlankTitle(_) | Self::DuplicateTitle(_))
    }
}

pub type Result<T, E = TaskError> = std::result::Result<T, E>;
