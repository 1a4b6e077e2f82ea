// Models module for tasklist
// All wire fields use camelCase

pub mod common;
pub mod config;
pub mod task;

pub use common::{NoticeKind, Tab, nowIso};
pub use config::{Settings, SettingsOverride, StoreKind};
pub use task::{NewTask, Task, TaskFields, TaskPatch};
