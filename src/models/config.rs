// Configuration model for tasklist
// Read from the frontmatter of ~/.tasklist/config.md, every key optional

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "http://localhost:3000/tasks";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:44056";

/// Which task store backs the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Http,
    Memory,
}

/// All settings with their defaults filled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub apiBase: String,
    pub bindAddress: String,
    pub logFilter: String,
    pub store: StoreKind,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            apiBase: DEFAULT_API_BASE.to_string(),
            bindAddress: DEFAULT_BIND_ADDRESS.to_string(),
            logFilter: "info".to_string(),
            store: StoreKind::Http,
        }
    }
}

/// Settings as written in the config file (all fields optional)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apiBase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bindAddress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logFilter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreKind>,
}

impl Settings {
    /// Merge with file override
    pub fn withOverride(&self, over: &SettingsOverride) -> Self {
        Self {
            apiBase: over.apiBase.clone().unwrap_or_else(|| self.apiBase.clone()),
            bindAddress: over.bindAddress.clone().unwrap_or_else(|| self.bindAddress.clone()),
            logFilter: over.logFilter.clone().unwrap_or_else(|| self.logFilter.clone()),
            store: over.store.unwrap_or(self.store),
        }
    }
}
