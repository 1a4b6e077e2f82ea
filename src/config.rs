// Config file loading for tasklist
// Settings live in the YAML frontmatter of ~/.tasklist/config.md

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, TaskError};
use crate::models::{Settings, SettingsOverride};

// ============================================
// PATH HELPERS
// ============================================

/// Global config directory (~/.tasklist/), falls back to the working directory without a home
pub fn globalConfigDir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tasklist")
}

pub fn globalConfigPath() -> PathBuf {
    globalConfigDir().join("config.md")
}

// ============================================
// FRONTMATTER PARSING
// ============================================

/// YAML between the leading `---` fences; the markdown after them is free-form notes
pub fn parseFrontmatter<T: serde::de::DeserializeOwned>(content: &str) -> Option<T> {
    let (yaml, _notes) = content.trim_start().strip_prefix("---")?.split_once("\n---")?;
    serde_yaml::from_str(yaml).ok()
}

// ============================================
// SETTINGS
// ============================================

/// Defaults merged with whatever the file at `path` sets. A missing or broken file means defaults.
pub fn loadSettingsFrom(path: &Path) -> Settings {
    let defaults = Settings::default();

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "No config file, using defaults");
            return defaults;
        }
    };

    match parseFrontmatter::<SettingsOverride>(&content) {
        Some(over) => defaults.withOverride(&over),
        None => {
            warn!(path = %path.display(), "Config frontmatter could not be parsed, using defaults");
            defaults
        }
    }
}

pub fn loadSettings() -> Settings {
    loadSettingsFrom(&globalConfigPath())
}

impl Settings {
    pub fn bindSocket(&self) -> Result<SocketAddr> {
        self.bindAddress
            .parse()
            .map_err(|e| TaskError::Config(format!("bindAddress {:?}: {}", self.bindAddress, e)))
    }
}
