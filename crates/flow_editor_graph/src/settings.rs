// SPDX-License-Identifier: MIT OR Apache-2.0
//! Debugger settings, stored as RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the settings file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid RON
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be written as RON
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Breakpoint behavior of debug sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebuggerSettings {
    /// Master switch; when off, breakpoints never pause a session
    pub breakpoints_enabled: bool,
    /// Whether node-level breakpoints pause on any input trigger
    pub pause_on_node_breakpoints: bool,
    /// Log every pin trigger received by editor nodes
    pub log_triggers: bool,
}

impl Default for DebuggerSettings {
    fn default() -> Self {
        Self {
            breakpoints_enabled: true,
            pause_on_node_breakpoints: true,
            log_triggers: false,
        }
    }
}

impl DebuggerSettings {
    /// Parse settings from RON text
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Render settings as pretty RON
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&text)?;
        tracing::debug!("Loaded debugger settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}
