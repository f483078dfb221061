// User settings
// Loaded from ~/.config/taskgrid/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_RELAY_ENDPOINT: &str = "http://localhost:8787/v1/chat/completions";
pub const DEFAULT_RELAY_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // History
    #[serde(rename = "history.maxEntries")]
    pub history_max_entries: usize,

    // Grid
    #[serde(rename = "grid.defaultColumnWidth")]
    pub default_column_width: u32,

    #[serde(rename = "grid.minColumnWidth")]
    pub min_column_width: u32,

    // Paste ("replace", "insert-rows", "insert-columns", "append", "values-only", "formats-only")
    #[serde(rename = "paste.defaultMode")]
    pub default_paste_mode: String,

    // Generation relay
    #[serde(rename = "generation.endpoint")]
    pub generation_endpoint: String,

    #[serde(rename = "generation.model")]
    pub generation_model: String,

    #[serde(rename = "generation.maxTokens")]
    pub generation_max_tokens: u32,

    #[serde(rename = "generation.timeoutSecs")]
    pub generation_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_max_entries: 100,
            default_column_width: 150,
            min_column_width: 80,
            default_paste_mode: "replace".to_string(),
            generation_endpoint: DEFAULT_RELAY_ENDPOINT.to_string(),
            generation_model: DEFAULT_RELAY_MODEL.to_string(),
            generation_max_tokens: 2048,
            generation_timeout_secs: 60,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskgrid");
        config_dir.join("settings.json")
    }

    /// Load settings from the user config dir, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing or unreadable file yields defaults;
    /// keys that are absent keep their default values.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Strip comments (lines starting with //)
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");

                match serde_json::from_str(&cleaned) {
                    Ok(settings) => settings,
                    Err(e) => {
                        log::warn!("error parsing {}: {}; using default settings", path.display(), e);
                        Self::default()
                    }
                }
            }
            Err(e) => {
                log::warn!("error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save current settings to the user config dir
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Width for new columns, never below the configured minimum
    pub fn column_width(&self) -> u32 {
        self.default_column_width.max(self.min_column_width)
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
