//! Configuration for tagsync
//!
//! Loads settings from ~/.config/tagsync/config.toml

pub mod keymap;

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use keymap::parse_key_notation;

/// Main settings structure
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub editor: EditorSettings,
    pub html_tools: HtmlToolsSettings,
}

/// Indentation settings used when the wrap command re-indents lines
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
    /// Number of spaces per indentation unit (default: 4)
    pub tab_width: usize,
    /// Indent with spaces instead of a tab character (default: true)
    pub soft_tabs: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_width: 4,
            soft_tabs: true,
        }
    }
}

/// Matching tag tools
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HtmlToolsSettings {
    /// Mirror tag name edits onto the matching tag (default: true)
    pub mirror_tags: bool,
    /// Element generated by the wrap command (default: "p")
    pub wrap_tag: String,
    /// Key that runs the wrap command (default: "<A-w>")
    pub wrap_key: String,
}

impl Default for HtmlToolsSettings {
    fn default() -> Self {
        Self {
            mirror_tags: true,
            wrap_tag: "p".to_string(),
            wrap_key: "<A-w>".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let settings = toml::from_str::<Settings>(content)?;
        Ok(settings)
    }
}

/// Get the config file path
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tagsync").join("config.toml"))
}

/// Load settings from the default config file
pub fn load_config() -> Settings {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Settings::default(),
    }
}

/// Load settings from a file
/// Returns default settings if the file doesn't exist or can't be parsed
pub fn load_config_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match Settings::from_toml_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(target: "tagsync::config", path = %path.display(), "failed to parse config file: {e}");
                Settings::default()
            }
        },
        Err(e) => {
            tracing::warn!(target: "tagsync::config", path = %path.display(), "failed to read config file: {e}");
            Settings::default()
        }
    }
}
