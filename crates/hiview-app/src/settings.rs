use anyhow::{Context, Result};
use hiview_core::StyleMode;
use hiview_graph::{DEFAULT_MAX_DEPTH, StyleColors};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Deepest hierarchy a traversal accepts before reporting a malformed tree.
    pub max_tree_depth: usize,
    pub default_style: StyleMode,
    pub show_pleio_edges: bool,
    pub colors: StyleColors,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            max_tree_depth: DEFAULT_MAX_DEPTH,
            default_style: StyleMode::default(),
            show_pleio_edges: true,
            colors: StyleColors::default(),
        }
    }
}

impl ViewerSettings {
    /// `<config dir>/hiview/settings.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hiview").join("settings.json"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))?;
        Ok(settings)
    }

    /// Settings from `path`, or defaults when the file is absent or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                tracing::info!("Settings loaded from {:?}", path);
                settings
            }
            Err(e) => {
                tracing::error!("{e:#}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
