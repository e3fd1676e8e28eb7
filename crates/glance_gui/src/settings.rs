//! Settings management

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Environment variable naming a JSON settings file.
pub const CONFIG_ENV_VAR: &str = "GLANCE_CONFIG";

/// Debug GUI settings. Missing fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiSettings {
    pub window: WindowSettings,
    pub graphics: GraphicsSettings,
    pub panel: PanelSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    /// Swap interval 1 when set, 0 otherwise
    pub vsync: bool,
    /// Straight (non-premultiplied) RGBA
    pub clear_color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    pub title: String,
    pub position: [f32; 2],
    pub size: [f32; 2],
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Glance".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            vsync: false,
            clear_color: [0.45, 0.55, 0.60, 1.00],
        }
    }
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            title: "Debug".to_string(),
            position: [100.0, 100.0],
            size: [300.0, 200.0],
        }
    }
}

impl GraphicsSettings {
    pub fn premultiplied_clear_color(&self) -> [f32; 4] {
        let [r, g, b, a] = self.clear_color;
        [r * a, g * a, b * a, a]
    }
}

impl GuiSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from [`CONFIG_ENV_VAR`] when set, defaults otherwise.
    pub fn from_env() -> Result<Self, SettingsError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
