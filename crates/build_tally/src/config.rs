//! Plugin configuration, loaded once from `config.toml`. No hot reload.
//!
//! Every key is optional; a missing file means all defaults, and in that
//! case the bundled default config is written out so operators have
//! something to edit.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Top-level config file layout.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TallyConfig {
    pub area: AreaConfig,
}

/// The tracked area: one world, six integer bounds.
///
/// Keys are camelCase on disk (`minX`, `maxX`, ...) to match the recognized
/// configuration surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AreaConfig {
    pub world: String,
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            world: "world_nether".to_string(),
            min_x: -100,
            max_x: 100,
            min_y: -100,
            max_y: 100,
            min_z: -100,
            max_z: 100,
        }
    }
}

impl TallyConfig {
    /// Loads config from `path`, falling back to built-in defaults.
    ///
    /// When the file is missing, the bundled default config is written to
    /// `path` and the defaults are returned. An unreadable or unparseable
    /// existing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let text = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
        } else {
            let default_toml = include_str!("../config.toml");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteDefault(path.to_path_buf(), e))?;
            }
            std::fs::write(path, default_toml)
                .map_err(|e| ConfigError::WriteDefault(path.to_path_buf(), e))?;
            info!("wrote default config to {}", path.display());
            Ok(Self::default())
        }
    }
}
