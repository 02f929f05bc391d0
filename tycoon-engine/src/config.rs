//! Engine configuration, optionally read from a TOML file.
//!
//! ```toml
//! [engine]
//! lock-item-tag = "LockedItem"
//! id-attribute = "Id"
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Tag that makes an item start locked when it has no stored data.
pub const DEFAULT_LOCK_ITEM_TAG: &str = "LockedItem";

/// Node attribute holding an explicit item id.
pub const DEFAULT_ID_ATTRIBUTE: &str = "Id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EngineConfig {
    #[serde(default = "default_lock_item_tag")]
    pub lock_item_tag: String,
    #[serde(default = "default_id_attribute")]
    pub id_attribute: String,
}

fn default_lock_item_tag() -> String {
    DEFAULT_LOCK_ITEM_TAG.to_string()
}

fn default_id_attribute() -> String {
    DEFAULT_ID_ATTRIBUTE.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_item_tag: default_lock_item_tag(),
            id_attribute: default_id_attribute(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    engine: EngineConfig,
}

impl EngineConfig {
    /// Parses the `[engine]` section of a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(file.engine)
    }

    /// Loads configuration from `path`.
    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No engine config found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded engine config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse engine config {:?}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read engine config {:?}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }
}
