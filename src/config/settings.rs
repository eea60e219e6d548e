//! Where operator preferences are persisted

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location of the durable preference file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub path: PathBuf,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("guardian-settings.json"),
        }
    }
}
