//! # Settings Store
//!
//! User preferences as flat string pairs in a durable [`KeyValueStore`].
//! Every key in [`CATALOGUE`] has a default that is substituted when the key
//! is absent (or stored empty). Values are written verbatim: nothing is
//! range-checked, so a minimum above its maximum is accepted.

mod catalogue;
mod store;

pub use catalogue::{lookup, Category, SettingDef, SettingKind, CATALOGUE};
pub use store::{FileStore, KeyValueStore, MemoryStore};

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Confirmation for a full save.
pub const ALL_SAVED: &str = "All settings saved successfully";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("unknown setting '{0}'")]
    UnknownKey(String),

    #[error("setting '{key}' does not belong to category '{category}'")]
    WrongCategory { key: String, category: Category },
}

/// One resolved preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingValue {
    pub key: &'static str,
    pub value: String,
    pub category: Category,
    pub is_default: bool,
}

/// Threshold object the health form would send to the backend.
///
/// Integers parse like `parseInt` (leading digits), temperatures like
/// `parseFloat`; an unparseable value is `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdPayload {
    pub heartrate_min: Option<i64>,
    pub heartrate_max: Option<i64>,
    pub blood_pressure_systolic_min: Option<i64>,
    pub blood_pressure_diastolic_min: Option<i64>,
    pub blood_pressure_systolic_max: Option<i64>,
    pub blood_pressure_diastolic_max: Option<i64>,
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
    pub blood_glucose_min: Option<i64>,
    pub blood_glucose_max: Option<i64>,
    pub oxygen_level_min: Option<i64>,
}

/// Settings over a store.
pub struct Settings<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Settings<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Value of a key, with the default substituted.
    pub fn get(&self, key: &str) -> Result<SettingValue, SettingsError> {
        let def = lookup(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        Ok(self.resolve(def))
    }

    fn resolve(&self, def: &'static SettingDef) -> SettingValue {
        match self.store.get(def.key).filter(|v| !v.is_empty()) {
            Some(value) => SettingValue {
                key: def.key,
                value,
                category: def.category,
                is_default: false,
            },
            None => SettingValue {
                key: def.key,
                value: def.default.to_string(),
                category: def.category,
                is_default: true,
            },
        }
    }

    /// Whether a flag key reads as enabled.
    pub fn flag(&self, key: &str) -> Result<bool, SettingsError> {
        let def = lookup(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        let stored = self.store.get(def.key);
        Ok(match def.kind {
            SettingKind::FlagDefaultOff => stored.as_deref() == Some("true"),
            _ => stored.as_deref() != Some("false"),
        })
    }

    /// Every catalogue key, defaults substituted.
    pub fn load(&self) -> Vec<SettingValue> {
        CATALOGUE.iter().map(|def| self.resolve(def)).collect()
    }

    /// Persist a category's values verbatim and return its confirmation.
    pub fn save_category(
        &mut self,
        category: Category,
        values: &[(&str, &str)],
    ) -> Result<&'static str, SettingsError> {
        for (key, _) in values {
            let def = lookup(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
            if def.category != category {
                return Err(SettingsError::WrongCategory {
                    key: key.to_string(),
                    category,
                });
            }
        }

        self.store.set_many(values)?;
        tracing::info!(category = %category, keys = values.len(), "Settings saved");

        if category == Category::HealthThresholds {
            let payload = self.threshold_payload();
            // No backend endpoint takes this yet
            tracing::info!(
                payload = %serde_json::to_string(&payload).unwrap_or_default(),
                "Health thresholds updated"
            );
        }

        Ok(category.saved_message())
    }

    /// Persist values across categories and return one confirmation.
    pub fn save_all(&mut self, values: &[(&str, &str)]) -> Result<&'static str, SettingsError> {
        if let Some((key, _)) = values.iter().find(|(key, _)| lookup(key).is_none()) {
            return Err(SettingsError::UnknownKey(key.to_string()));
        }

        for category in Category::ALL {
            let group: Vec<(&str, &str)> = values
                .iter()
                .copied()
                .filter(|(key, _)| lookup(key).is_some_and(|def| def.category == category))
                .collect();
            if !group.is_empty() {
                self.save_category(category, &group)?;
            }
        }

        Ok(ALL_SAVED)
    }

    /// Remove every stored key so all settings read as defaults.
    pub fn reset(&mut self) -> Result<usize, SettingsError> {
        let keys = self.store.keys();
        for key in &keys {
            self.store.remove(key)?;
        }
        tracing::info!(removed = keys.len(), "Settings reset to defaults");
        Ok(keys.len())
    }

    pub fn threshold_payload(&self) -> ThresholdPayload {
        let int = |key: &str| parse_int(&self.resolve_key(key));
        let float = |key: &str| parse_float(&self.resolve_key(key));

        ThresholdPayload {
            heartrate_min: int("heartRateMin"),
            heartrate_max: int("heartRateMax"),
            blood_pressure_systolic_min: int("systolicMin"),
            blood_pressure_diastolic_min: int("diastolicMin"),
            blood_pressure_systolic_max: int("systolicMax"),
            blood_pressure_diastolic_max: int("diastolicMax"),
            temperature_min: float("temperatureMin"),
            temperature_max: float("temperatureMax"),
            blood_glucose_min: int("glucoseMin"),
            blood_glucose_max: int("glucoseMax"),
            oxygen_level_min: int("oxygenMin"),
        }
    }

    fn resolve_key(&self, key: &str) -> String {
        lookup(key)
            .map(|def| self.resolve(def).value)
            .unwrap_or_default()
    }
}

impl Settings<FileStore> {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        Ok(Self::new(FileStore::open(path.into())?))
    }
}

/// Leading `[+-]digits[.digits]` run after whitespace.
fn numeric_prefix(s: &str, allow_fraction: bool) -> &str {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if allow_fraction && !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    &s[..end]
}

/// `parseInt(s, 10)`: leading integer, `None` when there is none.
pub fn parse_int(s: &str) -> Option<i64> {
    numeric_prefix(s, false).parse().ok()
}

/// `parseFloat(s)`: leading decimal, `None` when there is none.
pub fn parse_float(s: &str) -> Option<f64> {
    let prefix = numeric_prefix(s, true);
    let prefix = prefix.strip_suffix('.').unwrap_or(prefix);
    prefix.parse().ok()
}
