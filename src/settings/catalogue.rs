//! Every preference key with its default and category.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    System,
    Notifications,
    HealthThresholds,
    Safety,
    Reminders,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::System,
        Category::Notifications,
        Category::HealthThresholds,
        Category::Safety,
        Category::Reminders,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::System => "system",
            Category::Notifications => "notifications",
            Category::HealthThresholds => "health",
            Category::Safety => "safety",
            Category::Reminders => "reminders",
        }
    }

    /// Confirmation shown after saving this category.
    pub fn saved_message(self) -> &'static str {
        match self {
            Category::System => "System settings saved successfully",
            Category::Notifications => "Notification settings saved successfully",
            Category::HealthThresholds => "Health thresholds saved successfully",
            Category::Safety => "Safety settings saved successfully",
            Category::Reminders => "Reminder settings saved successfully",
        }
    }

    pub fn keys(self) -> impl Iterator<Item = &'static SettingDef> {
        CATALOGUE.iter().filter(move |def| def.category == self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(Category::System),
            "notifications" => Ok(Category::Notifications),
            "health" | "health_thresholds" | "thresholds" => Ok(Category::HealthThresholds),
            "safety" => Ok(Category::Safety),
            "reminders" => Ok(Category::Reminders),
            other => Err(format!("unknown settings category '{}'", other)),
        }
    }
}

/// How a stored string is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    Text,
    Number,
    /// Enabled unless the stored value is exactly `"false"`
    FlagDefaultOn,
    /// Enabled only when the stored value is exactly `"true"`
    FlagDefaultOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub category: Category,
    pub kind: SettingKind,
}

const fn def(
    key: &'static str,
    default: &'static str,
    category: Category,
    kind: SettingKind,
) -> SettingDef {
    SettingDef {
        key,
        default,
        category,
        kind,
    }
}

use Category::*;
use SettingKind::*;

pub const CATALOGUE: &[SettingDef] = &[
    // System
    def("dataRefreshInterval", "60", System, Number),
    def("enableSystemSwitch", "true", System, FlagDefaultOn),
    def("systemLanguage", "en", System, Text),
    def("voiceType", "female", System, Text),
    def("voiceVolume", "75", System, Number),
    def("emergencyContact", "", System, Text),
    def("caregiverContact", "", System, Text),
    // Notifications
    def("enableNotifications", "true", Notifications, FlagDefaultOn),
    def("enableVoiceNotifications", "true", Notifications, FlagDefaultOn),
    def("enableTextNotifications", "true", Notifications, FlagDefaultOn),
    def("enableEmailNotifications", "false", Notifications, FlagDefaultOff),
    def("healthNotificationPriority", "high", Notifications, Text),
    def("safetyNotificationPriority", "high", Notifications, Text),
    def("reminderNotificationPriority", "medium", Notifications, Text),
    def("quietHoursStart", "22:00", Notifications, Text),
    def("quietHoursEnd", "07:00", Notifications, Text),
    // Health thresholds
    def("enableHealthMonitoring", "true", HealthThresholds, FlagDefaultOn),
    def("heartRateMin", "60", HealthThresholds, Number),
    def("heartRateMax", "100", HealthThresholds, Number),
    def("systolicMin", "90", HealthThresholds, Number),
    def("diastolicMin", "60", HealthThresholds, Number),
    def("systolicMax", "140", HealthThresholds, Number),
    def("diastolicMax", "90", HealthThresholds, Number),
    def("temperatureMin", "36.0", HealthThresholds, Number),
    def("temperatureMax", "37.5", HealthThresholds, Number),
    def("glucoseMin", "70", HealthThresholds, Number),
    def("glucoseMax", "180", HealthThresholds, Number),
    def("oxygenMin", "95", HealthThresholds, Number),
    // Safety
    def("enableSafetyMonitoring", "true", Safety, FlagDefaultOn),
    def("enableFallDetection", "true", Safety, FlagDefaultOn),
    def("enableLocationTracking", "true", Safety, FlagDefaultOn),
    def("enableDoorMonitoring", "true", Safety, FlagDefaultOn),
    def("inactivityThreshold", "4", Safety, Number),
    // Reminders
    def("enableReminders", "true", Reminders, FlagDefaultOn),
    def("reminderLeadTime", "15", Reminders, Number),
    def("reminderRepeatInterval", "5", Reminders, Number),
    def("reminderMaxRepeats", "3", Reminders, Number),
    def("notifyCaregiverAfterMaxRepeats", "true", Reminders, FlagDefaultOn),
];

pub fn lookup(key: &str) -> Option<&'static SettingDef> {
    CATALOGUE.iter().find(|def| def.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_size_and_unique_keys() {
        assert_eq!(CATALOGUE.len(), 38);
        let keys: HashSet<&str> = CATALOGUE.iter().map(|d| d.key).collect();
        assert_eq!(keys.len(), CATALOGUE.len());
    }

    #[test]
    fn test_every_category_has_keys() {
        for category in Category::ALL {
            assert!(category.keys().count() > 0, "{} has no keys", category);
        }
        assert_eq!(Category::HealthThresholds.keys().count(), 12);
    }

    #[test]
    fn test_lookup() {
        let def = lookup("heartRateMin").unwrap();
        assert_eq!(def.default, "60");
        assert_eq!(def.category, Category::HealthThresholds);
        assert!(lookup("heartRate").is_none());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Health".parse::<Category>().unwrap(), Category::HealthThresholds);
        assert_eq!("reminders".parse::<Category>().unwrap(), Category::Reminders);
        assert!("ui".parse::<Category>().is_err());
    }
}
