//! Reminders panel view model.

use crate::api::{Reminder, ReminderPush, RemindersData, Severity};
use crate::feed::AlertEntry;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderRow {
    pub id: String,
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub priority: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<&Reminder> for ReminderRow {
    fn from(reminder: &Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            kind: reminder.kind().to_string(),
            message: reminder.message.clone(),
            time: reminder.time().map(str::to_string),
            priority: reminder.priority(),
            completed_at: reminder.completed_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemindersView {
    pub active: Vec<ReminderRow>,
    pub completed: Vec<ReminderRow>,
}

impl RemindersView {
    pub fn from_data(data: &RemindersData) -> Self {
        Self {
            active: data.active_reminders.iter().map(ReminderRow::from).collect(),
            completed: data
                .completed_reminders
                .iter()
                .map(ReminderRow::from)
                .collect(),
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Activity log line for a loaded snapshot.
    pub fn summary(&self) -> String {
        match self.active.len() {
            0 => "No active reminders".to_string(),
            1 => "1 active reminder".to_string(),
            n => format!("{} active reminders", n),
        }
    }
}

/// Alert feed echo of a pushed reminder. Returns the reminder id (from the
/// payload or freshly generated) with the entry.
pub fn reminder_alert(push: &ReminderPush) -> (String, AlertEntry) {
    let id = push
        .id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let message = push.message.clone().unwrap_or_default();

    let entry = AlertEntry {
        kind: "reminder".to_string(),
        severity: Severity::Medium,
        title: "Reminder".to_string(),
        message: format!("{}: {}", push.kind(), message),
        details: None,
        location: None,
        timestamp: push.timestamp.clone(),
    };
    (id, entry)
}
