//! Typed push events

use crate::api::{
    Alert, EmergencyNotice, HealthData, ReminderPush, SafetyData, SystemMessage, SystemStatusPush,
};
use serde_json::{json, Value};

/// Everything the push channel can deliver to the console.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// Namespace joined (initial connect or reconnect)
    Connected,
    /// Connection lost; the manager redials on its own
    Disconnected,
    SystemStatus(SystemStatusPush),
    HealthUpdate(HealthData),
    SafetyUpdate(SafetyData),
    Reminder(ReminderPush),
    Alert(Alert),
    /// Free-form system message (`update`)
    Update(SystemMessage),
    EmergencyAlert(EmergencyNotice),
}

impl PushEvent {
    /// Decode a named event payload.
    ///
    /// Returns `Ok(None)` for event names the console does not consume.
    pub fn from_named(name: &str, payload: Value) -> Result<Option<Self>, serde_json::Error> {
        let event = match name {
            "system_status" => PushEvent::SystemStatus(serde_json::from_value(payload)?),
            "health_update" => PushEvent::HealthUpdate(serde_json::from_value(payload)?),
            "safety_update" => PushEvent::SafetyUpdate(serde_json::from_value(payload)?),
            "reminder" => PushEvent::Reminder(serde_json::from_value(payload)?),
            "alert" => PushEvent::Alert(serde_json::from_value(payload)?),
            "update" => PushEvent::Update(serde_json::from_value(payload)?),
            "emergency_alert" => PushEvent::EmergencyAlert(serde_json::from_value(payload)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    /// Wire name of the event (lifecycle events use `connect`/`disconnect`).
    pub fn name(&self) -> &'static str {
        match self {
            PushEvent::Connected => "connect",
            PushEvent::Disconnected => "disconnect",
            PushEvent::SystemStatus(_) => "system_status",
            PushEvent::HealthUpdate(_) => "health_update",
            PushEvent::SafetyUpdate(_) => "safety_update",
            PushEvent::Reminder(_) => "reminder",
            PushEvent::Alert(_) => "alert",
            PushEvent::Update(_) => "update",
            PushEvent::EmergencyAlert(_) => "emergency_alert",
        }
    }
}

/// Commands the console sends to the backend over the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    AcknowledgeEmergency,
}

impl ControlCommand {
    pub fn event_name(&self) -> &'static str {
        "control_system"
    }

    pub fn payload(&self) -> Value {
        match self {
            ControlCommand::AcknowledgeEmergency => json!({"action": "acknowledge_emergency"}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_named_system_status() {
        let event = PushEvent::from_named(
            "system_status",
            json!({"running": true, "emergency_mode": true}),
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            event,
            PushEvent::SystemStatus(SystemStatusPush {
                running: true,
                emergency_mode: true,
            })
        );
        assert_eq!(event.name(), "system_status");
    }

    #[test]
    fn test_from_named_alert_with_domain_tag() {
        let event = PushEvent::from_named(
            "alert",
            json!({"alert_type": "safety", "message": "Door open", "severity": "high"}),
        )
        .unwrap()
        .unwrap();
        match event {
            PushEvent::Alert(alert) => {
                assert_eq!(alert.alert_type.as_deref(), Some("safety"));
                assert_eq!(alert.message.as_deref(), Some("Door open"));
            }
            other => panic!("Expected Alert, got {:?}", other),
        }
    }

    #[test]
    fn test_from_named_unknown_is_none() {
        assert!(PushEvent::from_named("medication_update", json!({}))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_from_named_bad_payload_is_error() {
        assert!(PushEvent::from_named("health_update", json!({"alerts": 3})).is_err());
    }

    #[test]
    fn test_from_named_null_payload_uses_defaults() {
        let event = PushEvent::from_named("update", json!({"message": "Agent started"}))
            .unwrap()
            .unwrap();
        assert!(matches!(event, PushEvent::Update(ref m) if m.message == "Agent started"));
    }

    #[test]
    fn test_acknowledge_emergency_command() {
        let cmd = ControlCommand::AcknowledgeEmergency;
        assert_eq!(cmd.event_name(), "control_system");
        assert_eq!(cmd.payload(), json!({"action": "acknowledge_emergency"}));
    }
}
