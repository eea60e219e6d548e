//! Wire types for the backend REST API and push payloads.
//!
//! The backend is loose about shapes: optional fields come and go, a few
//! metrics have two spellings, and the acknowledge endpoint answers in two
//! different forms. Everything here is lenient on input (`#[serde(default)]`
//! and presence checks) and normalizes at the boundary.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// `status` value that means the backend system is running.
pub const RUNNING_SENTINEL: &str = "System running";
/// `status` value returned by a successful start request.
pub const START_ACCEPTED: &str = "System started successfully";
/// `status` value returned by a successful stop request.
pub const STOP_ACCEPTED: &str = "System stopped successfully";

/// Deserialize a flag that is only set by a literal JSON `true`.
///
/// Missing, `null`, strings and numbers all read as `false`.
fn strict_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value == Value::Bool(true))
}

/// Optional text from any JSON type. Scalars are stringified, objects and
/// arrays become their JSON text, `null` is absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(value_text(&other)),
    })
}

/// Like [`lenient_text`] with `null` read as the empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// A list of texts, or a single text standing in for a one-item list.
fn lenient_texts<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Array(items) => Some(
            items
                .iter()
                .filter(|item| !item.is_null())
                .map(value_text)
                .collect(),
        ),
        other => Some(vec![value_text(&other)]),
    })
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn count_of(value: &Value) -> u64 {
    match number_of(value) {
        Some(n) if n.is_finite() && n > 0.0 => n as u64,
        _ => 0,
    }
}

/// Optional number, accepting numeric strings. Anything else is absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_of(&Value::deserialize(deserializer)?))
}

/// Number that reads as zero when missing or unparseable.
fn lenient_ratio<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or(0.0))
}

/// Non-negative count that reads as zero when missing or unparseable.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(count_of(&Value::deserialize(deserializer)?))
}

/// Counts keyed by name; a non-object reads as empty.
fn lenient_counts<'de, D>(deserializer: D) -> Result<BTreeMap<String, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), count_of(v))).collect(),
        _ => BTreeMap::new(),
    })
}

/// Records keyed by name; entries that do not decode are dropped.
fn lenient_records<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(k, v)| serde_json::from_value(v).ok().map(|record| (k, record)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

/// A list whose items decode one by one; items that do not decode are
/// dropped. The list itself must still be a list (or `null`, read as empty).
fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Optional form of [`lenient_items`].
fn lenient_optional_items<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(items.map(|items| {
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()
    }))
}

/// Optional nested object that reads as absent when it does not decode.
fn absent_on_error<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

// ============================================================================
// System
// ============================================================================

/// Response of `GET /api/system/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemStatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "strict_true")]
    pub emergency_mode: bool,
    #[serde(default)]
    pub connected_agents: Vec<String>,
}

impl SystemStatusResponse {
    /// Whether `status` equals the running sentinel.
    pub fn is_running(&self) -> bool {
        self.status == RUNNING_SENTINEL
    }
}

/// Payload of the `system_status` push event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatusPush {
    #[serde(default, deserialize_with = "strict_true")]
    pub running: bool,
    #[serde(default, deserialize_with = "strict_true")]
    pub emergency_mode: bool,
}

/// Raw response of `POST /api/system/start` and `POST /api/system/stop`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControlResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Which control endpoint was called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Stop,
}

impl ControlAction {
    pub fn path(self) -> &'static str {
        match self {
            ControlAction::Start => "/api/system/start",
            ControlAction::Stop => "/api/system/stop",
        }
    }

    fn accepted_status(self) -> &'static str {
        match self {
            ControlAction::Start => START_ACCEPTED,
            ControlAction::Stop => STOP_ACCEPTED,
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlAction::Start => write!(f, "start"),
            ControlAction::Stop => write!(f, "stop"),
        }
    }
}

/// Normalized result of a start/stop request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlOutcome {
    pub action: ControlAction,
    /// Backend confirmed the transition
    pub accepted: bool,
    /// Backend status string (empty when absent)
    pub status: String,
    /// Backend error string, when reported
    pub error: Option<String>,
}

impl ControlOutcome {
    pub fn from_response(action: ControlAction, response: ControlResponse) -> Self {
        let status = response.status.unwrap_or_default();
        let accepted = response.error.is_none() && status == action.accepted_status();
        Self {
            action,
            accepted,
            status,
            error: response.error,
        }
    }
}

// ============================================================================
// Readings
// ============================================================================

/// Latest-value snapshot for one domain, keyed by metric name.
///
/// Key order is the order the backend sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Readings(pub Map<String, Value>);

impl Readings {
    /// First present, non-null value among `aliases`.
    pub fn get(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    /// Numeric value of a metric, accepting numeric strings.
    pub fn number(&self, aliases: &[&str]) -> Option<f64> {
        self.get(aliases).and_then(number_of)
    }

    /// Display text of a metric.
    pub fn text(&self, aliases: &[&str]) -> Option<String> {
        self.get(aliases).map(value_text)
    }

    /// Boolean value of a metric (JS truthiness for non-bool values).
    pub fn flag(&self, aliases: &[&str]) -> Option<bool> {
        self.get(aliases).map(truthy)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// One-line summary: the first reading as `key: value`.
    pub fn summary(&self) -> String {
        match self.0.iter().next() {
            Some((key, value)) => format!("{}: {}", key, value_text(value)),
            None => "No readings".to_string(),
        }
    }
}

/// Render a JSON scalar the way a template literal would.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Alerts
// ============================================================================

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Alert as reported by the backend, in snapshots and `alert` pushes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    /// Backend alert kind (e.g. `health_alert`)
    #[serde(
        rename = "type",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    /// Domain tag added to pushes (`health`, `safety`, `reminder`) or a
    /// safety sub-type (`fall`, `door`, ...)
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub alert_type: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient_texts", skip_serializing_if = "Option::is_none")]
    pub alert_messages: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Value>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Value>,
}

impl Alert {
    /// Effective severity: falls are always high, unknown or missing is medium.
    pub fn severity(&self) -> Severity {
        if self.alert_type.as_deref() == Some("fall") {
            return Severity::High;
        }
        self.severity
            .as_deref()
            .and_then(Severity::parse)
            .unwrap_or(Severity::Medium)
    }

    /// Body text: joined `alert_messages` if present, else `message`.
    pub fn body(&self) -> String {
        match &self.alert_messages {
            Some(messages) if !messages.is_empty() => messages.join("\n"),
            _ => self
                .message
                .clone()
                .unwrap_or_else(|| "Unknown alert".to_string()),
        }
    }
}

// ============================================================================
// Health
// ============================================================================

/// Per-metric analysis row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricStat {
    #[serde(deserialize_with = "lenient_count")]
    pub total_readings: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub threshold_exceeded: u64,
    #[serde(deserialize_with = "lenient_ratio")]
    pub percentage: f64,
}

/// Optional aggregate analysis attached to the health snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthAnalysis {
    #[serde(deserialize_with = "lenient_count")]
    pub total_readings: u64,
    /// Alert counts by metric plus a `total` entry
    #[serde(deserialize_with = "lenient_counts")]
    pub alert_counts: BTreeMap<String, u64>,
    #[serde(deserialize_with = "lenient_ratio")]
    pub alert_percentage: f64,
    #[serde(deserialize_with = "lenient_count")]
    pub notified_count: u64,
    #[serde(deserialize_with = "lenient_records")]
    pub metric_stats: BTreeMap<String, MetricStat>,
}

/// Response of `GET /api/health/data` and payload of `health_update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthData {
    pub latest_readings: Option<Readings>,
    #[serde(deserialize_with = "lenient_items")]
    pub alerts: Vec<Alert>,
    #[serde(deserialize_with = "absent_on_error", skip_serializing_if = "Option::is_none")]
    pub analysis: Option<HealthAnalysis>,
}

// ============================================================================
// Safety
// ============================================================================

/// One room-occupancy record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationEntry {
    #[serde(deserialize_with = "lenient_string")]
    pub location: String,
    /// Hours spent; missing counts as one hour
    #[serde(deserialize_with = "lenient_number")]
    pub duration: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub timestamp: String,
}

/// Response of `GET /api/safety/data` and payload of `safety_update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyData {
    pub latest_readings: Option<Readings>,
    #[serde(deserialize_with = "lenient_items")]
    pub alerts: Vec<Alert>,
    #[serde(
        deserialize_with = "lenient_optional_items",
        skip_serializing_if = "Option::is_none"
    )]
    pub location_data: Option<Vec<LocationEntry>>,
}

// ============================================================================
// Reminders
// ============================================================================

/// A reminder as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reminder {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(deserialize_with = "lenient_text")]
    pub scheduled_time: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sent_at: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub priority: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub completed_at: Option<String>,
}

impl Reminder {
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("General")
    }

    /// `sent_at` when present, else `scheduled_time`.
    pub fn time(&self) -> Option<&str> {
        self.sent_at.as_deref().or(self.scheduled_time.as_deref())
    }

    /// Priority with unknown or missing mapped to medium.
    pub fn priority(&self) -> Severity {
        self.priority
            .as_deref()
            .and_then(Severity::parse)
            .unwrap_or(Severity::Medium)
    }
}

/// Response of `GET /api/reminders`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemindersData {
    #[serde(deserialize_with = "lenient_items")]
    pub active_reminders: Vec<Reminder>,
    #[serde(deserialize_with = "lenient_items")]
    pub completed_reminders: Vec<Reminder>,
}

/// Payload of the `reminder` push event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderPush {
    pub id: Option<String>,
    pub reminder_type: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
}

impl ReminderPush {
    pub fn kind(&self) -> &str {
        self.reminder_type
            .as_deref()
            .or(self.kind.as_deref())
            .unwrap_or("General")
    }
}

/// Body of `POST /api/acknowledge-reminder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcknowledgeRequest {
    pub reminder_id: String,
}

/// Raw acknowledge response, covering both shapes the backend uses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AcknowledgeResponse {
    pub success: Option<bool>,
    pub status: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Normalized acknowledge result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckOutcome {
    Acknowledged,
    Rejected(String),
}

impl From<AcknowledgeResponse> for AckOutcome {
    fn from(response: AcknowledgeResponse) -> Self {
        if let Some(error) = response.error {
            return AckOutcome::Rejected(error);
        }
        let ok = match (response.success, response.status.as_deref()) {
            (Some(success), _) => success,
            (None, Some(status)) => status.eq_ignore_ascii_case("success"),
            (None, None) => false,
        };
        if ok {
            AckOutcome::Acknowledged
        } else {
            AckOutcome::Rejected(
                response
                    .message
                    .or(response.status)
                    .unwrap_or_else(|| "Unknown error".to_string()),
            )
        }
    }
}

// ============================================================================
// Misc pushes
// ============================================================================

/// Payload of the backend `update` event (free-form system message).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemMessage {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: String,
    pub timestamp: Option<String>,
}

/// Payload of the `emergency_alert` event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmergencyNotice {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_running_sentinel() {
        let status: SystemStatusResponse =
            serde_json::from_value(json!({"status": "System running", "emergency_mode": false}))
                .unwrap();
        assert!(status.is_running());
        assert!(!status.emergency_mode);

        let status: SystemStatusResponse =
            serde_json::from_value(json!({"status": "System not running"})).unwrap();
        assert!(!status.is_running());
    }

    #[test]
    fn test_emergency_mode_requires_literal_true() {
        for raw in [json!("true"), json!(1), json!(null)] {
            let status: SystemStatusResponse =
                serde_json::from_value(json!({"status": "System running", "emergency_mode": raw}))
                    .unwrap();
            assert!(!status.emergency_mode);
        }
        let status: SystemStatusResponse =
            serde_json::from_value(json!({"emergency_mode": true})).unwrap();
        assert!(status.emergency_mode);
    }

    #[test]
    fn test_status_push_flags_require_literal_true() {
        let push: SystemStatusPush =
            serde_json::from_value(json!({"running": "yes", "emergency_mode": 1})).unwrap();
        assert!(!push.running);
        assert!(!push.emergency_mode);

        let push: SystemStatusPush =
            serde_json::from_value(json!({"running": true, "emergency_mode": false})).unwrap();
        assert!(push.running);
        assert!(!push.emergency_mode);
    }

    #[test]
    fn test_control_outcome_accepted() {
        let outcome = ControlOutcome::from_response(
            ControlAction::Start,
            ControlResponse {
                status: Some(START_ACCEPTED.to_string()),
                error: None,
            },
        );
        assert!(outcome.accepted);
    }

    #[test]
    fn test_control_outcome_already_running_not_accepted() {
        let outcome = ControlOutcome::from_response(
            ControlAction::Start,
            ControlResponse {
                status: Some("System already running".to_string()),
                error: None,
            },
        );
        assert!(!outcome.accepted);
        assert_eq!(outcome.status, "System already running");
    }

    #[test]
    fn test_control_outcome_error_wins() {
        let outcome = ControlOutcome::from_response(
            ControlAction::Stop,
            ControlResponse {
                status: Some(STOP_ACCEPTED.to_string()),
                error: Some("boom".to_string()),
            },
        );
        assert!(!outcome.accepted);
        assert_eq!(outcome.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_readings_aliases_and_nulls() {
        let readings: Readings =
            serde_json::from_value(json!({"heartrate": 72, "oxygen_saturation": null, "oxygen_level": 97}))
                .unwrap();
        assert_eq!(readings.number(&["heart_rate", "heartrate"]), Some(72.0));
        assert_eq!(
            readings.number(&["oxygen_saturation", "oxygen_level"]),
            Some(97.0)
        );
        assert!(readings.get(&["glucose", "blood_glucose"]).is_none());
    }

    #[test]
    fn test_readings_summary_uses_first_key_in_wire_order() {
        let readings: Readings =
            serde_json::from_str(r#"{"temperature": 36.8, "heartrate": 70}"#).unwrap();
        assert_eq!(readings.summary(), "temperature: 36.8");
        assert_eq!(Readings::default().summary(), "No readings");
    }

    #[test]
    fn test_readings_flag_truthiness() {
        let readings: Readings =
            serde_json::from_value(json!({"fall_detected": 0, "door": "Open"})).unwrap();
        assert_eq!(readings.flag(&["fall_detected"]), Some(false));
        assert_eq!(readings.flag(&["door"]), Some(true));
    }

    #[test]
    fn test_alert_severity_rules() {
        let fall = Alert {
            alert_type: Some("fall".to_string()),
            severity: Some("low".to_string()),
            ..Default::default()
        };
        assert_eq!(fall.severity(), Severity::High);

        let unknown = Alert {
            severity: Some("critical".to_string()),
            ..Default::default()
        };
        assert_eq!(unknown.severity(), Severity::Medium);
        assert_eq!(Alert::default().severity(), Severity::Medium);
    }

    #[test]
    fn test_alert_type_and_alert_type_coexist() {
        let alert: Alert = serde_json::from_value(json!({
            "type": "health_alert",
            "alert_type": "health",
            "metric": "heartrate",
            "value": 130,
            "message": "Heart rate threshold exceeded: 130 BPM",
            "severity": "medium"
        }))
        .unwrap();
        assert_eq!(alert.kind.as_deref(), Some("health_alert"));
        assert_eq!(alert.alert_type.as_deref(), Some("health"));
        assert_eq!(alert.body(), "Heart rate threshold exceeded: 130 BPM");
    }

    #[test]
    fn test_alert_body_prefers_messages() {
        let alert = Alert {
            message: Some("ignored".to_string()),
            alert_messages: Some(vec!["a".to_string(), "b".to_string()]),
            ..Default::default()
        };
        assert_eq!(alert.body(), "a\nb");
        assert_eq!(Alert::default().body(), "Unknown alert");
    }

    #[test]
    fn test_ack_outcome_success_shape() {
        let ok: AcknowledgeResponse = serde_json::from_value(json!({"success": true})).unwrap();
        assert_eq!(AckOutcome::from(ok), AckOutcome::Acknowledged);

        let no: AcknowledgeResponse =
            serde_json::from_value(json!({"success": false, "message": "nope"})).unwrap();
        assert_eq!(AckOutcome::from(no), AckOutcome::Rejected("nope".to_string()));
    }

    #[test]
    fn test_ack_outcome_status_shape() {
        let ok: AcknowledgeResponse =
            serde_json::from_value(json!({"status": "success", "message": "Reminder r42 acknowledged."}))
                .unwrap();
        assert_eq!(AckOutcome::from(ok), AckOutcome::Acknowledged);

        let missing: AcknowledgeResponse = serde_json::from_value(json!({
            "status": "error",
            "message": "Reminder r42 not found in active reminders."
        }))
        .unwrap();
        assert_eq!(
            AckOutcome::from(missing),
            AckOutcome::Rejected("Reminder r42 not found in active reminders.".to_string())
        );
    }

    #[test]
    fn test_ack_outcome_error_shape() {
        let err: AcknowledgeResponse =
            serde_json::from_value(json!({"error": "System not running"})).unwrap();
        assert_eq!(
            AckOutcome::from(err),
            AckOutcome::Rejected("System not running".to_string())
        );
    }

    #[test]
    fn test_reminder_time_and_priority() {
        let reminder: Reminder = serde_json::from_value(json!({
            "id": "r1",
            "type": "Medication",
            "message": "Take Lisinopril",
            "scheduled_time": "08:00",
            "priority": "HIGH"
        }))
        .unwrap();
        assert_eq!(reminder.time(), Some("08:00"));
        assert_eq!(reminder.priority(), Severity::High);
        assert_eq!(reminder.kind(), "Medication");
        assert_eq!(Reminder::default().kind(), "General");
    }

    #[test]
    fn test_reminder_push_kind_fallbacks() {
        let push: ReminderPush =
            serde_json::from_value(json!({"type": "Hydration", "message": "Drink water"})).unwrap();
        assert_eq!(push.kind(), "Hydration");
        assert_eq!(ReminderPush::default().kind(), "General");
    }

    #[test]
    fn test_health_data_with_analysis() {
        let data: HealthData = serde_json::from_value(json!({
            "latest_readings": {"heartrate": 80},
            "alerts": [],
            "analysis": {
                "total_readings": 200,
                "alert_counts": {"heartrate": 3, "total": 5},
                "alert_percentage": 2.5,
                "notified_count": 1,
                "metric_stats": {
                    "heartrate": {"total_readings": 200, "threshold_exceeded": 3, "percentage": 1.5}
                }
            }
        }))
        .unwrap();
        let analysis = data.analysis.unwrap();
        assert_eq!(analysis.alert_counts.get("total"), Some(&5));
        assert_eq!(analysis.metric_stats["heartrate"].threshold_exceeded, 3);
    }
}
