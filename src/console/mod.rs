//! # Console state
//!
//! [`Console`] is the one application-state object of a monitoring session.
//! It owns the status synchronizer, the three domain panels, the vitals
//! trend, the safety timeline, every alert/activity feed and the notice
//! board. There is no ambient state: everything a render needs is reachable
//! from the console.
//!
//! Push events go through [`Console::apply`], a synchronous dispatcher that
//! reconciles the event into state and returns the follow-up fetches it
//! wants (a status poll after connect, a reminders re-fetch after a pushed
//! reminder). [`Console::handle`] runs those follow-ups. REST responses and
//! push events for the same domain are not sequenced: whichever lands last
//! wins.

pub mod runtime;

use crate::api::{AckOutcome, Alert, ApiClient, ApiError, ControlAction, ControlOutcome};
use crate::channel::PushEvent;
use crate::config::RefreshConfig;
use crate::feed::{
    ActivityEntry, ActivityLevel, AlertEntry, BoundedFeed, NoticeBoard, NoticeKind,
};
use crate::panels::safety::{Timeline, TimelineEvent};
use crate::panels::{
    health, reminders, HealthView, LoadTracker, Overview, PanelKind, PanelState, RemindersView,
    SafetyView, TrendBuffer,
};
use crate::status::StatusSynchronizer;
use chrono::Local;
use std::time::{Duration, Instant};

/// Alert types that belong on the safety list.
const SAFETY_ALERT_TYPES: &[&str] = &[
    "safety",
    "fall",
    "door",
    "inactivity",
    "movement",
    "location",
    "wandering",
];

/// Work a push event asks for after it has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    RefreshStatus,
    RefreshReminders,
}

pub struct Console {
    api: ApiClient,
    status: StatusSynchronizer,
    connected: bool,

    health: PanelState<HealthView>,
    safety: PanelState<SafetyView>,
    reminders: PanelState<RemindersView>,
    tracker: LoadTracker,
    overview: Option<Overview>,

    trend: TrendBuffer,
    timeline: Timeline,

    alerts: BoundedFeed<AlertEntry>,
    health_alerts: BoundedFeed<AlertEntry>,
    safety_alerts: BoundedFeed<AlertEntry>,
    activity: BoundedFeed<ActivityEntry>,
    notices: NoticeBoard,
}

impl Console {
    pub fn new(api: ApiClient, refresh: &RefreshConfig) -> Self {
        let capacity = refresh.feed_capacity;
        let emphasis = Duration::from_secs(refresh.emphasis_seconds);

        Self {
            api,
            status: StatusSynchronizer::new(),
            connected: false,
            health: PanelState::Loading,
            safety: PanelState::Loading,
            reminders: PanelState::Loading,
            tracker: LoadTracker::new(),
            overview: None,
            trend: TrendBuffer::new(refresh.trend_capacity),
            timeline: Timeline::default(),
            alerts: BoundedFeed::new(capacity, "No alerts to display", emphasis),
            health_alerts: BoundedFeed::new(capacity, "No health alerts to display", emphasis),
            safety_alerts: BoundedFeed::new(capacity, "No safety alerts to display", emphasis),
            activity: BoundedFeed::new(capacity, "No activities to display", emphasis),
            notices: NoticeBoard::new(
                Duration::from_secs(refresh.notice_dismiss_seconds),
                Duration::from_secs(refresh.confirmation_seconds),
            ),
        }
    }

    // ------------------------------------------------------------------
    // Push events
    // ------------------------------------------------------------------

    /// Reconcile one push event into state.
    pub fn apply(&mut self, event: PushEvent, now: Instant) -> Vec<FollowUp> {
        tracing::debug!(event = event.name(), "Applying push event");

        match event {
            PushEvent::Connected => {
                self.connected = true;
                self.log("Connected to server", ActivityLevel::Info, now);
                return vec![FollowUp::RefreshStatus];
            }
            PushEvent::Disconnected => {
                self.connected = false;
                self.log("Disconnected from server", ActivityLevel::Warning, now);
                self.status.on_disconnect();
                self.refresh_overview();
            }
            PushEvent::SystemStatus(payload) => {
                self.status.on_push_status(payload);
                self.refresh_overview();
            }
            PushEvent::HealthUpdate(data) => {
                let view = self.render_health(&data, now);
                self.log(
                    format!("Health update received: {}", view),
                    ActivityLevel::Info,
                    now,
                );
            }
            PushEvent::SafetyUpdate(data) => {
                let view = self.render_safety(&data, now);
                self.log(
                    format!("Safety update received: {}", view),
                    ActivityLevel::Info,
                    now,
                );
            }
            PushEvent::Reminder(push) => {
                let (id, entry) = reminders::reminder_alert(&push);
                tracing::info!(reminder_id = %id, kind = push.kind(), "Reminder pushed");
                self.alerts.push(entry, false, now);
                self.log(
                    format!("Reminder: {}", push.message.as_deref().unwrap_or_default()),
                    ActivityLevel::Info,
                    now,
                );
                return vec![FollowUp::RefreshReminders];
            }
            PushEvent::Alert(alert) => self.route_alert(&alert, now),
            PushEvent::Update(message) => {
                self.log(message.message, ActivityLevel::Info, now);
            }
            PushEvent::EmergencyAlert(notice) => {
                tracing::warn!(message = %notice.message, "Emergency alert");
                self.notices.post(NoticeKind::Emergency, notice.message, now);
            }
        }

        Vec::new()
    }

    /// Apply an event and run its follow-ups.
    pub async fn handle(&mut self, event: PushEvent, now: Instant) {
        for follow_up in self.apply(event, now) {
            match follow_up {
                FollowUp::RefreshStatus => {
                    self.refresh_status().await;
                }
                FollowUp::RefreshReminders => self.refresh_panel(PanelKind::Reminders).await,
            }
        }
    }

    fn route_alert(&mut self, alert: &Alert, now: Instant) {
        let entry = AlertEntry::from_alert(alert, "system");
        let emphasized = entry.is_high();

        match entry.kind.as_str() {
            "health" => self.health_alerts.push(entry.clone(), emphasized, now),
            kind if SAFETY_ALERT_TYPES.contains(&kind) => {
                self.safety_alerts.push(entry.clone(), emphasized, now)
            }
            _ => {}
        }

        tracing::info!(
            kind = %entry.kind,
            severity = entry.severity.as_str(),
            "Alert received"
        );
        self.alerts.push(entry, emphasized, now);
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Render a health snapshot. Returns the activity summary.
    fn render_health(&mut self, data: &crate::api::HealthData, now: Instant) -> String {
        let view = HealthView::from_data(data);
        let summary = view.summary.clone();

        self.trend.push(
            Local::now().format("%H:%M:%S").to_string(),
            health::trend_point(data.latest_readings.as_ref()),
        );

        if !data.alerts.is_empty() {
            self.health_alerts.clear();
            for alert in &data.alerts {
                let entry = AlertEntry::from_alert(alert, "health");
                let emphasized = entry.is_high();
                self.health_alerts.push(entry, emphasized, now);
            }
        }

        self.health = PanelState::loaded(view);
        self.settle(PanelKind::Health);
        summary
    }

    /// Render a safety snapshot. Returns the activity summary.
    fn render_safety(&mut self, data: &crate::api::SafetyData, now: Instant) -> String {
        let view = SafetyView::from_data(data, Local::now());
        let summary = view.summary.clone();

        if let Some(event) = data
            .latest_readings
            .as_ref()
            .and_then(TimelineEvent::from_readings)
        {
            self.timeline.record(event);
        }

        if !data.alerts.is_empty() {
            self.safety_alerts.clear();
            for alert in &data.alerts {
                let entry = AlertEntry::from_alert(alert, "safety");
                let emphasized = entry.is_high();
                self.safety_alerts.push(entry, emphasized, now);
            }
        }

        self.safety = PanelState::loaded(view);
        self.settle(PanelKind::Safety);
        summary
    }

    fn render_reminders(&mut self, data: &crate::api::RemindersData) {
        self.reminders = PanelState::loaded(RemindersView::from_data(data));
        self.settle(PanelKind::Reminders);
    }

    fn fail(&mut self, kind: PanelKind, error: &ApiError) {
        tracing::warn!(panel = %kind, error = %error, "Panel fetch failed");
        match kind {
            PanelKind::Health => self.health = PanelState::failed(kind, error),
            PanelKind::Safety => self.safety = PanelState::failed(kind, error),
            PanelKind::Reminders => self.reminders = PanelState::failed(kind, error),
        }
        self.settle(kind);
    }

    fn settle(&mut self, kind: PanelKind) {
        let round_complete = self.tracker.settle(kind);
        if round_complete {
            tracing::debug!("All panels settled");
        }
        if round_complete || self.tracker.is_complete() {
            self.refresh_overview();
        }
    }

    fn refresh_overview(&mut self) {
        if !self.tracker.is_complete() {
            return;
        }
        self.overview = Some(Overview::compute(
            self.health.view().map_or(0, HealthView::metric_count),
            self.safety.view().map_or(0, SafetyView::check_count),
            self.reminders.view().map_or(0, RemindersView::active_count),
            self.status.snapshot(),
        ));
    }

    fn log(&mut self, message: impl Into<String>, level: ActivityLevel, now: Instant) {
        self.activity
            .push(ActivityEntry::new(message, level), false, now);
    }

    // ------------------------------------------------------------------
    // REST
    // ------------------------------------------------------------------

    pub async fn refresh_status(&mut self) -> crate::status::SystemState {
        let state = self.status.refresh_from_server(&self.api).await;
        self.refresh_overview();
        state
    }

    /// Fetch all three panels concurrently and start a new load round.
    pub async fn refresh_all(&mut self, show_loading: bool) {
        self.tracker.reset();
        if show_loading {
            self.health = PanelState::Loading;
            self.safety = PanelState::Loading;
            self.reminders = PanelState::Loading;
        }

        let api = self.api.clone();
        let (health, safety, reminders) =
            futures::join!(api.health_data(), api.safety_data(), api.reminders());
        let now = Instant::now();

        match health {
            Ok(data) => {
                self.render_health(&data, now);
            }
            Err(e) => self.fail(PanelKind::Health, &e),
        }
        match safety {
            Ok(data) => {
                self.render_safety(&data, now);
            }
            Err(e) => self.fail(PanelKind::Safety, &e),
        }
        match reminders {
            Ok(data) => self.render_reminders(&data),
            Err(e) => self.fail(PanelKind::Reminders, &e),
        }
    }

    /// Re-fetch one panel (manual retry, or a reminders re-fetch).
    pub async fn refresh_panel(&mut self, kind: PanelKind) {
        let now = Instant::now();
        match kind {
            PanelKind::Health => match self.api.health_data().await {
                Ok(data) => {
                    self.render_health(&data, now);
                }
                Err(e) => self.fail(kind, &e),
            },
            PanelKind::Safety => match self.api.safety_data().await {
                Ok(data) => {
                    self.render_safety(&data, now);
                }
                Err(e) => self.fail(kind, &e),
            },
            PanelKind::Reminders => match self.api.reminders().await {
                Ok(data) => self.render_reminders(&data),
                Err(e) => self.fail(kind, &e),
            },
        }
    }

    /// Manual refresh with loading states shown.
    pub async fn manual_refresh(&mut self) {
        self.refresh_all(true).await;
        self.log(
            "Dashboard data manually refreshed",
            ActivityLevel::Info,
            Instant::now(),
        );
    }

    /// Start or stop the backend system.
    ///
    /// The outcome is logged to the activity feed. System state is only
    /// changed by the status refresh that follows an accepted command.
    pub async fn control(&mut self, action: ControlAction) -> Result<ControlOutcome, ApiError> {
        let result = self.api.control(action).await;
        let now = Instant::now();

        match &result {
            Ok(outcome) => {
                match &outcome.error {
                    Some(error) => self.log(
                        format!("System {} command failed: {}", action, error),
                        ActivityLevel::Error,
                        now,
                    ),
                    None => self.log(
                        format!("System {} command: {}", action, outcome.status),
                        if outcome.accepted {
                            ActivityLevel::Info
                        } else {
                            ActivityLevel::Warning
                        },
                        now,
                    ),
                }
                tracing::info!(%action, accepted = outcome.accepted, status = %outcome.status, "Control command answered");

                if outcome.accepted {
                    self.refresh_status().await;
                    if action == ControlAction::Start {
                        self.refresh_all(true).await;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(%action, error = %e, "Control command failed");
                let verb = match action {
                    ControlAction::Start => "starting",
                    ControlAction::Stop => "stopping",
                };
                self.log(format!("Error {} system", verb), ActivityLevel::Error, now);
            }
        }

        result
    }

    pub async fn start_system(&mut self) -> Result<ControlOutcome, ApiError> {
        self.control(ControlAction::Start).await
    }

    pub async fn stop_system(&mut self) -> Result<ControlOutcome, ApiError> {
        self.control(ControlAction::Stop).await
    }

    /// Acknowledge a reminder, then re-fetch reminders whatever the answer.
    pub async fn acknowledge_reminder(&mut self, reminder_id: &str) -> AckOutcome {
        let outcome = match self.api.acknowledge_reminder(reminder_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(reminder_id, error = %e, "Acknowledge request failed");
                AckOutcome::Rejected(e.to_string())
            }
        };

        let now = Instant::now();
        match &outcome {
            AckOutcome::Acknowledged => {
                tracing::info!(reminder_id, "Reminder acknowledged");
                self.log(
                    format!("Reminder {} acknowledged", reminder_id),
                    ActivityLevel::Info,
                    now,
                );
            }
            AckOutcome::Rejected(message) => self.log(
                format!("Reminder {} not acknowledged: {}", reminder_id, message),
                ActivityLevel::Warning,
                now,
            ),
        }

        self.refresh_panel(PanelKind::Reminders).await;
        outcome
    }

    pub fn clear_alerts(&mut self, now: Instant) {
        self.alerts.clear();
        self.log("Alerts cleared", ActivityLevel::Info, now);
    }

    pub fn clear_activity(&mut self) {
        self.activity.clear();
    }

    /// Post a confirmation notice (settings saved and similar).
    pub fn confirm(&mut self, message: impl Into<String>, now: Instant) {
        self.notices.post(NoticeKind::Confirmation, message, now);
    }

    /// Expire emphasis and notices. Returns whether anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let changed = self.alerts.expire_emphasis(now)
            + self.health_alerts.expire_emphasis(now)
            + self.safety_alerts.expire_emphasis(now)
            + self.notices.expire(now);
        changed > 0
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn status(&self) -> &StatusSynchronizer {
        &self.status
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn health(&self) -> &PanelState<HealthView> {
        &self.health
    }

    pub fn safety(&self) -> &PanelState<SafetyView> {
        &self.safety
    }

    pub fn reminders(&self) -> &PanelState<RemindersView> {
        &self.reminders
    }

    pub fn overview(&self) -> Option<&Overview> {
        self.overview.as_ref()
    }

    pub fn trend(&self) -> &TrendBuffer {
        &self.trend
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn alerts(&self) -> &BoundedFeed<AlertEntry> {
        &self.alerts
    }

    pub fn health_alerts(&self) -> &BoundedFeed<AlertEntry> {
        &self.health_alerts
    }

    pub fn safety_alerts(&self) -> &BoundedFeed<AlertEntry> {
        &self.safety_alerts
    }

    pub fn activity(&self) -> &BoundedFeed<ActivityEntry> {
        &self.activity
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn load_tracker(&self) -> &LoadTracker {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{EmergencyNotice, ReminderPush, SystemMessage, SystemStatusPush};
    use crate::status::Indicator;
    use serde_json::json;

    fn console() -> Console {
        let api = ApiClient::with_client("http://127.0.0.1:1", reqwest::Client::new(), 1);
        Console::new(api, &RefreshConfig::default())
    }

    fn health_update(value: serde_json::Value) -> PushEvent {
        PushEvent::HealthUpdate(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_connect_asks_for_status_refresh() {
        let mut c = console();
        let follow_ups = c.apply(PushEvent::Connected, Instant::now());
        assert_eq!(follow_ups, vec![FollowUp::RefreshStatus]);
        assert!(c.is_connected());
        assert_eq!(
            c.activity().iter().next().unwrap().item.message,
            "Connected to server"
        );
    }

    #[test]
    fn test_disconnect_fails_closed() {
        let mut c = console();
        let now = Instant::now();
        c.apply(
            PushEvent::SystemStatus(SystemStatusPush {
                running: true,
                emergency_mode: true,
            }),
            now,
        );
        assert_eq!(c.status().indicator(), Indicator::Emergency);

        c.apply(PushEvent::Disconnected, now);
        assert!(!c.status().snapshot().running);
        assert!(!c.status().snapshot().emergency_mode);
        let entry = &c.activity().iter().next().unwrap().item;
        assert_eq!(entry.level, ActivityLevel::Warning);
    }

    #[test]
    fn test_health_push_renders_and_feeds_trend() {
        let mut c = console();
        let now = Instant::now();
        c.apply(health_update(json!({"latest_readings": {"heartrate": 72}})), now);
        c.apply(health_update(json!({"latest_readings": {"systolic_bp": 120}})), now);

        assert_eq!(c.trend().len(), 2);
        assert_eq!(c.trend().heart_rate()[1], None);
        assert_eq!(c.trend().systolic().len(), 2);
        assert!(c.health().view().is_some());
        assert_eq!(
            c.activity().iter().nth(1).unwrap().item.message,
            "Health update received: heartrate: 72"
        );
    }

    #[test]
    fn test_snapshot_alerts_replace_feed_newest_first() {
        let mut c = console();
        c.apply(
            health_update(json!({
                "latest_readings": {},
                "alerts": [
                    {"message": "first", "severity": "low"},
                    {"message": "second", "severity": "high"}
                ]
            })),
            Instant::now(),
        );
        let messages: Vec<&str> = c
            .health_alerts()
            .iter()
            .map(|e| e.item.message.as_str())
            .collect();
        assert_eq!(messages, vec!["second", "first"]);
        assert!(c.health_alerts().iter().next().unwrap().is_emphasized());
    }

    #[test]
    fn test_empty_snapshot_alerts_keep_feed() {
        let mut c = console();
        let now = Instant::now();
        c.apply(
            health_update(json!({"alerts": [{"message": "keep me"}]})),
            now,
        );
        c.apply(health_update(json!({"alerts": []})), now);
        assert_eq!(c.health_alerts().len(), 1);
    }

    #[test]
    fn test_alert_routing() {
        let mut c = console();
        let now = Instant::now();
        let alert = |v: serde_json::Value| PushEvent::Alert(serde_json::from_value(v).unwrap());

        c.apply(alert(json!({"alert_type": "health", "message": "HR"})), now);
        c.apply(alert(json!({"alert_type": "safety", "message": "Door"})), now);
        c.apply(alert(json!({"alert_type": "fall", "message": "Fall"})), now);
        c.apply(alert(json!({"message": "Other"})), now);

        assert_eq!(c.alerts().len(), 4);
        assert_eq!(c.health_alerts().len(), 1);
        assert_eq!(c.safety_alerts().len(), 2);
        // Falls are always emphasized
        assert!(c.safety_alerts().iter().next().unwrap().is_emphasized());
    }

    #[test]
    fn test_reminder_push_echoes_and_refetches() {
        let mut c = console();
        let follow_ups = c.apply(
            PushEvent::Reminder(ReminderPush {
                reminder_type: Some("Medication".to_string()),
                message: Some("Take Metformin".to_string()),
                ..Default::default()
            }),
            Instant::now(),
        );
        assert_eq!(follow_ups, vec![FollowUp::RefreshReminders]);
        assert_eq!(
            c.alerts().iter().next().unwrap().item.message,
            "Medication: Take Metformin"
        );
        assert_eq!(
            c.activity().iter().next().unwrap().item.message,
            "Reminder: Take Metformin"
        );
    }

    #[test]
    fn test_update_and_emergency_alert() {
        let mut c = console();
        let t0 = Instant::now();
        c.apply(
            PushEvent::Update(SystemMessage {
                message: "Agent restarted".to_string(),
                ..Default::default()
            }),
            t0,
        );
        c.apply(
            PushEvent::EmergencyAlert(EmergencyNotice {
                message: "Fall detected".to_string(),
            }),
            t0,
        );
        assert_eq!(c.notices().active().len(), 1);
        assert!(c.tick(t0 + Duration::from_secs(10)));
        assert!(c.notices().is_empty());
        assert_eq!(
            c.activity().iter().next().unwrap().item.message,
            "Agent restarted"
        );
    }

    #[test]
    fn test_overview_only_after_three_settles() {
        let mut c = console();
        let now = Instant::now();
        c.apply(health_update(json!({"latest_readings": {"heartrate": 70}})), now);
        c.apply(
            PushEvent::SafetyUpdate(
                serde_json::from_value(json!({"latest_readings": {"location": "Kitchen"}})).unwrap(),
            ),
            now,
        );
        assert!(c.overview().is_none());

        c.fail(PanelKind::Reminders, &ApiError::Http(503));
        let overview = c.overview().unwrap();
        assert_eq!(overview.health, "1 metrics available");
        assert_eq!(overview.safety, "1 checks active");
        assert_eq!(overview.reminders, "None active");
        assert!(c.reminders().can_retry());
    }

    #[test]
    fn test_emphasis_cleared_by_tick() {
        let mut c = console();
        let t0 = Instant::now();
        c.apply(
            PushEvent::Alert(Alert {
                severity: Some("high".to_string()),
                message: Some("SOS".to_string()),
                ..Default::default()
            }),
            t0,
        );
        assert!(!c.tick(t0 + Duration::from_secs(5)));
        assert!(c.tick(t0 + Duration::from_secs(10)));
        assert!(c.alerts().iter().all(|e| !e.is_emphasized()));
    }

    #[test]
    fn test_clear_alerts_logs_activity() {
        let mut c = console();
        let now = Instant::now();
        c.apply(PushEvent::Alert(Alert::default()), now);
        c.clear_alerts(now);
        assert_eq!(c.alerts().placeholder(), Some("No alerts to display"));
        assert_eq!(c.activity().iter().next().unwrap().item.message, "Alerts cleared");
    }
}
