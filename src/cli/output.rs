//! Output formatting helpers for CLI commands

use crate::console::Console;
use crate::feed::{ActivityEntry, ActivityLevel, AlertEntry, BoundedFeed};
use crate::panels::bands::{Band, RowBand};
use crate::panels::safety::{format_hours, Badge, Period, StatusLevel, Timeline};
use crate::panels::{
    HealthView, Overview, PanelState, RemindersView, SafetyView, TrendBuffer,
};
use crate::api::Severity;
use crate::settings::SettingValue;
use crate::status::{Indicator, SystemState};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Pretty JSON for any view model.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn indicator_text(indicator: Indicator) -> String {
    match indicator {
        Indicator::Inactive => indicator.label().yellow().to_string(),
        Indicator::Active => indicator.label().green().to_string(),
        Indicator::Emergency => indicator.label().red().bold().to_string(),
    }
}

fn band_text(text: &str, band: Option<Band>) -> String {
    match band {
        Some(Band::Success) => text.green().to_string(),
        Some(Band::Warning) => text.yellow().to_string(),
        Some(Band::Danger) => text.red().to_string(),
        None => text.to_string(),
    }
}

fn row_band_text(text: &str, band: RowBand) -> String {
    match band {
        RowBand::None => text.to_string(),
        RowBand::Info => text.cyan().to_string(),
        RowBand::Warning => text.yellow().to_string(),
        RowBand::Danger => text.red().to_string(),
    }
}

fn level_text(text: &str, level: StatusLevel) -> String {
    match level {
        StatusLevel::Ok => text.green().to_string(),
        StatusLevel::Warning => text.yellow().to_string(),
        StatusLevel::Danger => text.red().bold().to_string(),
    }
}

fn badge_text(text: &str, badge: Badge) -> String {
    match badge {
        Badge::Success => text.green().to_string(),
        Badge::Info => text.cyan().to_string(),
        Badge::Warning => text.yellow().to_string(),
        Badge::Danger => text.red().to_string(),
        Badge::Secondary => text.dimmed().to_string(),
    }
}

fn severity_text(severity: Severity) -> String {
    match severity {
        Severity::Low => "low".dimmed().to_string(),
        Severity::Medium => "medium".yellow().to_string(),
        Severity::High => "high".red().bold().to_string(),
    }
}

/// Format the system state as a table
pub fn format_status(state: SystemState, connected_agents: &[String]) -> String {
    let controls = state.controls();
    let mut t = table(vec!["Status", "Running", "Emergency", "Start", "Stop"]);
    t.add_row(vec![
        Cell::new(indicator_text(state.indicator())),
        Cell::new(state.running),
        Cell::new(state.emergency_mode),
        Cell::new(if controls.start_enabled { "enabled" } else { "-" }),
        Cell::new(if controls.stop_enabled { "enabled" } else { "-" }),
    ]);

    let mut out = t.to_string();
    if !connected_agents.is_empty() {
        out.push_str(&format!("\nAgents: {}", connected_agents.join(", ")));
    }
    out
}

/// Format a health view: vitals, then the analysis when present
pub fn format_health(view: &HealthView) -> String {
    if view.vitals.is_empty() {
        return format!("Health: {}", view.summary);
    }

    let mut t = table(vec!["Metric", "Value", "Gauge"]);
    for row in &view.vitals {
        let gauge = row
            .percentage
            .map(|p| format!("{:.0}%", p))
            .unwrap_or_else(|| "-".to_string());
        t.add_row(vec![
            Cell::new(row.vital.label()),
            Cell::new(&row.value),
            Cell::new(band_text(&gauge, row.band)),
        ]);
    }
    let mut out = t.to_string();

    if let Some(analysis) = &view.analysis {
        out.push_str(&format!(
            "\n\nReadings: {}  Alerts: {} ({})  Notified: {}\n",
            analysis.total_readings,
            analysis.total_alerts,
            analysis.alert_percentage,
            analysis.notified_count
        ));

        let mut t = table(vec!["Metric", "Readings", "Exceeded", "Percentage"]);
        for row in &analysis.metrics {
            t.add_row(vec![
                Cell::new(&row.name),
                Cell::new(row.total_readings),
                Cell::new(row.threshold_exceeded),
                Cell::new(row_band_text(&row.percentage, row.band)),
            ]);
        }
        out.push_str(&t.to_string());
    }

    out
}

/// Format a safety view: checks, badges and location activity
pub fn format_safety(view: &SafetyView) -> String {
    if view.items.is_empty() && view.activity.is_none() {
        return format!("Safety: {}", view.summary);
    }

    let mut t = table(vec!["Check", "Value"]);
    for item in &view.items {
        t.add_row(vec![
            Cell::new(item.label),
            Cell::new(level_text(&item.value, item.level)),
        ]);
    }
    let mut out = t.to_string();

    let mut details = Vec::new();
    if let Some(location) = &view.location {
        details.push(format!("Location: {}", location));
    }
    if let Some(last) = &view.last_movement {
        details.push(format!("Last movement: {}", last));
    }
    if let Some(movement) = &view.movement {
        details.push(format!(
            "Movement: {}",
            badge_text(&movement.text, movement.badge)
        ));
    }
    if let Some(door) = &view.door {
        details.push(format!("Door: {}", badge_text(&door.text, door.badge)));
    }
    if !details.is_empty() {
        out.push('\n');
        out.push_str(&details.join("  "));
    }

    if let Some(activity) = &view.activity {
        let mut t = table(vec!["Room", "Today", "This Week", "This Month"]);
        for (room, today) in activity.period(Period::Today) {
            let week = activity.period(Period::Week).get(room).copied().unwrap_or(0.0);
            let month = activity.period(Period::Month).get(room).copied().unwrap_or(0.0);
            t.add_row(vec![
                Cell::new(room),
                Cell::new(format_hours(*today)),
                Cell::new(format_hours(week)),
                Cell::new(format_hours(month)),
            ]);
        }
        out.push_str("\n\n");
        out.push_str(&t.to_string());
    }

    out
}

/// Format active and completed reminders
pub fn format_reminders(view: &RemindersView) -> String {
    let mut out = String::new();

    if view.active.is_empty() {
        out.push_str("No active reminders");
    } else {
        let mut t = table(vec!["ID", "Type", "Message", "Time", "Priority"]);
        for row in &view.active {
            t.add_row(vec![
                Cell::new(&row.id),
                Cell::new(&row.kind),
                Cell::new(&row.message),
                Cell::new(row.time.as_deref().unwrap_or("-")),
                Cell::new(severity_text(row.priority)),
            ]);
        }
        out.push_str(&t.to_string());
    }

    if !view.completed.is_empty() {
        let mut t = table(vec!["Type", "Message", "Completed"]);
        for row in &view.completed {
            t.add_row(vec![
                Cell::new(&row.kind),
                Cell::new(&row.message),
                Cell::new(row.completed_at.as_deref().unwrap_or("-")),
            ]);
        }
        out.push_str("\n\nCompleted:\n");
        out.push_str(&t.to_string());
    }

    out
}

/// Format an alert list, or its placeholder
pub fn format_alerts(feed: &BoundedFeed<AlertEntry>) -> String {
    if let Some(placeholder) = feed.placeholder() {
        return placeholder.dimmed().to_string();
    }

    let mut t = table(vec!["Severity", "Title", "Message", "Location", "Time"]);
    for row in feed.iter() {
        let alert = &row.item;
        let title = if row.is_emphasized() {
            alert.title.bold().to_string()
        } else {
            alert.title.clone()
        };
        let message = match &alert.details {
            Some(details) => format!("{}\n{}", alert.message, details.dimmed()),
            None => alert.message.clone(),
        };
        t.add_row(vec![
            Cell::new(severity_text(alert.severity)),
            Cell::new(title),
            Cell::new(message),
            Cell::new(alert.location.as_deref().unwrap_or("-")),
            Cell::new(alert.timestamp.as_deref().unwrap_or("-")),
        ]);
    }
    t.to_string()
}

/// Format the activity log, or its placeholder
pub fn format_activity(feed: &BoundedFeed<ActivityEntry>) -> String {
    if let Some(placeholder) = feed.placeholder() {
        return placeholder.dimmed().to_string();
    }

    feed.iter()
        .map(|row| {
            let entry = &row.item;
            let message = match entry.level {
                ActivityLevel::Info => entry.message.clone(),
                ActivityLevel::Warning => entry.message.yellow().to_string(),
                ActivityLevel::Error => entry.message.red().to_string(),
            };
            format!("{}  {}", entry.at.format("%H:%M:%S"), message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format settings as a table
pub fn format_settings(values: &[SettingValue]) -> String {
    let mut t = table(vec!["Category", "Key", "Value"]);
    for v in values {
        let value = if v.is_default {
            format!("{} {}", v.value, "(default)".dimmed())
        } else {
            v.value.clone()
        };
        t.add_row(vec![
            Cell::new(v.category),
            Cell::new(v.key),
            Cell::new(value),
        ]);
    }
    t.to_string()
}

fn format_panel<V>(title: &str, state: &PanelState<V>, render: fn(&V) -> String) -> String {
    let body = match state {
        PanelState::Loading => "Loading...".dimmed().to_string(),
        PanelState::Loaded { view, .. } => render(view),
        PanelState::Failed { message } => format!("{} (retry available)", message.red()),
    };
    format!("{}\n{}", title.bold(), body)
}

fn format_overview(overview: &Overview) -> String {
    let mut t = table(vec!["Health", "Safety", "Reminders", "System"]);
    t.add_row(vec![
        Cell::new(&overview.health),
        Cell::new(&overview.safety),
        Cell::new(&overview.reminders),
        Cell::new(&overview.system),
    ]);
    t.to_string()
}

fn format_trend(trend: &TrendBuffer) -> String {
    let num = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
    match trend.latest() {
        Some((label, point)) => format!(
            "Trend ({} points), latest {}: HR {}  BP {}/{}",
            trend.len(),
            label,
            num(point.heart_rate),
            num(point.systolic),
            num(point.diastolic)
        ),
        None => "Trend: no points yet".dimmed().to_string(),
    }
}

fn format_timeline(timeline: &Timeline) -> String {
    timeline
        .events()
        .iter()
        .take(5)
        .map(|event| format!("{}: {}", event.heading(), event.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The whole live dashboard as text.
pub fn format_dashboard(console: &Console) -> String {
    let mut sections = Vec::new();

    let connection = if console.is_connected() {
        "connected".green().to_string()
    } else {
        "disconnected".red().to_string()
    };
    sections.push(format!(
        "{}  [{}]",
        indicator_text(console.status().indicator()),
        connection
    ));

    for notice in console.notices().active() {
        sections.push(format!("{} {}", "!".red().bold(), notice.message.bold()));
    }

    if let Some(overview) = console.overview() {
        sections.push(format_overview(overview));
    }

    sections.push(format_panel("Health", console.health(), format_health));
    sections.push(format_trend(console.trend()));
    sections.push(format_panel("Safety", console.safety(), format_safety));
    if !console.timeline().is_empty() {
        sections.push(format_timeline(console.timeline()));
    }
    sections.push(format_panel("Reminders", console.reminders(), format_reminders));
    sections.push(format!("{}\n{}", "Alerts".bold(), format_alerts(console.alerts())));
    sections.push(format!(
        "{}\n{}",
        "Activity".bold(),
        format_activity(console.activity())
    ));

    sections.join("\n\n")
}

/// One feed row with its emphasis flag.
#[derive(Debug, Serialize)]
pub struct FeedRow<'a, T: Serialize> {
    #[serde(flatten)]
    pub item: &'a T,
    pub emphasized: bool,
}

fn feed_rows<T: Serialize>(feed: &BoundedFeed<T>) -> Vec<FeedRow<'_, T>> {
    feed.iter()
        .map(|row| FeedRow {
            item: &row.item,
            emphasized: row.is_emphasized(),
        })
        .collect()
}

/// Serializable view of the whole console.
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub connected: bool,
    pub state: SystemState,
    pub indicator: Indicator,
    pub overview: Option<&'a Overview>,
    pub health: &'a PanelState<HealthView>,
    pub safety: &'a PanelState<SafetyView>,
    pub reminders: &'a PanelState<RemindersView>,
    pub trend: &'a TrendBuffer,
    pub timeline: &'a Timeline,
    pub alerts: Vec<FeedRow<'a, AlertEntry>>,
    pub health_alerts: Vec<FeedRow<'a, AlertEntry>>,
    pub safety_alerts: Vec<FeedRow<'a, AlertEntry>>,
    pub activity: Vec<FeedRow<'a, ActivityEntry>>,
    pub notices: Vec<&'a str>,
}

impl<'a> DashboardSnapshot<'a> {
    pub fn capture(console: &'a Console) -> Self {
        Self {
            connected: console.is_connected(),
            state: console.status().snapshot(),
            indicator: console.status().indicator(),
            overview: console.overview(),
            health: console.health(),
            safety: console.safety(),
            reminders: console.reminders(),
            trend: console.trend(),
            timeline: console.timeline(),
            alerts: feed_rows(console.alerts()),
            health_alerts: feed_rows(console.health_alerts()),
            safety_alerts: feed_rows(console.safety_alerts()),
            activity: feed_rows(console.activity()),
            notices: console
                .notices()
                .active()
                .iter()
                .map(|n| n.message.as_str())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HealthData, RemindersData, SafetyData};
    use serde_json::json;
    use std::time::{Duration, Instant};

    #[test]
    fn test_format_status_shows_agents() {
        let state = SystemState {
            running: true,
            emergency_mode: false,
        };
        let output = format_status(state, &["health".to_string(), "safety".to_string()]);
        assert!(output.contains("System Active"));
        assert!(output.contains("Agents: health, safety"));
    }

    #[test]
    fn test_format_health_with_vitals_and_analysis() {
        let data: HealthData = serde_json::from_value(json!({
            "latest_readings": {"heart_rate": 72, "systolic_bp": 120, "diastolic_bp": 80},
            "analysis": {
                "total_readings": 40,
                "alert_counts": {"total": 4, "heart_rate": 4},
                "alert_percentage": 10.0,
                "notified_count": 2,
                "metric_stats": {"heart_rate": {"total_readings": 40, "threshold_exceeded": 4, "percentage": 10.0}}
            }
        }))
        .unwrap();
        let output = format_health(&HealthView::from_data(&data));
        assert!(output.contains("Heart Rate"));
        assert!(output.contains("72 bpm"));
        assert!(output.contains("120/80 mmHg"));
        assert!(output.contains("10.0%"));
    }

    #[test]
    fn test_format_health_without_readings() {
        let output = format_health(&HealthView::from_data(&HealthData::default()));
        assert_eq!(output, "Health: No data");
    }

    #[test]
    fn test_format_safety_activity_rooms() {
        let data: SafetyData = serde_json::from_value(json!({
            "latest_readings": {"location": "Kitchen", "door_status": "Open"},
            "location_data": []
        }))
        .unwrap();
        let output = format_safety(&SafetyView::from_data(&data, chrono::Local::now()));
        assert!(output.contains("Kitchen"));
        assert!(output.contains("livingroom"));
        assert!(output.contains("0 hrs"));
    }

    #[test]
    fn test_format_reminders_empty() {
        let output = format_reminders(&RemindersView::from_data(&RemindersData::default()));
        assert_eq!(output, "No active reminders");
    }

    #[test]
    fn test_format_alerts_placeholder_and_rows() {
        let mut feed = BoundedFeed::new(10, "No alerts to display", Duration::from_secs(10));
        assert!(format_alerts(&feed).contains("No alerts to display"));

        feed.push(
            AlertEntry::from_alert(
                &serde_json::from_value(json!({"alert_type": "fall", "message": "Fall in bathroom"}))
                    .unwrap(),
                "safety",
            ),
            true,
            Instant::now(),
        );
        let output = format_alerts(&feed);
        assert!(output.contains("Fall in bathroom"));
    }

    #[test]
    fn test_feed_rows_serialize_flat() {
        let mut feed = BoundedFeed::new(10, "No activities to display", Duration::from_secs(10));
        feed.push(
            ActivityEntry::new("Connected to server", ActivityLevel::Info),
            false,
            Instant::now(),
        );
        let value = serde_json::to_value(feed_rows(&feed)).unwrap();
        assert_eq!(value[0]["message"], "Connected to server");
        assert_eq!(value[0]["level"], "info");
        assert_eq!(value[0]["emphasized"], false);
    }
}
