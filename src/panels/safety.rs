//! Safety panel view model: status items, badges, location activity and
//! the movement timeline.

use crate::api::{LocationEntry, Readings, SafetyData};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDateTime, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rooms always shown in the activity view, even at zero hours.
pub const ROOMS: &[&str] = &["bedroom", "bathroom", "kitchen", "livingroom", "outside"];

/// Timeline entries kept before the oldest are dropped.
const TIMELINE_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Ok,
    Warning,
    Danger,
}

/// Overview row for one safety check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusItem {
    pub label: &'static str,
    pub value: String,
    pub level: StatusLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Success,
    Info,
    Warning,
    Danger,
    Secondary,
}

pub fn movement_badge(status: &str) -> Badge {
    match status.to_lowercase().as_str() {
        "active" => Badge::Success,
        "moderate" => Badge::Info,
        "low" => Badge::Warning,
        "no movement" => Badge::Danger,
        _ => Badge::Secondary,
    }
}

pub fn door_badge(status: &str) -> Badge {
    match status.to_lowercase().as_str() {
        "closed" => Badge::Success,
        "open" => Badge::Danger,
        "ajar" => Badge::Warning,
        _ => Badge::Secondary,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeValue {
    pub text: String,
    pub badge: Badge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyView {
    pub items: Vec<StatusItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_movement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement: Option<BadgeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub door: Option<BadgeValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivityBuckets>,
    pub summary: String,
}

impl SafetyView {
    pub fn from_data(data: &SafetyData, now: DateTime<Local>) -> Self {
        let activity = data
            .location_data
            .as_deref()
            .map(|entries| ActivityBuckets::from_entries(entries, now));

        let Some(readings) = &data.latest_readings else {
            return Self {
                items: Vec::new(),
                location: None,
                last_movement: None,
                movement: None,
                door: None,
                activity,
                summary: "No data".to_string(),
            };
        };

        let present = |key: &str| readings.0.contains_key(key);

        Self {
            items: status_items(readings),
            location: present("location").then(|| {
                readings
                    .text(&["location"])
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "Unknown".to_string())
            }),
            last_movement: present("last_movement_time").then(|| {
                format_clock(readings.text(&["last_movement_time"]).as_deref())
            }),
            movement: present("movement_status").then(|| {
                badge_value(readings.text(&["movement_status"]), movement_badge)
            }),
            door: present("door_status")
                .then(|| badge_value(readings.text(&["door_status"]), door_badge)),
            activity,
            summary: readings.summary(),
        }
    }

    pub fn check_count(&self) -> usize {
        self.items.len()
    }
}

fn badge_value(text: Option<String>, classify: fn(&str) -> Badge) -> BadgeValue {
    let text = text
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    BadgeValue {
        badge: classify(&text),
        text,
    }
}

/// Dashboard status items for every present safety reading.
pub fn status_items(readings: &Readings) -> Vec<StatusItem> {
    let mut items = Vec::new();

    if let Some(activity) = readings.text(&["movement_activity"]) {
        let level = if activity == "Active" {
            StatusLevel::Ok
        } else {
            StatusLevel::Warning
        };
        items.push(StatusItem {
            label: "Movement",
            value: activity,
            level,
        });
    }

    if let Some(fall) = readings.flag(&["fall_detected"]) {
        items.push(if fall {
            StatusItem {
                label: "Fall Detection",
                value: "Fall Detected!".to_string(),
                level: StatusLevel::Danger,
            }
        } else {
            StatusItem {
                label: "Fall Detection",
                value: "No Falls".to_string(),
                level: StatusLevel::Ok,
            }
        });
    }

    if let Some(location) = readings.text(&["location"]) {
        items.push(StatusItem {
            label: "Location",
            value: location,
            level: StatusLevel::Ok,
        });
    }

    if let Some(door) = readings.text(&["door_status"]) {
        let level = if door == "Closed" {
            StatusLevel::Ok
        } else {
            StatusLevel::Warning
        };
        items.push(StatusItem {
            label: "Door Status",
            value: door,
            level,
        });
    }

    items
}

/// Parse a backend timestamp: RFC 3339, or a naive ISO time taken as local.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

/// `HH:MM:SS` local time, or `Unknown`.
pub fn format_clock(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// `0 hrs`, `N mins` below an hour, else `N.N hrs`.
pub fn format_hours(hours: f64) -> String {
    if hours == 0.0 {
        "0 hrs".to_string()
    } else if hours < 1.0 {
        format!("{} mins", (hours * 60.0).round() as i64)
    } else {
        format!("{:.1} hrs", hours)
    }
}

/// `Living Room` -> `livingroom`
pub fn normalize_room(room: &str) -> String {
    room.to_lowercase().replace(' ', "")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Week,
    Month,
}

/// Hours per room for today, this week (since Sunday 00:00) and this month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityBuckets {
    pub today: BTreeMap<String, f64>,
    pub week: BTreeMap<String, f64>,
    pub month: BTreeMap<String, f64>,
}

impl ActivityBuckets {
    pub fn from_entries(entries: &[LocationEntry], now: DateTime<Local>) -> Self {
        let mut buckets = Self::default();
        for room in ROOMS {
            buckets.today.insert(room.to_string(), 0.0);
            buckets.week.insert(room.to_string(), 0.0);
            buckets.month.insert(room.to_string(), 0.0);
        }

        let start_of_week = (now.date_naive()
            - Duration::days(i64::from(now.weekday().num_days_from_sunday())))
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| Local.from_local_datetime(&naive).earliest());

        for entry in entries {
            let Some(at) = parse_timestamp(&entry.timestamp) else {
                tracing::debug!(timestamp = %entry.timestamp, "Skipping location entry with bad timestamp");
                continue;
            };
            let room = normalize_room(&entry.location);
            let hours = entry.duration.unwrap_or(1.0);

            if at.date_naive() == now.date_naive() {
                *buckets.today.entry(room.clone()).or_insert(0.0) += hours;
            }
            if start_of_week.is_some_and(|start| at >= start) {
                *buckets.week.entry(room.clone()).or_insert(0.0) += hours;
            }
            if at.year() == now.year() && at.month() == now.month() {
                *buckets.month.entry(room).or_insert(0.0) += hours;
            }
        }

        buckets
    }

    pub fn period(&self, period: Period) -> &BTreeMap<String, f64> {
        match period {
            Period::Today => &self.today,
            Period::Week => &self.week,
            Period::Month => &self.month,
        }
    }

    /// Bar height per room, relative to the busiest room (floor of one hour).
    pub fn relative(&self, period: Period) -> Vec<(String, f64)> {
        let data = self.period(period);
        let max = data.values().copied().fold(1.0, f64::max);
        data.iter()
            .map(|(room, hours)| (room.clone(), hours / max * 100.0))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    Movement,
    Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub at: DateTime<Local>,
    pub title: &'static str,
    pub description: String,
    pub kind: TimelineKind,
}

impl TimelineEvent {
    /// Event for a reading with a timestamp and a movement status or
    /// location; movement wins when both are present.
    pub fn from_readings(readings: &Readings) -> Option<Self> {
        let at = parse_timestamp(&readings.text(&["timestamp"])?)?;
        let movement = readings
            .text(&["movement_status"])
            .filter(|s| !s.is_empty());

        if let Some(status) = movement {
            return Some(Self {
                at,
                title: "Movement Update",
                description: format!("Movement status: {}", status),
                kind: TimelineKind::Movement,
            });
        }

        let location = readings.text(&["location"]).filter(|s| !s.is_empty())?;
        Some(Self {
            at,
            title: "Location Update",
            description: format!("Location changed to: {}", location),
            kind: TimelineKind::Location,
        })
    }

    /// `HH:MM - Title`
    pub fn heading(&self) -> String {
        format!("{} - {}", self.at.format("%H:%M"), self.title)
    }
}

/// Movement/location timeline, newest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn record(&mut self, event: TimelineEvent) {
        let idx = self.events.partition_point(|e| e.at > event.at);
        self.events.insert(idx, event);
        self.events.truncate(TIMELINE_LIMIT);
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
