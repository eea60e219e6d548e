//! Bounded newest-first feeds.
//!
//! A [`BoundedFeed`] is what the console keeps for every alert list and the
//! activity log: items are inserted at the front, the oldest is evicted from
//! the back once capacity is exceeded, and an empty feed renders a single
//! placeholder row. High-severity items carry an emphasis that expires after
//! a fixed window no matter what happens to the item in between.

mod notice;

pub use notice::{Notice, NoticeBoard, NoticeKind};

use crate::api::{Alert, Severity};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// One feed row.
#[derive(Debug, Clone)]
pub struct FeedItem<T> {
    pub item: T,
    emphasis_until: Option<Instant>,
}

impl<T> FeedItem<T> {
    pub fn is_emphasized(&self) -> bool {
        self.emphasis_until.is_some()
    }
}

/// Fixed-capacity, newest-first list with a placeholder when empty.
#[derive(Debug, Clone)]
pub struct BoundedFeed<T> {
    items: VecDeque<FeedItem<T>>,
    capacity: usize,
    placeholder: String,
    emphasis_window: Duration,
}

impl<T> BoundedFeed<T> {
    pub fn new(capacity: usize, placeholder: impl Into<String>, emphasis_window: Duration) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity + 1),
            capacity,
            placeholder: placeholder.into(),
            emphasis_window,
        }
    }

    /// Insert at the front, evicting from the back while over capacity.
    pub fn push(&mut self, item: T, emphasized: bool, now: Instant) {
        let emphasis_until = emphasized.then(|| now + self.emphasis_window);
        self.items.push_front(FeedItem {
            item,
            emphasis_until,
        });
        while self.items.len() > self.capacity {
            self.items.pop_back();
        }
    }

    /// Drop every item; the placeholder comes back.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Clear emphasis whose window has elapsed. Returns how many were cleared.
    pub fn expire_emphasis(&mut self, now: Instant) -> usize {
        let mut cleared = 0;
        for entry in self.items.iter_mut() {
            if entry.emphasis_until.is_some_and(|until| until <= now) {
                entry.emphasis_until = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Items, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &FeedItem<T>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Placeholder text, shown only while empty.
    pub fn placeholder(&self) -> Option<&str> {
        self.items.is_empty().then_some(self.placeholder.as_str())
    }

    /// Number of rendered rows, counting the placeholder.
    pub fn rendered_len(&self) -> usize {
        self.items.len().max(1)
    }
}

/// Activity log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Info,
    Warning,
    Error,
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Info => "info",
            ActivityLevel::Warning => "warning",
            ActivityLevel::Error => "error",
        }
    }
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub message: String,
    pub level: ActivityLevel,
    pub at: DateTime<Local>,
}

impl ActivityEntry {
    pub fn new(message: impl Into<String>, level: ActivityLevel) -> Self {
        Self {
            message: message.into(),
            level,
            at: Local::now(),
        }
    }
}

/// Rendered alert row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEntry {
    /// Domain or sub-type tag (`health`, `safety`, `fall`, `reminder`, ...)
    pub kind: String,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl AlertEntry {
    pub fn from_alert(alert: &Alert, default_kind: &str) -> Self {
        let kind = alert
            .alert_type
            .clone()
            .or_else(|| alert.kind.clone())
            .unwrap_or_else(|| default_kind.to_string());

        let title = match &alert.metric {
            Some(metric) => metric.replacen('_', " ", 1).to_uppercase(),
            None => title_case(&kind.replace('_', " ")),
        };

        let details = alert.details.clone().or_else(|| {
            let value = alert.value.as_ref().map(crate::api::value_text);
            let threshold = alert.threshold.as_ref().map(crate::api::value_text);
            match (value, threshold) {
                (Some(v), Some(t)) => Some(format!("Value: {}, Threshold: {}", v, t)),
                (Some(v), None) => Some(format!("Value: {}", v)),
                (None, Some(t)) => Some(format!("Threshold: {}", t)),
                (None, None) => None,
            }
        });

        Self {
            kind,
            severity: alert.severity(),
            title,
            message: alert.body(),
            details,
            location: alert.location.clone(),
            timestamp: alert.timestamp.clone(),
        }
    }

    pub fn is_high(&self) -> bool {
        self.severity == Severity::High
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WINDOW: Duration = Duration::from_secs(10);

    fn feed(capacity: usize) -> BoundedFeed<u32> {
        BoundedFeed::new(capacity, "No alerts to display", WINDOW)
    }

    #[test]
    fn test_empty_feed_renders_placeholder() {
        let f = feed(10);
        assert_eq!(f.placeholder(), Some("No alerts to display"));
        assert_eq!(f.rendered_len(), 1);
        assert!(f.is_empty());
    }

    #[test]
    fn test_first_push_removes_placeholder() {
        let mut f = feed(10);
        f.push(1, false, Instant::now());
        assert_eq!(f.placeholder(), None);
        assert_eq!(f.rendered_len(), 1);
    }

    #[test]
    fn test_newest_first_and_eviction_of_oldest() {
        let mut f = feed(10);
        let now = Instant::now();
        for i in 0..11 {
            f.push(i, false, now);
        }
        let items: Vec<u32> = f.iter().map(|e| e.item).collect();
        assert_eq!(items.len(), 10);
        assert_eq!(items[0], 10);
        // 0 was the oldest and is the one evicted
        assert_eq!(*items.last().unwrap(), 1);
    }

    #[test]
    fn test_clear_reinstates_placeholder() {
        let mut f = feed(10);
        f.push(7, true, Instant::now());
        f.clear();
        assert_eq!(f.placeholder(), Some("No alerts to display"));
        assert_eq!(f.rendered_len(), 1);
    }

    #[test]
    fn test_emphasis_expires_after_window() {
        let mut f = feed(10);
        let t0 = Instant::now();
        f.push(1, true, t0);
        f.push(2, false, t0);

        assert_eq!(f.expire_emphasis(t0 + Duration::from_secs(9)), 0);
        assert!(f.iter().any(|e| e.is_emphasized()));

        assert_eq!(f.expire_emphasis(t0 + WINDOW), 1);
        assert!(f.iter().all(|e| !e.is_emphasized()));
    }

    #[test]
    fn test_alert_entry_from_health_alert() {
        let alert: Alert = serde_json::from_value(serde_json::json!({
            "alert_type": "health",
            "metric": "heart_rate",
            "value": 130,
            "threshold": 100,
            "message": "Heart rate high",
            "severity": "high"
        }))
        .unwrap();
        let entry = AlertEntry::from_alert(&alert, "health");
        assert_eq!(entry.title, "HEART RATE");
        assert_eq!(entry.details.as_deref(), Some("Value: 130, Threshold: 100"));
        assert!(entry.is_high());
    }

    #[test]
    fn test_alert_entry_fall_is_high() {
        let alert = Alert {
            alert_type: Some("fall".to_string()),
            severity: Some("low".to_string()),
            message: Some("Fall detected in bathroom".to_string()),
            ..Default::default()
        };
        let entry = AlertEntry::from_alert(&alert, "safety");
        assert_eq!(entry.kind, "fall");
        assert_eq!(entry.title, "Fall");
        assert!(entry.is_high());
    }

    proptest! {
        #[test]
        fn prop_feed_never_exceeds_capacity(
            capacity in 1usize..20,
            pushes in proptest::collection::vec(any::<(u32, bool)>(), 0..60),
        ) {
            let mut f = BoundedFeed::new(capacity, "empty", WINDOW);
            let now = Instant::now();
            for (item, emphasized) in &pushes {
                f.push(*item, *emphasized, now);
                prop_assert!(f.rendered_len() <= capacity);
            }
            let expected = pushes.iter().rev().take(capacity).map(|(i, _)| *i);
            prop_assert!(f.iter().map(|e| e.item).eq(expected));
        }
    }
}
