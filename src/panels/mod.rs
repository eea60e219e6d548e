//! # Domain panels
//!
//! Health, safety and reminders each fetch their own snapshot and render it
//! into their own [`PanelState`]. A fetch that fails leaves the panel in
//! [`PanelState::Failed`] with the message shown verbatim and a retry
//! offered; either way the settle is reported to the [`LoadTracker`], and
//! once all three have settled the [`Overview`] roll-up is computed.

pub mod bands;
pub mod health;
pub mod reminders;
pub mod safety;
pub mod trend;

pub use health::HealthView;
pub use reminders::RemindersView;
pub use safety::SafetyView;
pub use trend::{TrendBuffer, TrendPoint};

use crate::api::ApiError;
use crate::status::SystemState;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    Health,
    Safety,
    Reminders,
}

impl PanelKind {
    pub const ALL: [PanelKind; 3] = [PanelKind::Health, PanelKind::Safety, PanelKind::Reminders];

    pub fn as_str(self) -> &'static str {
        match self {
            PanelKind::Health => "health",
            PanelKind::Safety => "safety",
            PanelKind::Reminders => "reminders",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of one panel's content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PanelState<V> {
    Loading,
    Loaded { view: V, at: DateTime<Local> },
    Failed { message: String },
}

impl<V> Default for PanelState<V> {
    fn default() -> Self {
        PanelState::Loading
    }
}

impl<V> PanelState<V> {
    pub fn loaded(view: V) -> Self {
        PanelState::Loaded {
            view,
            at: Local::now(),
        }
    }

    pub fn failed(kind: PanelKind, error: &ApiError) -> Self {
        let message = match error {
            // Backend-reported messages are shown as-is
            ApiError::Backend(message) => message.clone(),
            other => format!("Error loading {} data: {}", kind, other),
        };
        PanelState::Failed { message }
    }

    pub fn view(&self) -> Option<&V> {
        match self {
            PanelState::Loaded { view, .. } => Some(view),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, PanelState::Loading)
    }

    /// Failed panels offer a manual retry.
    pub fn can_retry(&self) -> bool {
        matches!(self, PanelState::Failed { .. })
    }
}

/// Counts panel settles within one refresh round.
#[derive(Debug, Default)]
pub struct LoadTracker {
    settled: HashSet<PanelKind>,
    reported: bool,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new round.
    pub fn reset(&mut self) {
        self.settled.clear();
        self.reported = false;
    }

    /// Record a settle. Returns `true` exactly once per round, when the
    /// third distinct panel settles.
    pub fn settle(&mut self, kind: PanelKind) -> bool {
        self.settled.insert(kind);
        if !self.reported && self.settled.len() == PanelKind::ALL.len() {
            self.reported = true;
            return true;
        }
        false
    }

    pub fn settled(&self) -> usize {
        self.settled.len()
    }

    pub fn is_complete(&self) -> bool {
        self.reported
    }
}

/// Dashboard roll-up cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub health: String,
    pub safety: String,
    pub reminders: String,
    pub system: String,
}

impl Overview {
    pub fn compute(
        health_metrics: usize,
        safety_checks: usize,
        active_reminders: usize,
        state: SystemState,
    ) -> Self {
        Self {
            health: if health_metrics > 0 {
                format!("{} metrics available", health_metrics)
            } else {
                "No data".to_string()
            },
            safety: if safety_checks > 0 {
                format!("{} checks active", safety_checks)
            } else {
                "No data".to_string()
            },
            reminders: if active_reminders > 0 {
                format!("{} active", active_reminders)
            } else {
                "None active".to_string()
            },
            system: state.overview_label().to_string(),
        }
    }
}
