//! Refresh cadence and display bounds

use serde::{Deserialize, Serialize};

/// Timers and buffer sizes used by the live console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between full panel refreshes while the system is running
    pub interval_seconds: u64,
    /// How long a high-severity feed entry stays emphasized
    pub emphasis_seconds: u64,
    /// How long an emergency notice stays on screen
    pub notice_dismiss_seconds: u64,
    /// How long a settings confirmation stays on screen
    pub confirmation_seconds: u64,
    /// Maximum entries per alert/activity list
    pub feed_capacity: usize,
    /// Maximum points in the vitals trend window
    pub trend_capacity: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            emphasis_seconds: 10,
            notice_dismiss_seconds: 10,
            confirmation_seconds: 3,
            feed_capacity: 10,
            trend_capacity: 10,
        }
    }
}
