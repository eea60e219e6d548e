//! # Status Synchronizer
//!
//! Reconciles the backend's run/emergency state from two sources, the
//! `GET /api/system/status` poll and the `system_status` push event, into a
//! single [`SystemState`].
//!
//! - A poll failure of any kind resolves to "not running, no emergency".
//! - A push overwrites both flags immediately (last event wins).
//! - A channel disconnect resolves to "not running, no emergency".
//!
//! The two flags are independent: emergency mode never implies running and
//! running never clears emergency mode.

use crate::api::{ApiClient, ApiError, SystemStatusPush, SystemStatusResponse};
use serde::Serialize;
use std::fmt;

/// Authoritative run/emergency pair for one console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SystemState {
    pub running: bool,
    pub emergency_mode: bool,
}

impl SystemState {
    pub const STOPPED: SystemState = SystemState {
        running: false,
        emergency_mode: false,
    };

    pub fn indicator(&self) -> Indicator {
        if self.emergency_mode {
            Indicator::Emergency
        } else if self.running {
            Indicator::Active
        } else {
            Indicator::Inactive
        }
    }

    pub fn controls(&self) -> Controls {
        Controls {
            start_enabled: !self.running,
            stop_enabled: self.running,
        }
    }

    /// Text of the "system" cell in the overview roll-up.
    pub fn overview_label(&self) -> &'static str {
        match (self.running, self.emergency_mode) {
            (false, _) => "Inactive",
            (true, true) => "Emergency Mode",
            (true, false) => "Active",
        }
    }
}

impl From<&SystemStatusResponse> for SystemState {
    fn from(response: &SystemStatusResponse) -> Self {
        Self {
            running: response.is_running(),
            emergency_mode: response.emergency_mode,
        }
    }
}

impl From<SystemStatusPush> for SystemState {
    fn from(push: SystemStatusPush) -> Self {
        Self {
            running: push.running,
            emergency_mode: push.emergency_mode,
        }
    }
}

/// Three-way status indicator. Emergency wins over active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Inactive,
    Active,
    Emergency,
}

impl Indicator {
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Inactive => "System Inactive",
            Indicator::Active => "System Active",
            Indicator::Emergency => "EMERGENCY",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Enabled state of the start/stop controls. Exactly one is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

/// Owns the [`SystemState`] of one console.
#[derive(Debug, Default)]
pub struct StatusSynchronizer {
    state: SystemState,
}

impl StatusSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll the backend and apply the result.
    pub async fn refresh_from_server(&mut self, api: &ApiClient) -> SystemState {
        let result = api.system_status().await;
        self.apply_poll(result)
    }

    /// Apply a poll result; any error fails closed.
    pub fn apply_poll(&mut self, result: Result<SystemStatusResponse, ApiError>) -> SystemState {
        let next = match result {
            Ok(response) => SystemState::from(&response),
            Err(e) => {
                tracing::warn!(error = %e, "Status poll failed, assuming system stopped");
                SystemState::STOPPED
            }
        };
        self.set(next, "poll")
    }

    pub fn on_push_status(&mut self, payload: SystemStatusPush) -> SystemState {
        self.set(SystemState::from(payload), "push")
    }

    pub fn on_disconnect(&mut self) -> SystemState {
        self.set(SystemState::STOPPED, "disconnect")
    }

    pub fn snapshot(&self) -> SystemState {
        self.state
    }

    pub fn indicator(&self) -> Indicator {
        self.state.indicator()
    }

    pub fn controls(&self) -> Controls {
        self.state.controls()
    }

    fn set(&mut self, next: SystemState, source: &'static str) -> SystemState {
        if next != self.state {
            tracing::info!(
                source,
                running = next.running,
                emergency_mode = next.emergency_mode,
                indicator = %next.indicator(),
                "System state changed"
            );
        }
        self.state = next;
        next
    }
}
