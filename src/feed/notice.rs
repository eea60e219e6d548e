//! Transient notices that dismiss themselves.

use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// Emergency alert banner
    Emergency,
    /// Short confirmation (e.g. settings saved)
    Confirmation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    dismiss_at: Instant,
}

impl Notice {
    pub fn dismiss_at(&self) -> Instant {
        self.dismiss_at
    }
}

/// Active notices, each with its own dismiss deadline.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    emergency_window: Duration,
    confirmation_window: Duration,
}

impl NoticeBoard {
    pub fn new(emergency_window: Duration, confirmation_window: Duration) -> Self {
        Self {
            notices: Vec::new(),
            emergency_window,
            confirmation_window,
        }
    }

    pub fn post(&mut self, kind: NoticeKind, message: impl Into<String>, now: Instant) {
        let window = match kind {
            NoticeKind::Emergency => self.emergency_window,
            NoticeKind::Confirmation => self.confirmation_window,
        };
        self.notices.push(Notice {
            kind,
            message: message.into(),
            dismiss_at: now + window,
        });
    }

    /// Drop notices whose deadline has passed. Returns how many were dropped.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.notices.len();
        self.notices.retain(|n| n.dismiss_at > now);
        before - self.notices.len()
    }

    pub fn active(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
