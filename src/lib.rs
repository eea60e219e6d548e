//! Guardian - headless monitoring console for the GuardianCare backend
//!
//! This library keeps a typed, per-session view of an elderly-care telemetry
//! backend: system run state, health and safety snapshots, reminders, and
//! the alert and activity feeds, fed by REST snapshots and a live push
//! channel.

pub mod api;
pub mod channel;
pub mod cli;
pub mod config;
pub mod console;
pub mod feed;
pub mod logging;
pub mod panels;
pub mod settings;
pub mod status;
