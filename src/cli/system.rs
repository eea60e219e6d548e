//! System status and control commands

use crate::api::{ApiClient, ControlAction};
use crate::channel::ControlCommand;
use crate::cli::{output, AcknowledgeEmergencyArgs, GlobalArgs, JsonArgs};
use crate::console::runtime::send_command;
use crate::status::{StatusSynchronizer, SystemState};
use colored::Colorize;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    state: SystemState,
    indicator: crate::status::Indicator,
    controls: crate::status::Controls,
    connected_agents: &'a [String],
}

/// Handle `guardian status`
///
/// A failed poll is reported, then shown as the fail-closed stopped state.
pub async fn run_status(
    global: &GlobalArgs,
    args: &JsonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::prepare(global)?;
    let api = ApiClient::new(&config.backend)?;

    let result = api.system_status().await;
    let agents = match &result {
        Ok(response) => response.connected_agents.clone(),
        Err(e) => {
            eprintln!("{} {}", "Warning:".yellow(), e);
            Vec::new()
        }
    };

    let mut status = StatusSynchronizer::new();
    let state = status.apply_poll(result);

    if args.json {
        let report = StatusReport {
            state,
            indicator: state.indicator(),
            controls: state.controls(),
            connected_agents: &agents,
        };
        println!("{}", output::to_json(&report)?);
    } else {
        println!("{}", output::format_status(state, &agents));
    }
    Ok(())
}

/// Handle `guardian start` and `guardian stop`
pub async fn run_control(
    global: &GlobalArgs,
    action: ControlAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::prepare(global)?;
    let api = ApiClient::new(&config.backend)?;

    let outcome = api.control(action).await?;
    tracing::info!(%action, accepted = outcome.accepted, "Control command answered");

    if let Some(error) = outcome.error {
        return Err(format!("System {} failed: {}", action, error).into());
    }
    if !outcome.accepted {
        return Err(format!("System {} not confirmed: {}", action, outcome.status).into());
    }

    println!("{} {}", "✓".green(), outcome.status);

    // Show where the system ended up
    let mut status = StatusSynchronizer::new();
    let state = status.refresh_from_server(&api).await;
    println!("{}", output::indicator_text(state.indicator()));
    Ok(())
}

/// Handle `guardian acknowledge-emergency`
pub async fn run_acknowledge_emergency(
    global: &GlobalArgs,
    args: &AcknowledgeEmergencyArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::prepare(global)?;

    send_command(
        &config.backend.socket_url(),
        Duration::from_millis(config.backend.reconnect_delay_ms),
        ControlCommand::AcknowledgeEmergency,
        Duration::from_secs(args.timeout),
    )
    .await?;

    println!("{} Emergency acknowledgement sent", "✓".green());
    Ok(())
}
