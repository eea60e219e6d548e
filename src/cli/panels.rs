//! One-shot panel commands and reminder acknowledgement

use crate::api::{AckOutcome, ApiClient};
use crate::cli::{output, AckArgs, GlobalArgs, JsonArgs};
use crate::panels::{HealthView, PanelKind, RemindersView, SafetyView};
use colored::Colorize;

/// Handle `guardian health`
pub async fn run_health(
    global: &GlobalArgs,
    args: &JsonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::prepare(global)?;
    let api = ApiClient::new(&config.backend)?;

    let data = api.health_data().await.map_err(|e| panel_error(PanelKind::Health, e))?;
    let view = HealthView::from_data(&data);

    if args.json {
        println!("{}", output::to_json(&view)?);
    } else {
        println!("{}", output::format_health(&view));
    }
    Ok(())
}

/// Handle `guardian safety`
pub async fn run_safety(
    global: &GlobalArgs,
    args: &JsonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::prepare(global)?;
    let api = ApiClient::new(&config.backend)?;

    let data = api.safety_data().await.map_err(|e| panel_error(PanelKind::Safety, e))?;
    let view = SafetyView::from_data(&data, chrono::Local::now());

    if args.json {
        println!("{}", output::to_json(&view)?);
    } else {
        println!("{}", output::format_safety(&view));
    }
    Ok(())
}

/// Handle `guardian reminders`
pub async fn run_reminders(
    global: &GlobalArgs,
    args: &JsonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::prepare(global)?;
    let api = ApiClient::new(&config.backend)?;

    let data = api
        .reminders()
        .await
        .map_err(|e| panel_error(PanelKind::Reminders, e))?;
    let view = RemindersView::from_data(&data);

    if args.json {
        println!("{}", output::to_json(&view)?);
    } else {
        println!("{}", output::format_reminders(&view));
    }
    Ok(())
}

/// Handle `guardian ack <reminder-id>`
///
/// The reminder list is fetched again whatever the backend answered.
pub async fn run_ack(global: &GlobalArgs, args: &AckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::prepare(global)?;
    let api = ApiClient::new(&config.backend)?;

    let outcome = match api.acknowledge_reminder(&args.reminder_id).await {
        Ok(outcome) => outcome,
        Err(e) => AckOutcome::Rejected(e.to_string()),
    };

    match api.reminders().await {
        Ok(data) => println!("{}", output::format_reminders(&RemindersView::from_data(&data))),
        Err(e) => tracing::warn!(error = %e, "Reminder re-fetch failed"),
    }

    match outcome {
        AckOutcome::Acknowledged => {
            println!("{} Reminder {} acknowledged", "✓".green(), args.reminder_id);
            Ok(())
        }
        AckOutcome::Rejected(message) => Err(format!(
            "Failed to acknowledge reminder {}: {}",
            args.reminder_id, message
        )
        .into()),
    }
}

/// Same wording the live panels use for a failed fetch.
fn panel_error(kind: PanelKind, error: crate::api::ApiError) -> Box<dyn std::error::Error> {
    match crate::panels::PanelState::<()>::failed(kind, &error) {
        crate::panels::PanelState::Failed { message } => message.into(),
        _ => error.into(),
    }
}
