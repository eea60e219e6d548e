//! CLI module for Guardian
//!
//! Command-line interface definitions and handlers for the monitoring console.
//!
//! # Commands
//!
//! - `watch` - Live dashboard driven by the push channel
//! - `status` / `start` / `stop` - System state and control
//! - `acknowledge-emergency` - Clear an active emergency
//! - `health` / `safety` / `reminders` - One-shot panel snapshots
//! - `ack` - Acknowledge a reminder
//! - `settings` - Operator preferences (list, get, set, reset)
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Follow the backend on another host
//! guardian --backend-url http://care-hub.local:5000 watch
//!
//! # Raise the heart-rate alarm floor
//! guardian settings set heartRateMin 55
//!
//! # Generate shell completions
//! guardian completions bash > ~/.bash_completion.d/guardian
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod panels;
pub mod settings;
pub mod system;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::ConsoleConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Guardian - elderly-care monitoring console
#[derive(Parser, Debug)]
#[command(
    name = "guardian",
    version,
    about = "Headless monitoring console for the GuardianCare backend"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "guardian.toml")]
    pub config: PathBuf,

    /// Override the backend base URL
    #[arg(long, global = true, env = "GUARDIAN_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Follow the backend live
    Watch(WatchArgs),
    /// Show system status
    Status(JsonArgs),
    /// Start the backend system
    Start,
    /// Stop the backend system
    Stop,
    /// Acknowledge an active emergency
    AcknowledgeEmergency(AcknowledgeEmergencyArgs),
    /// Show the latest health snapshot
    Health(JsonArgs),
    /// Show the latest safety snapshot
    Safety(JsonArgs),
    /// Show active and completed reminders
    Reminders(JsonArgs),
    /// Acknowledge a reminder
    Ack(AckArgs),
    /// Manage operator preferences
    #[command(subcommand)]
    Settings(SettingsCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Default)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Print one JSON snapshot per update instead of tables
    #[arg(long)]
    pub json: bool,

    /// Override the periodic refresh interval (seconds)
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(Args, Debug)]
pub struct AcknowledgeEmergencyArgs {
    /// Seconds to wait for the push channel to connect
    #[arg(long, default_value = "10")]
    pub timeout: u64,
}

#[derive(Args, Debug)]
pub struct AckArgs {
    /// Reminder id
    pub reminder_id: String,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// List every preference with its current value
    List(SettingsListArgs),
    /// Print one preference
    Get(SettingsGetArgs),
    /// Store one or more preferences
    Set(SettingsSetArgs),
    /// Remove every stored preference
    Reset,
}

#[derive(Args, Debug)]
pub struct SettingsListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Only show one category (system, notifications, health, safety, reminders)
    #[arg(long)]
    pub category: Option<crate::settings::Category>,
}

#[derive(Args, Debug)]
pub struct SettingsGetArgs {
    /// Preference key (e.g. heartRateMin)
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SettingsSetArgs {
    /// Preference key (e.g. heartRateMin)
    pub key: String,

    /// New value, stored verbatim
    pub value: String,

    /// Further KEY=VALUE pairs saved in the same write
    #[arg(value_name = "KEY=VALUE")]
    pub more: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "guardian.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with CLI overrides
///
/// Precedence: file, then `GUARDIAN_*` environment, then flags.
pub fn load_config_with_overrides(
    args: &GlobalArgs,
) -> Result<ConsoleConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        ConsoleConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        ConsoleConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(ref url) = args.backend_url {
        config.backend.url = url.clone();
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration and initialize tracing.
///
/// Tracing may already be installed (tests run several commands in one
/// process); that is not an error.
pub fn prepare(args: &GlobalArgs) -> Result<ConsoleConfig, Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(args)?;
    if let Err(e) = crate::logging::init_tracing(&config.logging) {
        tracing::debug!(error = %e, "Tracing already initialized");
    }
    Ok(config)
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let global = cli.global;

    match cli.command {
        Commands::Watch(args) => watch::run_watch(&global, &args).await,
        Commands::Status(args) => system::run_status(&global, &args).await,
        Commands::Start => system::run_control(&global, crate::api::ControlAction::Start).await,
        Commands::Stop => system::run_control(&global, crate::api::ControlAction::Stop).await,
        Commands::AcknowledgeEmergency(args) => {
            system::run_acknowledge_emergency(&global, &args).await
        }
        Commands::Health(args) => panels::run_health(&global, &args).await,
        Commands::Safety(args) => panels::run_safety(&global, &args).await,
        Commands::Reminders(args) => panels::run_reminders(&global, &args).await,
        Commands::Ack(args) => panels::run_ack(&global, &args).await,
        Commands::Settings(cmd) => settings::run_settings(&global, &cmd),
        Commands::Config(ConfigCommands::Init(args)) => handle_config_init(&args),
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    }
}
