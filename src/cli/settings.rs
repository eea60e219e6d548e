//! Settings command handlers
//!
//! These never touch the backend; only the preference file is read and
//! written.

use crate::cli::{output, GlobalArgs, SettingsCommands, SettingsListArgs, SettingsSetArgs};
use crate::settings::{lookup, Settings, SettingsError, ALL_SAVED};
use colored::Colorize;

/// Handle `guardian settings ...`
pub fn run_settings(
    global: &GlobalArgs,
    cmd: &SettingsCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::prepare(global)?;
    let mut settings = Settings::open(&config.settings.path)?;

    match cmd {
        SettingsCommands::List(args) => {
            println!("{}", handle_settings_list(&settings, args)?);
        }
        SettingsCommands::Get(args) => {
            println!("{}", settings.get(&args.key)?.value);
        }
        SettingsCommands::Set(args) => {
            let message = handle_settings_set(&mut settings, args)?;
            println!("{} {}", "✓".green(), message);
        }
        SettingsCommands::Reset => {
            let removed = settings.reset()?;
            println!("{} Reset {} stored settings to defaults", "✓".green(), removed);
        }
    }

    Ok(())
}

pub fn handle_settings_list<S: crate::settings::KeyValueStore>(
    settings: &Settings<S>,
    args: &SettingsListArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let values: Vec<_> = settings
        .load()
        .into_iter()
        .filter(|v| args.category.map_or(true, |c| v.category == c))
        .collect();

    if args.json {
        Ok(output::to_json(&values)?)
    } else {
        Ok(output::format_settings(&values))
    }
}

/// Save one key, or several keys in one write.
///
/// Keys from a single category get that category's confirmation, mixed
/// categories the full-save confirmation.
pub fn handle_settings_set<S: crate::settings::KeyValueStore>(
    settings: &mut Settings<S>,
    args: &SettingsSetArgs,
) -> Result<&'static str, Box<dyn std::error::Error>> {
    let mut pairs = vec![(args.key.as_str(), args.value.as_str())];
    for pair in &args.more {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", pair))?;
        pairs.push((key, value));
    }

    let mut categories = Vec::new();
    for (key, _) in &pairs {
        let def = lookup(key).ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        if !categories.contains(&def.category) {
            categories.push(def.category);
        }
    }

    let message = match categories.as_slice() {
        [category] => settings.save_category(*category, &pairs)?,
        _ => {
            settings.save_all(&pairs)?;
            ALL_SAVED
        }
    };
    Ok(message)
}
