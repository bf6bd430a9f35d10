//! Configuration command implementation

use crate::cli::commands::status;
use crate::cli::context::CliContext;
use crate::cli::ConfigAction;
use crate::config::{ConfigKey, ConfigValue};
use anyhow::{anyhow, Result};
use colored::Colorize;

/// Execute the config command
pub fn execute(action: ConfigAction) -> Result<()> {
    let config_path = CliContext::config_path()?;
    let mut config = CliContext::load_config()?;

    match action {
        ConfigAction::List => {
            let entries = config.list();
            if entries.is_empty() {
                status("No configuration values set".yellow());
            }
            for (key, value) in entries {
                println!("{} = {}", key, value);
            }
        },
        ConfigAction::Get { key } => {
            let value = config
                .get(parse_key(&key)?)
                .ok_or_else(|| anyhow!("Configuration key '{}' is not set", key))?;
            println!("{}", value);
        },
        ConfigAction::Set { key, value } => {
            config.set(parse_key(&key)?, ConfigValue::parse(&value))?;
            config.save_to(&config_path)?;
            status(format!("{} {} = {}", "✓".green(), key.bold(), value.cyan()));
        },
        ConfigAction::Unset { key } => {
            config.unset(parse_key(&key)?);
            config.save_to(&config_path)?;
            status(format!("{} Unset {}", "✓".green(), key.bold()));
        },
        ConfigAction::Path => {
            println!("{}", config_path.display());
        },
    }

    Ok(())
}

fn parse_key(key: &str) -> Result<ConfigKey> {
    ConfigKey::from_str(key).ok_or_else(|| anyhow!("Invalid configuration key: {}", key))
}
