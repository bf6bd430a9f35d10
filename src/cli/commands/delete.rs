//! Delete command implementation

use crate::cli::commands::status;
use crate::cli::context::CliContext;
use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::Confirm;
use std::io::IsTerminal;

/// Execute the delete command
pub fn execute(file: String) -> Result<()> {
    let store = CliContext::open_store()?;

    if !CliContext::is_yes() {
        if !std::io::stdin().is_terminal() {
            bail!("Refusing to delete '{}' without --yes in non-interactive mode", file);
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete '{}' and all of its segments?", file))
            .default(false)
            .interact()?;
        if !confirmed {
            status("Aborted".yellow());
            return Ok(());
        }
    }

    store.delete(&file)?;
    status(format!("{} Deleted {}", "✓".green(), file.bold()));

    Ok(())
}
