//! Prove command implementation

use crate::cli::commands::status;
use crate::cli::context::CliContext;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Execute the prove command
pub fn execute(
    file: String,
    segment: String,
    output: Option<PathBuf>,
    no_verify: bool,
) -> Result<()> {
    let mut config = CliContext::store_config()?;
    if no_verify {
        config.self_verify = false;
    }
    let store = crate::storage::SegmentStore::open(config)?;

    let response = store.prove(&file, &segment)?;
    let json = response.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", json))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            status(format!(
                "{} Proof for {} leaf {} written to {}",
                "✓".green(),
                file.bold(),
                response.leaf_index,
                path.display().to_string().cyan()
            ));
        },
        None => println!("{}", json),
    }

    if CliContext::is_verbose() {
        status(format!("  {}: {}", "Root".bold(), response.root.to_hex().cyan()));
        status(format!("  {}: {}", "Steps".bold(), response.proof.len()));
    }

    Ok(())
}
