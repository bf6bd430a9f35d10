//! Download command implementation

use crate::cli::commands::status;
use crate::cli::context::CliContext;
use anyhow::{Context, Result};
use bytesize::ByteSize;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

/// Execute the download command
pub fn execute(file: String, segment: String, output: Option<PathBuf>) -> Result<()> {
    let store = CliContext::open_store()?;
    let data = store.download(&file, &segment)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            status(format!(
                "{} Wrote {} to {}",
                "✓".green(),
                ByteSize::b(data.len() as u64),
                path.display().to_string().cyan()
            ));
        },
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        },
    }

    Ok(())
}
