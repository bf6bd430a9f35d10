//! Upload command implementation

use crate::cli::context::CliContext;
use anyhow::{Context, Result};
use bytesize::ByteSize;
use colored::Colorize;
use std::path::PathBuf;

/// Execute the upload command
pub fn execute(file: String, path: PathBuf, name: Option<String>, json: bool) -> Result<()> {
    let segment = match name {
        Some(name) => name,
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("Cannot derive a segment name from {}", path.display()))?,
    };

    let data = std::fs::read(&path)
        .with_context(|| format!("Failed to read segment {}", path.display()))?;

    let store = CliContext::open_store()?;
    let receipt = store.upload(&file, &segment, &data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else if !CliContext::is_quiet() {
        println!(
            "{} Uploaded {} ({})",
            "✓".green(),
            format!("{}/{}", receipt.file, receipt.segment).bold(),
            ByteSize::b(receipt.size)
        );
        println!("  {}: {}", "Leaf index".bold(), receipt.leaf_index.to_string().cyan());
        if CliContext::is_verbose() {
            println!("  {}: {}", "Stored at".bold(), receipt.path.display());
        }
    }

    Ok(())
}
