//! List command implementation

use crate::cli::context::CliContext;
use anyhow::Result;
use bytesize::ByteSize;
use colored::Colorize;

/// Execute the list command
pub fn execute(json: bool) -> Result<()> {
    let store = CliContext::open_store()?;
    let files = store.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    if files.is_empty() {
        if !CliContext::is_quiet() {
            println!("{}", "No files stored".yellow());
        }
        return Ok(());
    }

    for file in &files {
        println!(
            "{}  {} segment{}, {}",
            file.name.bold(),
            file.segments,
            if file.segments == 1 { "" } else { "s" },
            ByteSize::b(file.total_bytes)
        );
    }

    Ok(())
}
