//! Root command implementation

use crate::cli::context::CliContext;
use anyhow::Result;

/// Execute the root command
pub fn execute(file: String) -> Result<()> {
    let store = CliContext::open_store()?;
    let root = store.root(&file)?;
    println!("{}", root.to_hex());
    Ok(())
}
