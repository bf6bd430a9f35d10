//! Verify command implementation

use crate::cli::commands::status;
use crate::core::types::Hash;
use crate::proofs::{compute_root, ProofResponse};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::Read;
use std::path::PathBuf;

/// Execute the verify command
pub fn execute(proof: PathBuf, root: Option<String>, steps: bool) -> Result<()> {
    let json = if proof.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(&proof)
            .with_context(|| format!("Failed to read proof {}", proof.display()))?
    };

    let response = ProofResponse::from_json(&json)?;
    let trusted_root = match root {
        Some(hex) => Hash::from_hex(hex.trim()).context("Invalid root hash")?,
        None => response.root,
    };

    if steps {
        for (i, element) in response.proof.iter().enumerate() {
            status(format!("  [{}] {:?} {}", i, element.position, element.hash.to_hex()));
        }
        status(format!("  computed root: {}", compute_root(&response.proof)?.to_hex()));
    }

    if response.verify_against(&trusted_root)? {
        status(format!(
            "{} Proof verified: {} leaf {} under root {}",
            "✓".green(),
            response.file.bold(),
            response.leaf_index,
            trusted_root.to_hex().cyan()
        ));
        Ok(())
    } else {
        bail!(
            "Proof verification failed: {} leaf {} does not reach root {}",
            response.file,
            response.leaf_index,
            trusted_root.to_hex()
        )
    }
}
