//! CLI command implementations

pub mod config;
pub mod delete;
pub mod download;
pub mod list;
pub mod prove;
pub mod root;
pub mod upload;
pub mod verify;

use crate::cli::context::CliContext;

/// Print a status line unless --quiet is in effect
pub(crate) fn status(message: impl std::fmt::Display) {
    if !CliContext::is_quiet() {
        eprintln!("{}", message);
    }
}
