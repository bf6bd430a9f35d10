//! CLI context for storing global options during command execution

use crate::config::{GlobalConfig, StoreConfig};
use crate::core::error::Result;
use crate::storage::SegmentStore;
use std::cell::RefCell;
use std::path::PathBuf;

thread_local! {
    static CLI_CONTEXT: RefCell<Option<CliContext>> = const { RefCell::new(None) };
}

/// Context containing global CLI options
#[derive(Debug, Clone, Default)]
pub struct CliContext {
    pub verbose: bool,
    pub quiet: bool,
    pub yes: bool,
    pub store: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl CliContext {
    /// Set the global CLI context for the current thread
    pub fn set(context: CliContext) {
        CLI_CONTEXT.with(|c| {
            *c.borrow_mut() = Some(context);
        });
    }

    /// Get the current CLI context
    pub fn get() -> CliContext {
        CLI_CONTEXT.with(|c| c.borrow().clone()).unwrap_or_default()
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose() -> bool {
        Self::get().verbose
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet() -> bool {
        Self::get().quiet
    }

    /// Check if auto-answer yes is enabled
    pub fn is_yes() -> bool {
        Self::get().yes
    }

    /// Path of the configuration file in effect
    pub fn config_path() -> Result<PathBuf> {
        match Self::get().config {
            Some(path) => Ok(path),
            None => GlobalConfig::get_config_path(),
        }
    }

    /// Load configuration from the file in effect
    pub fn load_config() -> Result<GlobalConfig> {
        GlobalConfig::load_from(&Self::config_path()?)
    }

    /// Resolve store settings, applying the --store override
    pub fn store_config() -> Result<StoreConfig> {
        let mut config = Self::load_config()?.store_config();
        if let Some(dir) = Self::get().store {
            config.uploads_dir = dir;
        }
        Ok(config)
    }

    /// Open the segment store selected by configuration and flags
    pub fn open_store() -> Result<SegmentStore> {
        SegmentStore::open(Self::store_config()?)
    }
}
