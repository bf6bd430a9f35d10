//! Configuration management for segstore
//!
//! Global settings live in ~/.segstore/config.toml and resolve into the
//! [`StoreConfig`] a segment store runs with.

pub mod global_config;
pub mod store_config;

// Re-export commonly used items
pub use global_config::{ConfigKey, ConfigValue, GlobalConfig};
pub use store_config::StoreConfig;
