//! Global configuration management
//!
//! Provides configuration stored in ~/.segstore/config.toml

use crate::config::store_config::StoreConfig;
use crate::core::error::{Result, SegstoreError};
use crate::core::types::RecordFormat;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global configuration for segstore
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Proof configuration
    #[serde(default)]
    pub proofs: ProofConfig,
}

/// Where and how segments and tree records are stored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one subdirectory per uploaded file
    pub uploads_dir: Option<PathBuf>,
    /// Largest accepted segment in bytes
    pub max_upload_size: Option<u64>,
    /// File name of the tree record inside each file directory
    pub tree_file_name: Option<String>,
    /// Encoding of tree records
    pub record_format: Option<RecordFormat>,
}

/// Proof generation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProofConfig {
    /// Verify each generated proof against the root before returning it
    pub self_verify: Option<bool>,
}

/// Configuration value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    Number(i64),
    Boolean(bool),
}

impl ConfigValue {
    /// Interpret a command-line string as the most specific value type
    pub fn parse(raw: &str) -> Self {
        if let Ok(b) = raw.parse::<bool>() {
            ConfigValue::Boolean(b)
        } else if let Ok(n) = raw.parse::<i64>() {
            ConfigValue::Number(n)
        } else {
            ConfigValue::String(raw.to_string())
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::Number(n) => write!(f, "{}", n),
            ConfigValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Configuration key for setting values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    StorageUploadsDir,
    StorageMaxUploadSize,
    StorageTreeFileName,
    StorageRecordFormat,
    ProofsSelfVerify,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::StorageUploadsDir,
        ConfigKey::StorageMaxUploadSize,
        ConfigKey::StorageTreeFileName,
        ConfigKey::StorageRecordFormat,
        ConfigKey::ProofsSelfVerify,
    ];

    pub fn from_str(key: &str) -> Option<Self> {
        match key {
            "storage.uploads_dir" => Some(ConfigKey::StorageUploadsDir),
            "storage.max_upload_size" => Some(ConfigKey::StorageMaxUploadSize),
            "storage.tree_file_name" => Some(ConfigKey::StorageTreeFileName),
            "storage.record_format" => Some(ConfigKey::StorageRecordFormat),
            "proofs.self_verify" => Some(ConfigKey::ProofsSelfVerify),
            _ => None,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            ConfigKey::StorageUploadsDir => "storage.uploads_dir",
            ConfigKey::StorageMaxUploadSize => "storage.max_upload_size",
            ConfigKey::StorageTreeFileName => "storage.tree_file_name",
            ConfigKey::StorageRecordFormat => "storage.record_format",
            ConfigKey::ProofsSelfVerify => "proofs.self_verify",
        }
    }
}

impl GlobalConfig {
    /// Load global configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load configuration from `config_path`, falling back to defaults when
    /// the file does not exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        toml::from_str(&content).map_err(|e| {
            SegstoreError::configuration(format!("Failed to parse config: {}", e))
        })
    }

    /// Save global configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    /// Save configuration to `config_path`
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            SegstoreError::configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Get the path to the global configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let user_dirs = UserDirs::new().ok_or(SegstoreError::HomeDirectoryNotFound)?;
        Ok(user_dirs.home_dir().join(".segstore").join("config.toml"))
    }

    /// Get a configuration value
    pub fn get(&self, key: ConfigKey) -> Option<ConfigValue> {
        match key {
            ConfigKey::StorageUploadsDir => self
                .storage
                .uploads_dir
                .as_ref()
                .map(|p| ConfigValue::String(p.display().to_string())),
            ConfigKey::StorageMaxUploadSize => self
                .storage
                .max_upload_size
                .map(|n| ConfigValue::Number(n as i64)),
            ConfigKey::StorageTreeFileName => self
                .storage
                .tree_file_name
                .as_ref()
                .map(|s| ConfigValue::String(s.clone())),
            ConfigKey::StorageRecordFormat => self
                .storage
                .record_format
                .map(|f| ConfigValue::String(f.name().to_string())),
            ConfigKey::ProofsSelfVerify => self.proofs.self_verify.map(ConfigValue::Boolean),
        }
    }

    /// Set a configuration value
    pub fn set(&mut self, key: ConfigKey, value: ConfigValue) -> Result<()> {
        let name = key.to_str();
        match (key, value) {
            (ConfigKey::StorageUploadsDir, ConfigValue::String(dir)) => {
                self.storage.uploads_dir = Some(PathBuf::from(dir));
            },
            (ConfigKey::StorageMaxUploadSize, ConfigValue::Number(size)) if size > 0 => {
                self.storage.max_upload_size = Some(size as u64);
            },
            (ConfigKey::StorageTreeFileName, ConfigValue::String(file_name)) => {
                if file_name.is_empty() || file_name.contains(['/', '\\']) {
                    return Err(SegstoreError::configuration(format!(
                        "{} must be a plain file name",
                        name
                    )));
                }
                self.storage.tree_file_name = Some(file_name);
            },
            (ConfigKey::StorageRecordFormat, ConfigValue::String(format)) => {
                let format = RecordFormat::from_name(&format).ok_or_else(|| {
                    SegstoreError::configuration(format!("{} must be json or bincode", name))
                })?;
                self.storage.record_format = Some(format);
            },
            (ConfigKey::ProofsSelfVerify, ConfigValue::Boolean(enabled)) => {
                self.proofs.self_verify = Some(enabled);
            },
            (ConfigKey::StorageMaxUploadSize, _) => {
                return Err(SegstoreError::configuration(format!(
                    "{} must be a positive number",
                    name
                )));
            },
            (ConfigKey::ProofsSelfVerify, _) => {
                return Err(SegstoreError::configuration(format!("{} must be a boolean", name)));
            },
            (_, _) => {
                return Err(SegstoreError::configuration(format!("{} must be a string", name)));
            },
        }
        Ok(())
    }

    /// Unset a configuration value
    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::StorageUploadsDir => self.storage.uploads_dir = None,
            ConfigKey::StorageMaxUploadSize => self.storage.max_upload_size = None,
            ConfigKey::StorageTreeFileName => self.storage.tree_file_name = None,
            ConfigKey::StorageRecordFormat => self.storage.record_format = None,
            ConfigKey::ProofsSelfVerify => self.proofs.self_verify = None,
        }
    }

    /// List all explicitly set configuration values, sorted by key
    pub fn list(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = ConfigKey::ALL
            .iter()
            .filter_map(|key| self.get(*key).map(|v| (key.to_str().to_string(), v.to_string())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Resolve the settings a segment store runs with
    pub fn store_config(&self) -> StoreConfig {
        let defaults = StoreConfig::default();
        StoreConfig {
            uploads_dir: self.storage.uploads_dir.clone().unwrap_or(defaults.uploads_dir),
            max_upload_size: self.storage.max_upload_size.unwrap_or(defaults.max_upload_size),
            tree_file_name: self
                .storage
                .tree_file_name
                .clone()
                .unwrap_or(defaults.tree_file_name),
            record_format: self.storage.record_format.unwrap_or(defaults.record_format),
            self_verify: self.proofs.self_verify.unwrap_or(defaults.self_verify),
        }
    }
}
