//! Error types for segstore

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for segstore operations
#[derive(Error, Debug)]
pub enum SegstoreError {
    /// Merkle tree errors
    #[error("Merkle tree has no leaves")]
    EmptyTree,

    #[error("Merkle tree is not constructed, build it first")]
    TreeNotConstructed,

    #[error("Leaf index {index} out of range for {leaf_count} leaves")]
    IndexOutOfRange { index: i64, leaf_count: usize },

    /// Proof-related errors
    #[error("Empty or malformed proof: {reason}")]
    EmptyOrMalformedProof { reason: String },

    #[error("Proof verification failed")]
    ProofVerificationFailed,

    /// Persistence errors
    #[error("Storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt tree record at {path}: {reason}")]
    CorruptRecord { path: PathBuf, reason: String },

    /// Segment-related errors
    #[error("File not found: {name}")]
    FileNotFound { name: String },

    #[error("Segment not found: {file}/{segment}")]
    SegmentNotFound { file: String, segment: String },

    #[error("Segment already exists: {file}/{segment}, rename it or delete the file first")]
    SegmentExists { file: String, segment: String },

    #[error("Segment too large: {size} bytes exceeds limit of {limit} bytes")]
    SegmentTooLarge { size: u64, limit: u64 },

    #[error("Invalid name: {name} ({reason})")]
    InvalidName { name: String, reason: String },

    #[error("Invalid segment index: {input}")]
    InvalidSegmentIndex { input: String },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    ConfigurationError { reason: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    /// Hex encoding/decoding errors
    #[error("Hex encoding error: {0}")]
    HexError(#[from] hex::FromHexError),
}

impl SegstoreError {
    /// Create a new index out of range error
    pub fn index_out_of_range(index: i64, leaf_count: usize) -> Self {
        Self::IndexOutOfRange { index, leaf_count }
    }

    /// Create a new malformed proof error
    pub fn malformed_proof(reason: impl Into<String>) -> Self {
        Self::EmptyOrMalformedProof {
            reason: reason.into(),
        }
    }

    /// Create a new storage unavailable error
    pub fn storage_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a new corrupt record error
    pub fn corrupt_record(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new file not found error
    pub fn file_not_found(name: impl Into<String>) -> Self {
        Self::FileNotFound { name: name.into() }
    }

    /// Create a new invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            reason: reason.into(),
        }
    }
}

/// Result type alias for segstore operations
pub type Result<T> = std::result::Result<T, SegstoreError>;
