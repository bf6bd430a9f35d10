//! Resolved settings for a segment store

use crate::core::types::RecordFormat;
use std::path::PathBuf;

/// Default directory holding uploaded files
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";

/// Default upper bound on a single segment (10 MiB)
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 << 20;

/// Default name of the tree record inside each file directory
pub const DEFAULT_TREE_FILE_NAME: &str = "merkleTree.json";

/// Settings a [`SegmentStore`](crate::storage::SegmentStore) runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding one subdirectory per uploaded file
    pub uploads_dir: PathBuf,
    /// Largest accepted segment in bytes
    pub max_upload_size: u64,
    /// File name of the tree record inside each file directory
    pub tree_file_name: String,
    /// Encoding of tree records
    pub record_format: RecordFormat,
    /// Verify each generated proof before returning it
    pub self_verify: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            tree_file_name: DEFAULT_TREE_FILE_NAME.to_string(),
            record_format: RecordFormat::Json,
            self_verify: true,
        }
    }
}

impl StoreConfig {
    /// Default settings rooted at `uploads_dir`
    pub fn with_uploads_dir(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            ..Self::default()
        }
    }
}
