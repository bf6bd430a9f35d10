//! Storage layer for segstore
//!
//! This module handles segment files on disk, the persisted tree records
//! and the per-file locking that keeps concurrent uploads from losing leaves.

pub mod locks;
pub mod store;
pub mod tree_file;

// Re-export commonly used items
pub use locks::{FileLocks, LockFile};
pub use store::{FileSummary, SegmentStore, UploadReceipt};
pub use tree_file::TreeFile;
