//! Core types and utilities for segstore
//!
//! This module contains the fundamental data types, error handling,
//! and hash primitives used throughout the system.

pub mod error;
pub mod hash;
pub mod types;

// Re-export commonly used items
pub use error::{Result, SegstoreError};
pub use hash::{hash_pair, sha256};
pub use types::{Hash, LeafHash, RecordFormat, RootHash, HASH_SIZE};
