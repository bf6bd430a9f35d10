//! segstore - A file-segment store with merkle membership proofs
//!
//! Clients upload named segments of a named file. Every accepted segment
//! becomes the next leaf of a SHA-256 merkle tree kept alongside the file,
//! and the store can later prove that a given segment belongs to the set of
//! uploaded segments without the client holding any of the others.
//!
//! # Core Features
//!
//! - **Merkle Trees**: Leveled trees where an odd final node is paired with itself
//! - **Membership Proofs**: Authentication paths checkable with only the root
//! - **Persistent Records**: Tree state survives across independent requests
//! - **Per-File Locking**: Concurrent uploads to one file never drop a leaf
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use segstore::SegmentStore;
//!
//! let store = SegmentStore::open_at("./uploads")?;
//!
//! store.upload("report.pdf", "part-0", b"first segment")?;
//! store.upload("report.pdf", "part-1", b"second segment")?;
//!
//! let response = store.prove("report.pdf", "1")?;
//! assert!(response.verify()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod proofs;
pub mod storage;

// Re-export commonly used types
pub use crate::core::{
    error::{Result, SegstoreError},
    types::{Hash, RecordFormat, RootHash},
};

pub use config::{GlobalConfig, StoreConfig};

pub use proofs::{
    merkle::MerkleTree,
    proof::{Proof, ProofElement, ProofPosition},
    response::ProofResponse,
    verify::verify_proof,
};

pub use storage::{store::SegmentStore, tree_file::TreeFile};

/// Current version of segstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
