//! Merkle proof system for segstore
//!
//! This module builds hash trees over uploaded segments, derives membership
//! proofs for individual segments and verifies them against a trusted root.

pub mod merkle;
pub mod proof;
pub mod response;
pub mod verify;

// Re-export commonly used items
pub use merkle::MerkleTree;
pub use proof::{resolve_leaf_index, Proof, ProofElement, ProofPosition};
pub use response::ProofResponse;
pub use verify::{compute_root, verify_proof, verify_raw_proof};
