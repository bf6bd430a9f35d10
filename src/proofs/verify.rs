//! Proof verification
//!
//! Verification only needs the trusted root and the proof path; it never
//! touches a tree. This lets clients check a proof they received without
//! holding any other segment.

use crate::core::{error::*, hash::*, types::*};
use crate::proofs::proof::{ProofElement, ProofPosition};

/// Recompute the root implied by `proof` and compare it with `trusted_root`
pub fn verify_proof(trusted_root: &RootHash, proof: &[ProofElement]) -> Result<bool> {
    Ok(compute_root(proof)? == *trusted_root)
}

/// Fold a proof path into the root it commits to
pub fn compute_root(proof: &[ProofElement]) -> Result<RootHash> {
    let (first, rest) = proof
        .split_first()
        .ok_or_else(|| SegstoreError::malformed_proof("proof has no elements"))?;

    let root = rest.iter().fold(first.hash, |current, element| match element.position {
        ProofPosition::Right => hash_pair(&current, &element.hash),
        ProofPosition::Left => hash_pair(&element.hash, &current),
    });

    Ok(root)
}

/// Verify a proof whose digests arrive as raw byte strings
pub fn verify_raw_proof(trusted_root: &[u8], proof: &[(Vec<u8>, ProofPosition)]) -> Result<bool> {
    let root = Hash::from_slice(trusted_root).ok_or_else(|| {
        SegstoreError::malformed_proof(format!(
            "trusted root is {} bytes, expected {}",
            trusted_root.len(),
            HASH_SIZE
        ))
    })?;

    let elements = proof
        .iter()
        .map(|(bytes, position)| ProofElement::from_raw(bytes, *position))
        .collect::<Result<Vec<_>>>()?;

    verify_proof(&root, &elements)
}
