//! Proof generation

use crate::core::{error::*, types::*};
use crate::proofs::merkle::MerkleTree;
use serde::{Deserialize, Serialize};

/// Position of a proof digest relative to the running hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofPosition {
    Left,
    Right,
}

/// A single element in a merkle proof path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofElement {
    /// Digest consumed at this step
    pub hash: Hash,
    /// Operand slot the digest takes when recombining
    pub position: ProofPosition,
}

impl ProofElement {
    pub fn new(hash: Hash, position: ProofPosition) -> Self {
        Self { hash, position }
    }

    /// Build an element from raw digest bytes, rejecting anything that is
    /// not exactly one digest wide
    pub fn from_raw(bytes: &[u8], position: ProofPosition) -> Result<Self> {
        let hash = Hash::from_slice(bytes).ok_or_else(|| {
            SegstoreError::malformed_proof(format!(
                "digest is {} bytes, expected {}",
                bytes.len(),
                HASH_SIZE
            ))
        })?;
        Ok(Self::new(hash, position))
    }
}

/// Ordered proof path. The first element carries the leaf digest itself,
/// the rest are siblings from the leaf level upwards.
pub type Proof = Vec<ProofElement>;

impl MerkleTree {
    /// Generate a proof for a specific leaf index
    pub fn generate_proof(&self, leaf_index: usize) -> Result<Proof> {
        let leaf_count = self.leaf_count();
        if leaf_count == 0 {
            return Err(SegstoreError::EmptyTree);
        }
        if leaf_index >= leaf_count {
            return Err(SegstoreError::index_out_of_range(
                i64::try_from(leaf_index).unwrap_or(i64::MAX),
                leaf_count,
            ));
        }
        if !self.is_built() {
            return Err(SegstoreError::TreeNotConstructed);
        }

        let levels = self.levels();
        let mut proof = Vec::with_capacity(levels.len());
        proof.push(ProofElement::new(levels[0][leaf_index], ProofPosition::Left));

        let mut index = leaf_index;
        for nodes in &levels[..levels.len() - 1] {
            let element = if index % 2 == 0 {
                match nodes.get(index + 1) {
                    Some(sibling) => ProofElement::new(*sibling, ProofPosition::Right),
                    // Lone final node was combined with itself
                    None => ProofElement::new(nodes[index], ProofPosition::Left),
                }
            } else {
                ProofElement::new(nodes[index - 1], ProofPosition::Left)
            };
            proof.push(element);
            index /= 2;
        }

        Ok(proof)
    }

    /// Generate a proof for a user-facing segment identifier
    pub fn generate_proof_for_segment(&self, segment_id: &str) -> Result<(usize, Proof)> {
        let index = resolve_leaf_index(segment_id, self.leaf_count())?;
        Ok((index, self.generate_proof(index)?))
    }
}

/// Parse a segment identifier into a leaf index within `leaf_count`
pub fn resolve_leaf_index(segment_id: &str, leaf_count: usize) -> Result<usize> {
    let trimmed = segment_id.trim();
    let index: i64 = trimmed
        .parse()
        .map_err(|_| SegstoreError::InvalidSegmentIndex {
            input: segment_id.to_string(),
        })?;

    usize::try_from(index)
        .ok()
        .filter(|i| *i < leaf_count)
        .ok_or_else(|| SegstoreError::index_out_of_range(index, leaf_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::*;

    #[test]
    fn test_proof_for_lone_leaf_duplicates_itself() {
        let mut tree = MerkleTree::from_leaves([b"a", b"b", b"c"]);
        tree.build().unwrap();

        let proof = tree.generate_proof(2).unwrap();
        let (a, b, c) = (sha256(b"a"), sha256(b"b"), sha256(b"c"));

        assert_eq!(
            proof,
            vec![
                ProofElement::new(c, ProofPosition::Left),
                ProofElement::new(c, ProofPosition::Left),
                ProofElement::new(hash_pair(&a, &b), ProofPosition::Left),
            ]
        );
    }

    #[test]
    fn test_proof_orientation_for_even_and_odd_indices() {
        let mut tree = MerkleTree::from_leaves([b"a", b"b", b"c", b"d"]);
        tree.build().unwrap();
        let (a, b, c, d) = (sha256(b"a"), sha256(b"b"), sha256(b"c"), sha256(b"d"));

        let proof = tree.generate_proof(0).unwrap();
        assert_eq!(proof[1], ProofElement::new(b, ProofPosition::Right));
        assert_eq!(proof[2], ProofElement::new(hash_pair(&c, &d), ProofPosition::Right));

        let proof = tree.generate_proof(3).unwrap();
        assert_eq!(proof[0].hash, d);
        assert_eq!(proof[1], ProofElement::new(c, ProofPosition::Left));
        assert_eq!(proof[2], ProofElement::new(hash_pair(&a, &b), ProofPosition::Left));
    }

    #[test]
    fn test_proof_length() {
        let mut tree = MerkleTree::from_leaves((0..9u8).map(|i| [i]));
        tree.build().unwrap();
        for i in 0..9 {
            assert_eq!(tree.generate_proof(i).unwrap().len(), 1 + 4);
        }
    }

    #[test]
    fn test_single_leaf_proof_is_leaf_only() {
        let mut tree = MerkleTree::from_leaves([b"solo"]);
        tree.build().unwrap();
        let proof = tree.generate_proof(0).unwrap();
        assert_eq!(proof.len(), 1);
        assert_eq!(proof[0].hash, sha256(b"solo"));
    }

    #[test]
    fn test_proof_errors() {
        let tree = MerkleTree::new();
        assert!(matches!(tree.generate_proof(0), Err(SegstoreError::EmptyTree)));

        let mut tree = MerkleTree::from_leaves([b"a", b"b"]);
        assert!(matches!(
            tree.generate_proof(0),
            Err(SegstoreError::TreeNotConstructed)
        ));

        tree.build().unwrap();
        assert!(matches!(
            tree.generate_proof(2),
            Err(SegstoreError::IndexOutOfRange { index: 2, leaf_count: 2 })
        ));
    }

    #[test]
    fn test_resolve_leaf_index() {
        assert_eq!(resolve_leaf_index("0", 3).unwrap(), 0);
        assert_eq!(resolve_leaf_index(" 2 ", 3).unwrap(), 2);
        assert!(matches!(
            resolve_leaf_index("-1", 3),
            Err(SegstoreError::IndexOutOfRange { index: -1, leaf_count: 3 })
        ));
        assert!(matches!(
            resolve_leaf_index("3", 3),
            Err(SegstoreError::IndexOutOfRange { index: 3, .. })
        ));
        assert!(matches!(
            resolve_leaf_index("part-1", 3),
            Err(SegstoreError::InvalidSegmentIndex { .. })
        ));
    }

    #[test]
    fn test_from_raw_rejects_wrong_width() {
        assert!(ProofElement::from_raw(&[0u8; 32], ProofPosition::Right).is_ok());
        assert!(matches!(
            ProofElement::from_raw(&[0u8; 20], ProofPosition::Right),
            Err(SegstoreError::EmptyOrMalformedProof { .. })
        ));
    }
}
