//! Merkle tree implementation
//!
//! The tree is stored as levels of digests. Level 0 holds the leaves in
//! insertion order and every level above it is derived from the one below by
//! hashing adjacent pairs. A final unpaired node is combined with itself.
//! Positions, not pointers, tie a node to its parent: the parent of slot `i`
//! at level `k` is slot `i / 2` at level `k + 1`.

use crate::core::{error::*, hash::*, types::*};
use serde::{Deserialize, Serialize};

/// Merkle tree over uploaded segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleTree {
    /// All levels of the tree (leaves at index 0)
    levels: Vec<Vec<Hash>>,
    /// Whether the upper levels have been derived from the current leaves
    built: bool,
}

impl Default for MerkleTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MerkleTree {
    /// Create an empty, unbuilt tree
    pub fn new() -> Self {
        Self {
            levels: vec![Vec::new()],
            built: false,
        }
    }

    /// Create an unbuilt tree holding one leaf per data item
    pub fn from_leaves<I, D>(items: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: AsRef<[u8]>,
    {
        let mut tree = Self::new();
        for item in items {
            tree.add_leaf(item.as_ref());
        }
        tree
    }

    /// Hash `data` and append it as the next leaf, returning its index.
    ///
    /// Upper levels are discarded and the tree must be built again before
    /// a root or proof can be taken from it.
    pub fn add_leaf(&mut self, data: &[u8]) -> usize {
        self.add_leaf_hash(sha256(data))
    }

    /// Append an already computed leaf digest, returning its index
    pub fn add_leaf_hash(&mut self, hash: LeafHash) -> usize {
        self.levels.truncate(1);
        if self.levels.is_empty() {
            self.levels.push(Vec::new());
        }
        self.levels[0].push(hash);
        self.built = false;
        self.levels[0].len() - 1
    }

    /// Rebuild every level above the leaves and return the root
    pub fn build(&mut self) -> Result<RootHash> {
        if self.leaf_count() == 0 {
            return Err(SegstoreError::EmptyTree);
        }

        self.levels.truncate(1);
        while let Some(current) = self.levels.last().filter(|level| level.len() > 1) {
            let next: Vec<Hash> = current
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    let right = pair.get(1).unwrap_or(left);
                    hash_pair(left, right)
                })
                .collect();
            self.levels.push(next);
        }

        self.built = true;
        self.root()
    }

    /// Root of a built tree
    pub fn root(&self) -> Result<RootHash> {
        if self.leaf_count() == 0 {
            return Err(SegstoreError::EmptyTree);
        }
        if !self.built {
            return Err(SegstoreError::TreeNotConstructed);
        }
        match self.levels.last().map(Vec::as_slice) {
            Some([root]) => Ok(*root),
            _ => Err(SegstoreError::TreeNotConstructed),
        }
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Whether no leaf has been added yet
    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }

    /// Whether the upper levels reflect the current leaves
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Leaf digest at `index`
    pub fn leaf(&self, index: usize) -> Option<&LeafHash> {
        self.levels.first().and_then(|leaves| leaves.get(index))
    }

    /// Leaf digests in insertion order
    pub fn leaves(&self) -> &[LeafHash] {
        self.levels.first().map_or(&[], Vec::as_slice)
    }

    /// All levels, leaves first
    pub fn levels(&self) -> &[Vec<Hash>] {
        &self.levels
    }

    /// Number of levels currently held
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// Check the positional invariants of a tree that came from outside
    /// this process, returning a description of the first violation.
    pub(crate) fn check_structure(&self) -> std::result::Result<(), String> {
        for (k, pair) in self.levels.windows(2).enumerate() {
            let (below, above) = (&pair[0], &pair[1]);
            if below.len() <= 1 {
                return Err(format!("level {} has {} nodes but a level above it", k, below.len()));
            }
            let expected = below.len().div_ceil(2);
            if above.len() != expected {
                return Err(format!(
                    "level {} has {} nodes, expected {}",
                    k + 1,
                    above.len(),
                    expected
                ));
            }
        }

        if self.built {
            if self.leaf_count() == 0 {
                return Err("tree marked built without leaves".to_string());
            }
            if self.levels.last().map(Vec::len) != Some(1) {
                return Err("tree marked built but top level is not a single root".to_string());
            }
        }

        Ok(())
    }

    /// Restore the leaf level after deserializing a record that held none
    pub(crate) fn normalize(&mut self) {
        if self.levels.is_empty() {
            self.levels.push(Vec::new());
        }
    }
}
