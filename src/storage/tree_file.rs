//! Persisted merkle tree records
//!
//! A record holds every level of a tree and its `built` flag. Records are
//! replaced atomically: the new contents are written to a temporary file in
//! the same directory and renamed over the old record.

use crate::core::{error::*, types::*};
use crate::proofs::merkle::MerkleTree;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Location and encoding of a tree record on disk
#[derive(Debug, Clone)]
pub struct TreeFile {
    path: PathBuf,
    format: RecordFormat,
}

impl TreeFile {
    /// Describe a record at `path` in the given encoding
    pub fn new(path: impl Into<PathBuf>, format: RecordFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Path of the record
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encoding of the record
    pub fn format(&self) -> RecordFormat {
        self.format
    }

    /// Whether a record has been written yet
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Serialize `tree` and atomically replace the record with it
    pub fn save(&self, tree: &MerkleTree) -> Result<()> {
        let bytes = self.encode(tree)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)
            .map_err(|e| SegstoreError::storage_unavailable(&self.path, e))?;
        temp.write_all(&bytes)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| SegstoreError::storage_unavailable(&self.path, e))?;
        temp.persist(&self.path)
            .map_err(|e| SegstoreError::storage_unavailable(&self.path, e.error))?;

        debug!(
            path = %self.path.display(),
            format = %self.format,
            leaves = tree.leaf_count(),
            built = tree.is_built(),
            bytes = bytes.len(),
            "saved tree record"
        );
        Ok(())
    }

    /// Read and validate the record
    pub fn load(&self) -> Result<MerkleTree> {
        let bytes = std::fs::read(&self.path)
            .map_err(|e| SegstoreError::storage_unavailable(&self.path, e))?;

        let mut tree = self.decode(&bytes)?;
        tree.normalize();
        tree.check_structure()
            .map_err(|reason| SegstoreError::corrupt_record(&self.path, reason))?;

        debug!(
            path = %self.path.display(),
            leaves = tree.leaf_count(),
            built = tree.is_built(),
            "loaded tree record"
        );
        Ok(tree)
    }

    /// Load the record, or start an empty tree when none exists yet
    pub fn load_or_default(&self) -> Result<MerkleTree> {
        if self.exists() {
            self.load()
        } else {
            Ok(MerkleTree::new())
        }
    }

    fn encode(&self, tree: &MerkleTree) -> Result<Vec<u8>> {
        let bytes = match self.format {
            RecordFormat::Json => serde_json::to_vec(tree)?,
            RecordFormat::Bincode => bincode::serialize(tree)?,
        };
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<MerkleTree> {
        let decoded = match self.format {
            RecordFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            RecordFormat::Bincode => bincode::deserialize(bytes).map_err(|e| e.to_string()),
        };
        decoded.map_err(|reason| SegstoreError::corrupt_record(&self.path, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_record_is_storage_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let file = TreeFile::new(temp_dir.path().join("missing.json"), RecordFormat::Json);
        assert!(!file.exists());
        assert!(matches!(
            file.load(),
            Err(SegstoreError::StorageUnavailable { .. })
        ));
        assert!(file.load_or_default().unwrap().is_empty());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let file = TreeFile::new(
            temp_dir.path().join("no").join("such").join("tree.json"),
            RecordFormat::Json,
        );
        assert!(matches!(
            file.save(&MerkleTree::new()),
            Err(SegstoreError::StorageUnavailable { .. })
        ));
    }

    #[test]
    fn test_json_record_shape() {
        let temp_dir = TempDir::new().unwrap();
        let file = TreeFile::new(temp_dir.path().join("tree.json"), RecordFormat::Json);
        let mut tree = MerkleTree::from_leaves([b"a", b"b"]);
        tree.build().unwrap();
        file.save(&tree).unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(file.path()).unwrap()).unwrap();
        assert_eq!(value["built"], serde_json::Value::Bool(true));
        assert_eq!(value["levels"].as_array().unwrap().len(), 2);
        assert_eq!(value["levels"][0][0].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_save_replaces_previous_record() {
        let temp_dir = TempDir::new().unwrap();
        let file = TreeFile::new(temp_dir.path().join("tree.bin"), RecordFormat::Bincode);

        let mut tree = MerkleTree::from_leaves([b"a"]);
        file.save(&tree).unwrap();
        tree.add_leaf(b"b");
        file.save(&tree).unwrap();

        assert_eq!(file.load().unwrap().leaf_count(), 2);
        let leftovers = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
