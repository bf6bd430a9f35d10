//! Segment store
//!
//! Files live as directories under the uploads directory. Each directory
//! holds the uploaded segments plus one tree record whose leaves are the
//! segment digests in upload order. Lock files shared between processes
//! live in `.locks` beside them.

use crate::config::StoreConfig;
use crate::core::{error::*, types::*};
use crate::proofs::{verify_proof, MerkleTree, ProofResponse};
use crate::storage::locks::{FileLocks, LockFile};
use crate::storage::tree_file::TreeFile;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory under the uploads directory holding per-file lock files
pub const LOCK_DIR: &str = ".locks";

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub file: String,
    pub segment: String,
    /// Leaf index assigned to the segment, used to request proofs
    pub leaf_index: usize,
    pub path: PathBuf,
    pub size: u64,
}

/// Summary of one stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub name: String,
    pub segments: usize,
    pub total_bytes: u64,
}

/// Main store structure
#[derive(Debug)]
pub struct SegmentStore {
    config: StoreConfig,
    locks: FileLocks,
}

impl SegmentStore {
    /// Open a store, creating the uploads directory if needed
    pub fn open(config: StoreConfig) -> Result<Self> {
        std::fs::create_dir_all(config.uploads_dir.join(LOCK_DIR))?;
        debug!(uploads_dir = %config.uploads_dir.display(), "opened segment store");
        Ok(Self {
            config,
            locks: FileLocks::new(),
        })
    }

    /// Open a store with default settings rooted at `uploads_dir`
    pub fn open_at(uploads_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open(StoreConfig::with_uploads_dir(uploads_dir))
    }

    /// Settings this store runs with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Directory holding everything uploaded for `file`
    pub fn file_dir(&self, file: &str) -> PathBuf {
        self.config.uploads_dir.join(file)
    }

    /// Tree record of `file`
    pub fn tree_file(&self, file: &str) -> TreeFile {
        TreeFile::new(
            self.file_dir(file).join(&self.config.tree_file_name),
            self.config.record_format,
        )
    }

    /// Lock file ordering writers of `file` across processes
    pub fn lock_path(&self, file: &str) -> PathBuf {
        self.config
            .uploads_dir
            .join(LOCK_DIR)
            .join(format!("{}.lock", file))
    }

    fn lock_exclusive(&self, file: &str) -> Result<LockFile> {
        let path = self.lock_path(file);
        LockFile::exclusive(&path).map_err(|e| SegstoreError::storage_unavailable(path, e))
    }

    fn lock_shared(&self, file: &str) -> Result<Option<LockFile>> {
        let path = self.lock_path(file);
        LockFile::shared(&path).map_err(|e| SegstoreError::storage_unavailable(path, e))
    }

    /// Store one segment of `file` and append it as the next leaf
    pub fn upload(&self, file: &str, segment: &str, data: &[u8]) -> Result<UploadReceipt> {
        validate_name(file)?;
        self.validate_segment_name(segment)?;

        let size = data.len() as u64;
        if size > self.config.max_upload_size {
            return Err(SegstoreError::SegmentTooLarge {
                size,
                limit: self.config.max_upload_size,
            });
        }

        let _guard = self.locks.write(file);
        let _lock = self.lock_exclusive(file)?;

        let file_dir = self.file_dir(file);
        let created_dir = !file_dir.is_dir();
        std::fs::create_dir_all(&file_dir)?;
        let segment_path = file_dir.join(segment);
        write_new(&segment_path, data).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => SegstoreError::SegmentExists {
                file: file.to_string(),
                segment: segment.to_string(),
            },
            _ => SegstoreError::Io(e),
        })?;

        let tree_file = self.tree_file(file);
        let appended = tree_file.load_or_default().and_then(|mut tree| {
            let index = tree.add_leaf(data);
            tree_file.save(&tree)?;
            Ok(index)
        });

        let leaf_index = match appended {
            Ok(index) => index,
            Err(e) => {
                // Keep the stored segments and the tree leaves in step
                if let Err(remove_err) = std::fs::remove_file(&segment_path) {
                    warn!(path = %segment_path.display(), error = %remove_err, "failed to roll back segment");
                }
                if created_dir {
                    // Only succeeds while the directory is still empty
                    let _ = std::fs::remove_dir(&file_dir);
                }
                return Err(e);
            },
        };

        info!(file, segment, leaf_index, size, "uploaded segment");
        Ok(UploadReceipt {
            file: file.to_string(),
            segment: segment.to_string(),
            leaf_index,
            path: segment_path,
            size,
        })
    }

    /// Read back a stored segment
    pub fn download(&self, file: &str, segment: &str) -> Result<Vec<u8>> {
        validate_name(file)?;
        self.validate_segment_name(segment)?;

        let _guard = self.locks.read(file);
        let _lock = self.lock_shared(file)?;
        std::fs::read(self.file_dir(file).join(segment)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SegstoreError::SegmentNotFound {
                file: file.to_string(),
                segment: segment.to_string(),
            },
            _ => SegstoreError::Io(e),
        })
    }

    /// List stored files, sorted by name
    pub fn list(&self) -> Result<Vec<FileSummary>> {
        let entries = match std::fs::read_dir(&self.config.uploads_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !entry.file_type()?.is_dir() || name.starts_with('.') {
                continue;
            }
            let (segments, total_bytes) = self.segment_stats(&entry.path())?;
            files.push(FileSummary {
                name,
                segments,
                total_bytes,
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Remove a file with all its segments and its tree record
    pub fn delete(&self, file: &str) -> Result<()> {
        validate_name(file)?;

        let _guard = self.locks.write(file);
        let _lock = self.lock_exclusive(file)?;
        let file_dir = self.file_dir(file);
        if !file_dir.is_dir() {
            return Err(SegstoreError::file_not_found(file));
        }
        std::fs::remove_dir_all(&file_dir)?;

        info!(file, "deleted file");
        Ok(())
    }

    /// Prove that the segment identified by `segment_id` belongs to `file`
    pub fn prove(&self, file: &str, segment_id: &str) -> Result<ProofResponse> {
        validate_name(file)?;
        let _guard = self.locks.read(file);
        let _lock = self.lock_shared(file)?;
        let tree = self.load_built_tree(file)?;

        let (leaf_index, proof) = tree.generate_proof_for_segment(segment_id)?;
        let root = tree.root()?;

        if self.config.self_verify && !verify_proof(&root, &proof)? {
            warn!(file, leaf_index, "generated proof does not verify");
            return Err(SegstoreError::ProofVerificationFailed);
        }

        debug!(file, leaf_index, steps = proof.len(), %root, "generated proof");
        Ok(ProofResponse {
            file: file.to_string(),
            leaf_index,
            root,
            proof,
        })
    }

    /// Current root of `file`'s tree
    pub fn root(&self, file: &str) -> Result<RootHash> {
        validate_name(file)?;
        let _guard = self.locks.read(file);
        let _lock = self.lock_shared(file)?;
        self.load_built_tree(file)?.root()
    }

    /// Number of leaves recorded for `file`
    pub fn leaf_count(&self, file: &str) -> Result<usize> {
        validate_name(file)?;
        let _guard = self.locks.read(file);
        let _lock = self.lock_shared(file)?;
        Ok(self.load_tree(file)?.leaf_count())
    }

    fn load_tree(&self, file: &str) -> Result<MerkleTree> {
        let tree_file = self.tree_file(file);
        if !tree_file.exists() {
            return Err(SegstoreError::file_not_found(file));
        }
        tree_file.load()
    }

    /// Load a tree for reading and build it in memory; the record is not rewritten
    fn load_built_tree(&self, file: &str) -> Result<MerkleTree> {
        let mut tree = self.load_tree(file)?;
        if !tree.is_built() {
            tree.build()?;
        }
        Ok(tree)
    }

    fn segment_stats(&self, dir: &Path) -> Result<(usize, u64)> {
        let mut count = 0;
        let mut bytes = 0;
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name == self.config.tree_file_name.as_str() || name.starts_with('.') {
                continue;
            }
            let metadata = entry.metadata()?;
            if metadata.is_file() {
                count += 1;
                bytes += metadata.len();
            }
        }
        Ok((count, bytes))
    }

    fn validate_segment_name(&self, segment: &str) -> Result<()> {
        validate_name(segment)?;
        if segment == self.config.tree_file_name {
            return Err(SegstoreError::invalid_name(segment, "reserved for the tree record"));
        }
        Ok(())
    }
}

/// Reject names that would escape or alias the store layout
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SegstoreError::invalid_name(name, "must not be empty"));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(SegstoreError::invalid_name(name, "must not contain path separators"));
    }
    if name.starts_with('.') {
        return Err(SegstoreError::invalid_name(name, "must not start with a dot"));
    }
    Ok(())
}

fn write_new(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(data)?;
    file.sync_all()
}
