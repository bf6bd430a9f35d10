//! Per-file locking
//!
//! Every file identifier maps to its own reader/writer lock. Uploads and
//! deletes hold the write side across load, mutate and save; proofs and
//! reads hold the read side. Different files never contend.
//!
//! The in-process registry only orders threads sharing one store. Separate
//! processes opening the same uploads directory are ordered by an advisory
//! [`LockFile`] taken after the in-process guard.

use dashmap::DashMap;
use fs2::FileExt;
use parking_lot::{ArcRwLockReadGuard, ArcRwLockWriteGuard, RawRwLock, RwLock};
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared guard held while reading one file's tree
pub type FileReadGuard = ArcRwLockReadGuard<RawRwLock, ()>;

/// Exclusive guard held while mutating one file's tree
pub type FileWriteGuard = ArcRwLockWriteGuard<RawRwLock, ()>;

/// Registry of per-file locks keyed by file identifier
#[derive(Debug, Default)]
pub struct FileLocks {
    locks: DashMap<String, Arc<RwLock<()>>>,
}

impl FileLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, file: &str) -> Arc<RwLock<()>> {
        // Clone out of the map so the shard lock is released before blocking
        self.locks
            .entry(file.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .value()
            .clone()
    }

    /// Block until `file` can be read
    pub fn read(&self, file: &str) -> FileReadGuard {
        self.lock_for(file).read_arc()
    }

    /// Block until `file` can be written exclusively
    pub fn write(&self, file: &str) -> FileWriteGuard {
        self.lock_for(file).write_arc()
    }

    /// Number of files that have been locked at least once
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Advisory OS lock on a lock file, released when dropped.
///
/// Lock files are never removed: a process still waiting on an unlinked
/// file would otherwise proceed alongside one that locked its replacement.
#[derive(Debug)]
pub struct LockFile {
    file: File,
    path: PathBuf,
}

impl LockFile {
    /// Block until `path` is held exclusively, creating the lock file if needed
    pub fn exclusive(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        FileExt::lock_exclusive(&file)?;
        Ok(Self { file, path })
    }

    /// Block until `path` is held shared. Returns `None` when no lock file
    /// exists yet, meaning no writer has ever touched the file.
    pub fn shared(path: impl Into<PathBuf>) -> io::Result<Option<Self>> {
        let path = path.into();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        FileExt::lock_shared(&file)?;
        Ok(Some(Self { file, path }))
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
