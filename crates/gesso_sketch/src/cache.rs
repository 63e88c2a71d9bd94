//! Per-file scan cache.
//!
//! Entries are keyed by path and validated by content hash. A lookup only
//! hits when both the path and the hash match; anything else is a miss and
//! the file is extracted again.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use dashmap::DashMap;
use gesso_primer::hash::ContentHash;
use gesso_primer::{CompactString, FxIndexSet};

use crate::class_name::ParsedUtilityClass;

/// Result of scanning one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileScanResult {
    pub path: PathBuf,
    /// Raw utility classes, in first-seen order.
    pub classes: FxIndexSet<CompactString>,
    /// Parsed form of `classes`, in the same order.
    pub parsed: Vec<ParsedUtilityClass>,
    pub content_hash: ContentHash,
    pub timestamp: SystemTime,
}

#[derive(Debug)]
struct CacheEntry {
    hash: ContentHash,
    result: Arc<FileScanResult>,
}

/// Thread-safe scan cache.
#[derive(Debug, Default)]
pub struct ScanCache {
    entries: DashMap<PathBuf, CacheEntry>,
}

impl ScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result under a path and the hash of the content it came from.
    pub fn set(&self, path: impl Into<PathBuf>, result: Arc<FileScanResult>, hash: ContentHash) {
        self.entries.insert(path.into(), CacheEntry { hash, result });
    }

    /// Cached result regardless of freshness.
    pub fn get(&self, path: &Path) -> Option<Arc<FileScanResult>> {
        self.entries.get(path).map(|entry| Arc::clone(&entry.result))
    }

    pub fn is_valid(&self, path: &Path, hash: ContentHash) -> bool {
        self.entries
            .get(path)
            .is_some_and(|entry| entry.hash == hash)
    }

    /// Cached result if it was produced from content with this hash.
    pub fn get_if_valid(&self, path: &Path, hash: ContentHash) -> Option<Arc<FileScanResult>> {
        let entry = self.entries.get(path)?;
        (entry.hash == hash).then(|| Arc::clone(&entry.result))
    }

    /// Drop one entry. Returns whether it existed.
    pub fn invalidate(&self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
