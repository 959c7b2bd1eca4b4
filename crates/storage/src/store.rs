// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value backing stores for the dependency graph

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors from relation-store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A key-value store of string sets with atomic per-key replace.
///
/// Keys are canonical file URLs prefixed `parent:`/`child:`. Any store with
/// atomic per-key set semantics satisfies the contract; the in-tree
/// implementations are process-local memory and a JSON file.
pub trait RelationStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Vec<String>, StoreError>;

    /// Replace the value set for `key`. An empty set removes the key.
    fn put(&self, key: &str, values: Vec<String>) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local store, used by tests and the manual update endpoint.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RelationStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned().unwrap_or_default())
    }

    fn put(&self, key: &str, values: Vec<String>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        if values.is_empty() {
            entries.remove(key);
        } else {
            entries.insert(key.to_string(), values);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Persistent single-file store.
///
/// The whole relation map lives in one JSON document, rewritten atomically
/// (write to `.tmp`, fsync, rename) on every mutation. A corrupt file is
/// moved aside with a warning and the store starts empty rather than
/// refusing to boot.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Vec<String>>>,
}

#[derive(Serialize, Deserialize, Default)]
struct FileDocument {
    entries: BTreeMap<String, Vec<String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = Self::load(&path)?;
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn load(path: &Path) -> Result<BTreeMap<String, Vec<String>>, StoreError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, FileDocument>(reader) {
            Ok(doc) => Ok(doc.entries),
            Err(e) => {
                let bak = path.with_extension("bak");
                warn!(
                    error = %e,
                    path = %path.display(),
                    bak = %bak.display(),
                    "Corrupt relation store, moving aside and starting empty",
                );
                fs::rename(path, &bak)?;
                Ok(BTreeMap::new())
            }
        }
    }

    /// Persist the current map atomically.
    fn flush(&self, entries: &BTreeMap<String, Vec<String>>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(
                &mut writer,
                &FileDocument {
                    entries: entries.clone(),
                },
            )?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl RelationStore for FileStore {
    fn get(&self, key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned().unwrap_or_default())
    }

    fn put(&self, key: &str, values: Vec<String>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        if values.is_empty() {
            entries.remove(key);
        } else {
            entries.insert(key.to_string(), values);
        }
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        entries.remove(key);
        self.flush(&entries)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
