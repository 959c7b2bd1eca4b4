// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory file service
//!
//! Backs the manual update endpoint (seeded with the request body) and
//! every render test. Files are keyed by repo-relative path; org and repo
//! are ignored so fixtures stay terse.

use super::{FetchError, FileFetcher};
use async_trait::async_trait;
use parking_lot::RwLock;
use skiff_core::RepoPath;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryFetcher {
    files: RwLock<HashMap<String, String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.write().insert(path.into(), contents.into());
    }

    /// Seed from `(path, contents)` pairs.
    pub fn seeded<P: Into<String>, C: Into<String>>(files: impl IntoIterator<Item = (P, C)>) -> Self {
        let fetcher = Self::new();
        for (path, contents) in files {
            fetcher.insert(path, contents);
        }
        fetcher
    }
}

#[async_trait]
impl FileFetcher for MemoryFetcher {
    async fn download(&self, path: &RepoPath) -> Result<String, FetchError> {
        self.files
            .read()
            .get(&path.path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.encode_url()))
    }
}
