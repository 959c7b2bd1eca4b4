// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-once fetch cache
//!
//! A render fetches the same module once; concurrent renders of different
//! roots share the hit. A miss populates under a per-key lock so two tasks
//! never fetch the same file twice. Errors are not cached.

use super::{FetchError, FileFetcher};
use async_trait::async_trait;
use parking_lot::Mutex;
use skiff_core::RepoPath;
use std::collections::HashMap;
use std::sync::Arc;

type Slot = Arc<tokio::sync::Mutex<Option<String>>>;

pub struct CachedFetcher {
    inner: Arc<dyn FileFetcher>,
    entries: Mutex<HashMap<String, Slot>>,
}

impl CachedFetcher {
    pub fn new(inner: Arc<dyn FileFetcher>) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl FileFetcher for CachedFetcher {
    async fn download(&self, path: &RepoPath) -> Result<String, FetchError> {
        let slot = {
            let mut entries = self.entries.lock();
            entries.entry(path.encode_url()).or_default().clone()
        };

        let mut guard = slot.lock().await;
        if let Some(text) = guard.as_ref() {
            return Ok(text.clone());
        }
        let text = self.inner.download(path).await?;
        *guard = Some(text.clone());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use skiff_core::Provider;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFetcher {
        inner: MemoryFetcher,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FileFetcher for CountingFetcher {
        async fn download(&self, path: &RepoPath) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.download(path).await
        }
    }

    #[tokio::test]
    async fn second_fetch_hits_cache() {
        let counting = Arc::new(CountingFetcher {
            inner: MemoryFetcher::seeded([("mod1", "body")]),
            calls: AtomicUsize::new(0),
        });
        let cached = CachedFetcher::new(counting.clone());
        let rp = RepoPath::new(Provider::Memory, "o", "r", "mod1");

        assert_eq!(cached.download(&rp).await.unwrap(), "body");
        assert_eq!(cached.download(&rp).await.unwrap(), "body");
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let counting = Arc::new(CountingFetcher {
            inner: MemoryFetcher::new(),
            calls: AtomicUsize::new(0),
        });
        let cached = CachedFetcher::new(counting.clone());
        let rp = RepoPath::new(Provider::Memory, "o", "r", "absent");

        assert!(cached.download(&rp).await.is_err());
        assert!(cached.download(&rp).await.is_err());
        assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn branch_is_part_of_the_key() {
        let counting = Arc::new(CountingFetcher {
            inner: MemoryFetcher::seeded([("f", "body")]),
            calls: AtomicUsize::new(0),
        });
        let cached = CachedFetcher::new(counting.clone());
        let main = RepoPath::new(Provider::Memory, "o", "r", "f").with_branch("main");
        let dev = RepoPath::new(Provider::Memory, "o", "r", "f").with_branch("dev");

        cached.download(&main).await.unwrap();
        cached.download(&dev).await.unwrap();
        assert_eq!(counting.calls.load(Ordering::SeqCst), 2);
    }
}
