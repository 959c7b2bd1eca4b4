// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File fetching from hosted git services
//!
//! One capability, provider variants as values: credentials, endpoint, and
//! cache are fields, not subtypes. The render engine only sees
//! [`FileFetcher`].

mod bitbucket_cloud;
mod cache;
mod github;
mod memory;
mod router;
mod stash;

pub use bitbucket_cloud::BitbucketCloudFetcher;
pub use cache::CachedFetcher;
pub use github::GithubFetcher;
pub use memory::MemoryFetcher;
pub use router::RoutingFetcher;
pub use stash::StashFetcher;

use async_trait::async_trait;
use skiff_core::RepoPath;
use thiserror::Error;

/// Errors from file fetches
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("fetch of {url} failed with status {status}")]
    Upstream { url: String, status: u16 },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no fetcher registered for provider {0}")]
    UnknownProvider(String),
}

/// Fetches file contents from a git service.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn download(&self, path: &RepoPath) -> Result<String, FetchError>;
}

pub(crate) fn shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap_or_default()
}
