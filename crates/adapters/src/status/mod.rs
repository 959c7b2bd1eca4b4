// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commit-status notifiers
//!
//! Status updates are advisory: a failure to post one is logged and never
//! fails the push that triggered it.

mod github;
mod noop;
mod router;

pub use github::GithubStatusNotifier;
pub use noop::NoopStatusNotifier;
pub use router::RoutingStatusNotifier;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStatusNotifier, StatusCall};

use async_trait::async_trait;
use skiff_core::{CommitStatus, Push};

/// Posts a commit status to the git provider for every commit in a push.
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    async fn set_commit_status(&self, push: &Push, status: CommitStatus);
}
