// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook payload decoding
//!
//! Each provider's payload decodes into the common [`skiff_core::Push`]
//! shape. Decoding trusts the advertised file lists; nothing here inspects
//! diffs.

mod bitbucket_cloud;
mod github;
mod stash;

pub use bitbucket_cloud::BitbucketCloudWebhook;
pub use github::GithubWebhook;
pub use stash::StashWebhook;

/// The only Bitbucket Server event kind that carries a push.
pub const REFS_CHANGED: &str = "repo:refs_changed";

fn strip_ref(full_ref: &str) -> Option<String> {
    full_ref
        .strip_prefix("refs/heads/")
        .filter(|b| !b.is_empty())
        .map(String::from)
}
