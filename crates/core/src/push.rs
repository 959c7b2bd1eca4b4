// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Push notifications and commit status

use crate::{Provider, RepoPath};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Commit status reported back to the git provider.
///
/// Exactly one terminal status (`Success`, `Failure`, `Error`) is emitted
/// per push, after the initial `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitStatus {
    Pending,
    Success,
    /// The rendered output was malformed
    Failure,
    /// Any other fault: fetch, CD API, dependency store
    Error,
}

impl CommitStatus {
    pub fn state(&self) -> &'static str {
        match self {
            CommitStatus::Pending => "pending",
            CommitStatus::Success => "success",
            CommitStatus::Failure => "failure",
            CommitStatus::Error => "error",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CommitStatus::Pending => "Updating pipeline definitions...",
            CommitStatus::Success => "Pipeline definitions updated!",
            CommitStatus::Failure => "Failed to update pipeline definitions!",
            CommitStatus::Error => "Error updating pipeline definitions!",
        }
    }
}

impl fmt::Display for CommitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.state())
    }
}

/// A decoded push notification from a git service.
///
/// The webhook layer decodes each provider payload into this common shape;
/// the engine trusts the advertised file list and never inspects diffs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Push {
    pub provider: Provider,
    pub org: String,
    pub repo: String,
    /// Branch the commits landed on; `None` when the payload does not say.
    pub branch: Option<String>,
    /// Paths touched by the push, repo-relative.
    pub files: Vec<String>,
    /// Commit SHAs for status updates, oldest first.
    pub commits: Vec<String>,
}

impl Push {
    /// True if any changed path's basename equals `file_name`.
    pub fn contains_file(&self, file_name: &str) -> bool {
        self.files
            .iter()
            .any(|f| f.rsplit('/').next().unwrap_or(f) == file_name)
    }

    /// Repo coordinates of a changed path within this push.
    pub fn repo_path(&self, path: impl Into<String>) -> RepoPath {
        let mut rp = RepoPath::new(self.provider, self.org.clone(), self.repo.clone(), path);
        if let Some(branch) = &self.branch {
            rp = rp.with_branch(branch.clone());
        }
        rp
    }

    /// True when the push landed on `branch`, or when either side does not
    /// name a branch (single-branch deployments leave it unset).
    pub fn on_branch(&self, branch: Option<&str>) -> bool {
        match (self.branch.as_deref(), branch) {
            (Some(got), Some(want)) => got == want,
            _ => true,
        }
    }
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
