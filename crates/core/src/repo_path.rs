// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository file coordinates and their canonical URL form

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from decoding a canonical file URL
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("unknown provider scheme '{0}'")]
    UnknownProvider(String),

    #[error("malformed file url '{0}': expected <provider>://<org>/<repo>/<path>")]
    Malformed(String),
}

/// Hosted git service a file lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    Github,
    Stash,
    BitbucketCloud,
    /// In-memory file service, used by the manual update endpoint and tests
    Memory,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Github => "github",
            Provider::Stash => "stash",
            Provider::BitbucketCloud => "bitbucket-cloud",
            Provider::Memory => "memory",
        }
    }

    fn from_scheme(scheme: &str) -> Result<Self, UrlError> {
        match scheme {
            "github" => Ok(Provider::Github),
            "stash" => Ok(Provider::Stash),
            "bitbucket-cloud" => Ok(Provider::BitbucketCloud),
            "memory" => Ok(Provider::Memory),
            other => Err(UrlError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file in a hosted git repository.
///
/// The branch is optional: `None` means the provider's default branch.
/// Repo paths serialize to a canonical URL used as a map key in the
/// dependency store; [`RepoPath::encode_url`] and [`RepoPath::decode_url`]
/// are inverses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoPath {
    pub provider: Provider,
    pub org: String,
    pub repo: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl RepoPath {
    pub fn new(
        provider: Provider,
        org: impl Into<String>,
        repo: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            org: org.into(),
            repo: repo.into(),
            path: path.into(),
            branch: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Basename of the file path, used to match root manifests in a push.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Canonical URL form: `<provider>://<org>/<repo>/<path>[?at=<branch>]`.
    pub fn encode_url(&self) -> String {
        let mut url = format!(
            "{}://{}/{}/{}",
            self.provider, self.org, self.repo, self.path
        );
        if let Some(branch) = &self.branch {
            url.push_str("?at=");
            url.push_str(branch);
        }
        url
    }

    /// Inverse of [`RepoPath::encode_url`].
    pub fn decode_url(url: &str) -> Result<Self, UrlError> {
        let malformed = || UrlError::Malformed(url.to_string());

        let (scheme, rest) = url.split_once("://").ok_or_else(malformed)?;
        let provider = Provider::from_scheme(scheme)?;

        let (rest, branch) = match rest.split_once("?at=") {
            Some((rest, branch)) if !branch.is_empty() => (rest, Some(branch.to_string())),
            Some(_) => return Err(malformed()),
            None => (rest, None),
        };

        let (org, rest) = rest.split_once('/').ok_or_else(malformed)?;
        let (repo, path) = rest.split_once('/').ok_or_else(malformed)?;
        if org.is_empty() || repo.is_empty() || path.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            provider,
            org: org.to_string(),
            repo: repo.to_string(),
            path: path.to_string(),
            branch,
        })
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode_url())
    }
}

#[cfg(test)]
#[path = "repo_path_tests.rs"]
mod tests;
