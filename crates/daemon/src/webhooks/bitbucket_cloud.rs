// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bitbucket Cloud push payload

use serde::Deserialize;
use skiff_core::{Provider, Push};

#[derive(Debug, Default, Deserialize)]
pub struct BitbucketCloudWebhook {
    #[serde(default)]
    pub repository: Option<Repository>,
    #[serde(default)]
    pub push: PushBlock,
}

#[derive(Debug, Default, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PushBlock {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub new: Option<Ref>,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Ref {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub hash: String,
    /// Cloud payloads do not list changed paths; deployments front the
    /// webhook with a relay that fills this in from the diffstat API.
    #[serde(default)]
    pub files: Vec<String>,
}

impl BitbucketCloudWebhook {
    pub fn into_push(self) -> Push {
        let (org, repo) = self
            .repository
            .and_then(|r| {
                r.full_name
                    .split_once('/')
                    .map(|(o, r)| (o.to_string(), r.to_string()))
            })
            .unwrap_or_default();

        let branch = self
            .push
            .changes
            .first()
            .and_then(|c| c.new.as_ref())
            .map(|r| r.name.clone())
            .filter(|name| !name.is_empty());

        let mut files = Vec::new();
        let mut commits = Vec::new();
        for change in self.push.changes {
            for commit in change.commits {
                if !commit.hash.is_empty() {
                    commits.push(commit.hash);
                }
                for file in commit.files {
                    if !files.contains(&file) {
                        files.push(file);
                    }
                }
            }
        }

        Push {
            provider: Provider::BitbucketCloud,
            org,
            repo,
            branch,
            files,
            commits,
        }
    }
}
