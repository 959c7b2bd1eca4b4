// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bitbucket Server (Stash) push payload
//!
//! Legacy Stash webhooks and the modern Bitbucket Server form share this
//! shape; the modern form additionally carries an `eventKey` that the
//! handler filters on.

use super::{strip_ref, REFS_CHANGED};
use serde::Deserialize;
use skiff_core::{Provider, Push};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StashWebhook {
    #[serde(default)]
    pub event_key: Option<String>,
    #[serde(default)]
    pub repository: Option<Repository>,
    #[serde(default)]
    pub ref_changes: Vec<RefChange>,
    #[serde(default)]
    pub changesets: Changesets,
}

#[derive(Debug, Default, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub project: Project,
}

#[derive(Debug, Default, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefChange {
    #[serde(default)]
    pub ref_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Changesets {
    #[serde(default)]
    pub values: Vec<Changeset>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changeset {
    #[serde(default)]
    pub to_commit: Commit,
    #[serde(default)]
    pub changes: Changes,
}

#[derive(Debug, Default, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Changes {
    #[serde(default)]
    pub values: Vec<Change>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub path: ChangePath,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangePath {
    #[serde(default, rename = "toString")]
    pub full: String,
}

impl StashWebhook {
    /// Modern Bitbucket Server webhooks only carry a push when the event
    /// key says so.
    pub fn is_refs_changed(&self) -> bool {
        self.event_key.as_deref() == Some(REFS_CHANGED)
    }

    pub fn into_push(self) -> Push {
        let (org, repo) = self
            .repository
            .map(|r| (r.project.key, r.slug))
            .unwrap_or_default();
        let branch = self
            .ref_changes
            .first()
            .and_then(|change| strip_ref(&change.ref_id));

        let mut files = Vec::new();
        let mut commits = Vec::new();
        for changeset in self.changesets.values {
            if !changeset.to_commit.id.is_empty() {
                commits.push(changeset.to_commit.id);
            }
            for change in changeset.changes.values {
                if !change.path.full.is_empty() && !files.contains(&change.path.full) {
                    files.push(change.path.full);
                }
            }
        }

        Push {
            provider: Provider::Stash,
            org,
            repo,
            branch,
            files,
            commits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "eventKey": "repo:refs_changed",
        "repository": {"slug": "deploy", "project": {"key": "ARM"}},
        "refChanges": [{"refId": "refs/heads/develop"}],
        "changesets": {
            "values": [
                {
                    "toCommit": {"id": "sha-1"},
                    "changes": {"values": [
                        {"path": {"toString": "dinghyfile"}},
                        {"path": {"toString": "modules/wait.stage.module"}}
                    ]}
                }
            ]
        }
    }"#;

    #[test]
    fn decodes_full_payload() {
        let push = serde_json::from_str::<StashWebhook>(PAYLOAD)
            .unwrap()
            .into_push();
        assert_eq!(push.provider, Provider::Stash);
        assert_eq!(push.org, "ARM");
        assert_eq!(push.repo, "deploy");
        assert_eq!(push.branch.as_deref(), Some("develop"));
        assert_eq!(push.files, vec!["dinghyfile", "modules/wait.stage.module"]);
        assert_eq!(push.commits, vec!["sha-1"]);
    }

    #[test]
    fn refs_changed_filter() {
        let hook: StashWebhook = serde_json::from_str(PAYLOAD).unwrap();
        assert!(hook.is_refs_changed());

        let other: StashWebhook =
            serde_json::from_str(r#"{"eventKey": "repo:comment:added"}"#).unwrap();
        assert!(!other.is_refs_changed());

        let absent: StashWebhook = serde_json::from_str("{}").unwrap();
        assert!(!absent.is_refs_changed());
    }
}
