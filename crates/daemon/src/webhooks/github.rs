// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub push payload

use super::strip_ref;
use serde::Deserialize;
use skiff_core::{Provider, Push};

#[derive(Debug, Default, Deserialize)]
pub struct GithubWebhook {
    #[serde(default, rename = "ref")]
    pub git_ref: String,
    #[serde(default)]
    pub repository: Option<Repository>,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub owner: Option<Owner>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub login: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub modified: Vec<String>,
}

impl GithubWebhook {
    /// `repository.organization`, falling back to `repository.owner.login`
    /// for personal repos.
    pub fn org(&self) -> String {
        let Some(repository) = &self.repository else {
            return String::new();
        };
        if let Some(org) = &repository.organization {
            if !org.is_empty() {
                return org.clone();
            }
        }
        repository
            .owner
            .as_ref()
            .map(|o| o.login.clone())
            .unwrap_or_default()
    }

    pub fn into_push(self) -> Push {
        let org = self.org();
        let repo = self
            .repository
            .as_ref()
            .map(|r| r.name.clone())
            .unwrap_or_default();
        let branch = strip_ref(&self.git_ref);

        let mut files = Vec::new();
        let mut commits = Vec::new();
        for commit in self.commits {
            if !commit.id.is_empty() {
                commits.push(commit.id);
            }
            for file in commit.added.into_iter().chain(commit.modified) {
                if !files.contains(&file) {
                    files.push(file);
                }
            }
        }

        Push {
            provider: Provider::Github,
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
    use yare::parameterized;

    #[parameterized(
        organization = { r#"{"repository": {"organization": "org-armory"}}"#, "org-armory" },
        owner_login = { r#"{"repository": {"owner": {"login": "login-armory"}}}"#, "login-armory" },
        organization_wins = {
            r#"{"repository": {"organization": "org-armory", "owner": {"login": "login-armory"}}}"#,
            "org-armory"
        },
        neither = { r#"{"EventKey": ""}"#, "" },
    )]
    fn org_fallback(payload: &str, expected: &str) {
        let webhook: GithubWebhook = serde_json::from_str(payload).unwrap();
        assert_eq!(webhook.org(), expected);
    }

    #[test]
    fn push_collects_added_and_modified_files() {
        let payload = r#"{
            "ref": "refs/heads/main",
            "repository": {"name": "deploy", "organization": "armory"},
            "commits": [
                {"id": "sha1", "added": ["dinghyfile"], "modified": []},
                {"id": "sha2", "added": [], "modified": ["modules/wait.stage.module", "dinghyfile"]}
            ]
        }"#;
        let push = serde_json::from_str::<GithubWebhook>(payload)
            .unwrap()
            .into_push();

        assert_eq!(push.org, "armory");
        assert_eq!(push.repo, "deploy");
        assert_eq!(push.branch.as_deref(), Some("main"));
        assert_eq!(push.files, vec!["dinghyfile", "modules/wait.stage.module"]);
        assert_eq!(push.commits, vec!["sha1", "sha2"]);
    }

    #[test]
    fn non_branch_ref_has_no_branch() {
        let payload = r#"{"ref": "refs/tags/v1.0.0"}"#;
        let push = serde_json::from_str::<GithubWebhook>(payload)
            .unwrap()
            .into_push();
        assert_eq!(push.branch, None);
    }
}
