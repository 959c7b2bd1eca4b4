// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bitbucket Server (Stash) raw-file fetcher

use super::{shared_client, FetchError, FileFetcher};
use async_trait::async_trait;
use serde::Deserialize;
use skiff_core::RepoPath;
use tracing::debug;

pub struct StashFetcher {
    endpoint: String,
    username: String,
    token: String,
    client: reqwest::Client,
}

/// Stash serves file contents as paged lines rather than a raw body.
#[derive(Deserialize)]
struct BrowseResponse {
    #[serde(default)]
    lines: Vec<BrowseLine>,
}

#[derive(Deserialize)]
struct BrowseLine {
    #[serde(default)]
    text: String,
}

impl StashFetcher {
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: username.into(),
            token: token.into(),
            client: shared_client(),
        }
    }

    fn browse_url(&self, path: &RepoPath) -> String {
        format!(
            "{}/projects/{}/repos/{}/browse/{}",
            self.endpoint, path.org, path.repo, path.path
        )
    }
}

#[async_trait]
impl FileFetcher for StashFetcher {
    async fn download(&self, path: &RepoPath) -> Result<String, FetchError> {
        let url = self.browse_url(path);
        debug!(url = %url, "downloading file from stash");

        let mut query: Vec<(&str, String)> = vec![("limit", "10000".to_string())];
        if let Some(branch) = &path.branch {
            query.push(("at", format!("refs/heads/{branch}")));
        }

        let resp = self
            .client
            .get(&url)
            .query(&query)
            .basic_auth(&self.username, Some(&self.token))
            .send()
            .await?;

        match resp.status().as_u16() {
            200 => {
                let body: BrowseResponse = resp.json().await?;
                let lines: Vec<String> = body.lines.into_iter().map(|l| l.text).collect();
                Ok(lines.join("\n"))
            }
            404 => Err(FetchError::NotFound(path.encode_url())),
            status => Err(FetchError::Upstream { url, status }),
        }
    }
}
