// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub contents API fetcher

use super::{shared_client, FetchError, FileFetcher};
use async_trait::async_trait;
use skiff_core::RepoPath;
use tracing::debug;

pub struct GithubFetcher {
    endpoint: String,
    token: String,
    client: reqwest::Client,
}

impl GithubFetcher {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            client: shared_client(),
        }
    }

    fn contents_url(&self, path: &RepoPath) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.endpoint, path.org, path.repo, path.path
        )
    }
}

#[async_trait]
impl FileFetcher for GithubFetcher {
    async fn download(&self, path: &RepoPath) -> Result<String, FetchError> {
        let url = self.contents_url(path);
        debug!(url = %url, "downloading file from github");

        let mut req = self
            .client
            .get(&url)
            // raw media type skips the base64 contents envelope
            .header("Accept", "application/vnd.github.v3.raw");
        if !self.token.is_empty() {
            req = req.header("Authorization", format!("token {}", self.token));
        }
        if let Some(branch) = &path.branch {
            req = req.query(&[("ref", branch)]);
        }

        let resp = req.send().await?;
        match resp.status().as_u16() {
            200 => Ok(resp.text().await?),
            404 => Err(FetchError::NotFound(path.encode_url())),
            status => Err(FetchError::Upstream { url, status }),
        }
    }
}
