// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bitbucket Cloud raw-file fetcher

use super::{shared_client, FetchError, FileFetcher};
use async_trait::async_trait;
use skiff_core::RepoPath;
use tracing::debug;

pub struct BitbucketCloudFetcher {
    endpoint: String,
    username: String,
    token: String,
    client: reqwest::Client,
}

impl BitbucketCloudFetcher {
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

    fn src_url(&self, path: &RepoPath) -> String {
        // the src endpoint needs a concrete revision; HEAD resolves the
        // repository's default branch
        let revision = path.branch.as_deref().unwrap_or("HEAD");
        format!(
            "{}/repositories/{}/{}/src/{}/{}",
            self.endpoint, path.org, path.repo, revision, path.path
        )
    }
}

#[async_trait]
impl FileFetcher for BitbucketCloudFetcher {
    async fn download(&self, path: &RepoPath) -> Result<String, FetchError> {
        let url = self.src_url(path);
        debug!(url = %url, "downloading file from bitbucket cloud");

        let resp = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.token))
            .send()
            .await?;

        match resp.status().as_u16() {
            200 => Ok(resp.text().await?),
            404 => Err(FetchError::NotFound(path.encode_url())),
            status => Err(FetchError::Upstream { url, status }),
        }
    }
}
