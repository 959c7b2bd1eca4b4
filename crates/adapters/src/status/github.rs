// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub commit-status notifier

use super::StatusNotifier;
use async_trait::async_trait;
use serde::Serialize;
use skiff_core::{CommitStatus, Push};
use std::time::Duration;
use tracing::{info, warn};

const STATUS_CONTEXT: &str = "continuous-deployment/skiff";

#[derive(Serialize)]
struct StatusBody<'a> {
    state: &'a str,
    target_url: &'a str,
    description: &'a str,
    context: &'a str,
}

pub struct GithubStatusNotifier {
    endpoint: String,
    token: String,
    /// Linked from the status as `target_url`.
    ui_base_url: String,
    client: reqwest::Client,
}

impl GithubStatusNotifier {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        ui_base_url: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            ui_base_url: ui_base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl StatusNotifier for GithubStatusNotifier {
    async fn set_commit_status(&self, push: &Push, status: CommitStatus) {
        let body = StatusBody {
            state: status.state(),
            target_url: &self.ui_base_url,
            description: status.description(),
            context: STATUS_CONTEXT,
        };

        for sha in &push.commits {
            let url = format!(
                "{}/repos/{}/{}/statuses/{}",
                self.endpoint, push.org, push.repo, sha
            );
            info!(
                org = %push.org,
                repo = %push.repo,
                sha = %sha,
                status = %status,
                "updating commit status",
            );
            let result = self
                .client
                .post(&url)
                .header("Authorization", format!("token {}", self.token))
                .json(&body)
                .send()
                .await;
            match result {
                Ok(resp) if !resp.status().is_success() => {
                    warn!(url = %url, status = resp.status().as_u16(), "commit status rejected");
                }
                Ok(_) => {}
                Err(e) => warn!(url = %url, error = %e, "commit status post failed"),
            }
        }
    }
}
