// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP CD client with bounded retry

use super::{CdClient, CdError};
use async_trait::async_trait;
use skiff_core::{AppSpec, Pipeline};
use std::time::Duration;
use tracing::warn;

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_millis(500);

pub struct HttpCdClient {
    /// Application store (create/get applications).
    front_store_base_url: String,
    /// Pipeline CRUD.
    pipeline_base_url: String,
    client: reqwest::Client,
}

impl HttpCdClient {
    pub fn new(front_store_base_url: impl Into<String>, pipeline_base_url: impl Into<String>) -> Self {
        Self {
            front_store_base_url: front_store_base_url.into(),
            pipeline_base_url: pipeline_base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Issue a request, retrying transport errors and 5xx with exponential
    /// backoff. The builder closure recreates the request per attempt.
    async fn send_with_retry(
        &self,
        url: &str,
        build: impl Fn() -> reqwest::RequestBuilder + Send + Sync,
    ) -> Result<reqwest::Response, CdError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let outcome = build().send().await;
            let retryable = match &outcome {
                Ok(resp) => resp.status().is_server_error(),
                Err(_) => true,
            };
            if !retryable || attempt >= MAX_ATTEMPTS {
                return match outcome {
                    Ok(resp) if resp.status().is_server_error() => Err(CdError::Transient {
                        url: url.to_string(),
                        status: resp.status().as_u16(),
                    }),
                    Ok(resp) => Ok(resp),
                    Err(e) => Err(CdError::Transport(e)),
                };
            }
            let backoff = BASE_BACKOFF * 2u32.saturating_pow(attempt - 1);
            warn!(url = %url, attempt, "CD API call failed, retrying");
            tokio::time::sleep(backoff).await;
        }
    }
}

fn permanent(url: &str, status: u16) -> CdError {
    CdError::Permanent {
        url: url.to_string(),
        status,
    }
}

#[async_trait]
impl CdClient for HttpCdClient {
    async fn application_exists(&self, name: &str) -> Result<bool, CdError> {
        let url = format!("{}/v2/applications/{}", self.front_store_base_url, name);
        let resp = self.send_with_retry(&url, || self.client.get(&url)).await?;
        match resp.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(permanent(&url, status)),
        }
    }

    async fn create_application(&self, spec: &AppSpec) -> Result<(), CdError> {
        let url = format!("{}/v2/applications", self.front_store_base_url);
        let resp = self
            .send_with_retry(&url, || self.client.post(&url).json(spec))
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(permanent(&url, resp.status().as_u16()))
        }
    }

    async fn get_pipelines(&self, application: &str) -> Result<Vec<Pipeline>, CdError> {
        let url = format!("{}/pipelines/{}", self.pipeline_base_url, application);
        let resp = self.send_with_retry(&url, || self.client.get(&url)).await?;
        match resp.status().as_u16() {
            200 => Ok(resp.json().await?),
            404 => Ok(Vec::new()),
            status => Err(permanent(&url, status)),
        }
    }

    async fn upsert_pipeline(&self, pipeline: &Pipeline) -> Result<(), CdError> {
        let url = format!("{}/pipelines", self.pipeline_base_url);
        let resp = self
            .send_with_retry(&url, || self.client.post(&url).json(pipeline))
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(permanent(&url, resp.status().as_u16()))
        }
    }

    async fn delete_pipeline(&self, id: &str) -> Result<(), CdError> {
        let url = format!("{}/pipelines/{}", self.pipeline_base_url, id);
        let resp = self
            .send_with_retry(&url, || self.client.delete(&url))
            .await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(permanent(&url, resp.status().as_u16()))
        }
    }
}
