// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote HTTP event sink

use super::{EventKind, EventPayload, EventSink};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Serialize)]
struct Details<'a> {
    source: &'static str,
    #[serde(rename = "sourceVersion")]
    source_version: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Serialize)]
struct Wire<'a> {
    details: Details<'a>,
    content: &'a EventPayload,
}

/// POSTs each event to a remote collector with bounded retry. The body is
/// identical across attempts, so retries are idempotent on the receiver.
pub struct HttpSink {
    url: String,
    version: String,
    client: reqwest::Client,
}

impl HttpSink {
    pub fn new(url: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            version: version.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl EventSink for HttpSink {
    async fn emit(&self, kind: EventKind, payload: &EventPayload) {
        let wire = Wire {
            details: Details {
                source: "skiff",
                source_version: &self.version,
                kind: kind.as_str(),
            },
            content: payload,
        };

        for attempt in 1..=MAX_ATTEMPTS {
            let result = self.client.post(&self.url).json(&wire).send().await;
            match result {
                Ok(resp) if resp.status().is_success() => return,
                Ok(resp) => {
                    warn!(
                        url = %self.url,
                        status = resp.status().as_u16(),
                        attempt,
                        "event sink rejected event",
                    );
                }
                Err(e) => {
                    warn!(url = %self.url, error = %e, attempt, "event sink unreachable");
                }
            }
            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(BASE_BACKOFF * 2u32.saturating_pow(attempt - 1)).await;
            }
        }
    }
}
