// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{EventKind, EventPayload, EventSink};
use async_trait::async_trait;
use tracing::info;

/// Writes events to the local log.
#[derive(Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl EventSink for LogSink {
    async fn emit(&self, kind: EventKind, payload: &EventPayload) {
        info!(
            kind = %kind,
            org = %payload.org,
            repo = %payload.repo,
            path = %payload.path,
            start_time = payload.start_time,
            end_time = payload.end_time,
            "lifecycle event",
        );
    }
}
