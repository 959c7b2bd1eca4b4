// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{EventKind, EventPayload, EventSink};
use async_trait::async_trait;

/// Discards every event.
#[derive(Default, Clone, Copy)]
pub struct NoopSink;

#[async_trait]
impl EventSink for NoopSink {
    async fn emit(&self, _kind: EventKind, _payload: &EventPayload) {}
}
