// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording event sink for tests

use super::{EventKind, EventPayload, EventSink};
use async_trait::async_trait;
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub kind: EventKind,
    pub payload: EventPayload,
}

#[derive(Default)]
pub struct FakeSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl FakeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().iter().map(|e| e.kind).collect()
    }
}

#[async_trait]
impl EventSink for FakeSink {
    async fn emit(&self, kind: EventKind, payload: &EventPayload) {
        self.events.lock().push(RecordedEvent {
            kind,
            payload: payload.clone(),
        });
    }
}
