// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-push lifecycle events
//!
//! The engine emits one event per phase of a push; sinks are pluggable and
//! must never slow the render path down. [`Dispatcher::emit`] only
//! enqueues; a forwarder task fans out to the sinks and a full queue drops
//! the event with a warning.

mod http;
mod log;
mod noop;

pub use http::HttpSink;
pub use log::LogSink;
pub use noop::NoopSink;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSink, RecordedEvent};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

const QUEUE_DEPTH: usize = 256;

/// Lifecycle event kinds, one per push phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    RenderStart,
    RenderEnd,
    ParseEnd,
    ReconcileEnd,
    PushEnd,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::RenderStart => "render-start",
            EventKind::RenderEnd => "render-end",
            EventKind::ParseEnd => "parse-end",
            EventKind::ReconcileEnd => "reconcile-end",
            EventKind::PushEnd => "push-end",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an event says: which file, and when the phase ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventPayload {
    pub start_time: i64,
    pub end_time: i64,
    pub org: String,
    pub repo: String,
    pub path: String,
}

impl EventPayload {
    /// Start a payload now; [`EventPayload::finished`] stamps the end.
    pub fn begin(org: impl Into<String>, repo: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            start_time: Utc::now().timestamp(),
            end_time: 0,
            org: org.into(),
            repo: repo.into(),
            path: path.into(),
        }
    }

    pub fn finished(&self) -> Self {
        Self {
            end_time: Utc::now().timestamp(),
            ..self.clone()
        }
    }
}

/// A destination for lifecycle events. Sinks swallow their own failures.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, kind: EventKind, payload: &EventPayload);
}

enum Envelope {
    Event(EventKind, EventPayload),
    Flush(oneshot::Sender<()>),
}

/// Fans events out to the configured sinks without blocking the caller.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::Sender<Envelope>,
}

impl Dispatcher {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        let (tx, mut rx) = mpsc::channel::<Envelope>(QUEUE_DEPTH);
        tokio::spawn(async move {
            while let Some(envelope) = rx.recv().await {
                match envelope {
                    Envelope::Event(kind, payload) => {
                        for sink in &sinks {
                            sink.emit(kind, &payload).await;
                        }
                    }
                    Envelope::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
        });
        Self { tx }
    }

    /// A dispatcher with no sinks.
    pub fn disabled() -> Self {
        Self::new(Vec::new())
    }

    /// Enqueue an event. Never blocks; a full queue drops the event.
    pub fn emit(&self, kind: EventKind, payload: &EventPayload) {
        if let Err(e) = self.tx.try_send(Envelope::Event(kind, payload.clone())) {
            warn!(kind = %kind, error = %e, "event queue full, dropping event");
        }
    }

    /// Wait until every event enqueued before this call has been delivered.
    pub async fn flushed(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Envelope::Flush(ack)).await.is_ok() {
            let _ = done.await;
        }
    }
}
