// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O

pub mod cd;
pub mod events;
pub mod fetch;
pub mod status;

pub use cd::{CdClient, CdError, HttpCdClient};
pub use events::{Dispatcher, EventKind, EventPayload, EventSink, HttpSink, LogSink, NoopSink};
pub use fetch::{
    BitbucketCloudFetcher, CachedFetcher, FetchError, FileFetcher, GithubFetcher, MemoryFetcher,
    RoutingFetcher, StashFetcher,
};
pub use status::{
    GithubStatusNotifier, NoopStatusNotifier, RoutingStatusNotifier, StatusNotifier,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use cd::FakeCdClient;
#[cfg(any(test, feature = "test-support"))]
pub use events::{FakeSink, RecordedEvent};
#[cfg(any(test, feature = "test-support"))]
pub use status::{FakeStatusNotifier, StatusCall};
