// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording status notifier for tests

use super::StatusNotifier;
use async_trait::async_trait;
use parking_lot::Mutex;
use skiff_core::{CommitStatus, Push};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCall {
    pub org: String,
    pub repo: String,
    pub status: CommitStatus,
}

#[derive(Default)]
pub struct FakeStatusNotifier {
    calls: Mutex<Vec<StatusCall>>,
}

impl FakeStatusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<StatusCall> {
        self.calls.lock().clone()
    }

    /// The statuses posted, in order.
    pub fn statuses(&self) -> Vec<CommitStatus> {
        self.calls.lock().iter().map(|c| c.status).collect()
    }
}

#[async_trait]
impl StatusNotifier for FakeStatusNotifier {
    async fn set_commit_status(&self, push: &Push, status: CommitStatus) {
        self.calls.lock().push(StatusCall {
            org: push.org.clone(),
            repo: push.repo.clone(),
            status,
        });
    }
}
