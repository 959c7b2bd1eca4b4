// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op status notifier for providers without a status API

use super::StatusNotifier;
use async_trait::async_trait;
use skiff_core::{CommitStatus, Push};

#[derive(Default, Clone, Copy)]
pub struct NoopStatusNotifier;

#[async_trait]
impl StatusNotifier for NoopStatusNotifier {
    async fn set_commit_status(&self, _push: &Push, _status: CommitStatus) {}
}
