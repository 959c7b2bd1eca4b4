// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider-routing status notifier

use super::StatusNotifier;
use async_trait::async_trait;
use skiff_core::{CommitStatus, Provider, Push};
use std::collections::HashMap;
use std::sync::Arc;

/// Routes status updates to the notifier registered for the push's
/// provider; providers without one are silently skipped.
#[derive(Default)]
pub struct RoutingStatusNotifier {
    routes: HashMap<Provider, Arc<dyn StatusNotifier>>,
}

impl RoutingStatusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: Provider, notifier: Arc<dyn StatusNotifier>) -> Self {
        self.routes.insert(provider, notifier);
        self
    }
}

#[async_trait]
impl StatusNotifier for RoutingStatusNotifier {
    async fn set_commit_status(&self, push: &Push, status: CommitStatus) {
        if let Some(notifier) = self.routes.get(&push.provider) {
            notifier.set_commit_status(push, status).await;
        }
    }
}
