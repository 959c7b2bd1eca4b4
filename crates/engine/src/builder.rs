// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Push orchestration
//!
//! One inbound push is handled on its own task with a deadline. Changed
//! paths whose basename matches the configured root-file name render and
//! reconcile directly; every other changed path is looked up in the
//! dependency graph and each depending root is re-rendered, each root at
//! most once per push.
//!
//! Overlapping renders of the same root serialize through a keyed async
//! lock; different roots proceed concurrently.

use crate::error::EngineError;
use crate::reconcile::Reconciler;
use crate::render::Renderer;
use parking_lot::Mutex;
use skiff_adapters::{
    CdClient, Dispatcher, EventKind, EventPayload, FileFetcher, StatusNotifier,
};
use skiff_core::{CommitStatus, Push, RepoPath, Settings};
use skiff_manifest::{unmarshal_any, HclUnmarshaller, JsonUnmarshaller, Unmarshaller};
use skiff_storage::DependencyGraph;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct PipelineBuilder {
    settings: Arc<Settings>,
    fetcher: Arc<dyn FileFetcher>,
    cd: Arc<dyn CdClient>,
    graph: Arc<DependencyGraph>,
    status: Arc<dyn StatusNotifier>,
    events: Dispatcher,
    unmarshallers: Vec<Box<dyn Unmarshaller>>,
    root_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl PipelineBuilder {
    pub fn new(
        settings: Arc<Settings>,
        fetcher: Arc<dyn FileFetcher>,
        cd: Arc<dyn CdClient>,
        graph: Arc<DependencyGraph>,
        status: Arc<dyn StatusNotifier>,
        events: Dispatcher,
    ) -> Self {
        Self {
            settings,
            fetcher,
            cd,
            graph,
            status,
            events,
            unmarshallers: vec![Box::new(JsonUnmarshaller), Box::new(HclUnmarshaller)],
            root_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Handle one decoded push end to end: render and reconcile every
    /// affected root under the push deadline, reporting commit status
    /// throughout. Exactly one terminal status is emitted when any work
    /// ran.
    pub async fn handle_push(&self, push: &Push) -> Result<(), EngineError> {
        if !push.on_branch(self.settings.repository_branch.as_deref()) {
            info!(
                org = %push.org,
                repo = %push.repo,
                branch = ?push.branch,
                "ignoring push to unconfigured branch",
            );
            return Ok(());
        }

        let (roots, dependents) = self.affected_roots(push)?;
        if roots.is_empty() && dependents.is_empty() {
            return Ok(());
        }

        self.status
            .set_commit_status(push, CommitStatus::Pending)
            .await;

        let deadline = Duration::from_secs(self.settings.push_timeout_secs);
        let work = self.process_affected(push, roots, dependents);
        let result = match tokio::time::timeout(deadline, work).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Deadline(self.settings.push_timeout_secs)),
        };

        let terminal = match &result {
            Ok(()) => CommitStatus::Success,
            Err(e) if e.is_malformed() => CommitStatus::Failure,
            Err(_) => CommitStatus::Error,
        };
        self.status.set_commit_status(push, terminal).await;

        let payload = EventPayload::begin(&push.org, &push.repo, "");
        self.events.emit(EventKind::PushEnd, &payload.finished());

        result
    }

    /// Split a push into roots named directly and roots that depend on
    /// other touched files. A root named directly is not re-rendered a
    /// second time through the graph.
    fn affected_roots(&self, push: &Push) -> Result<(Vec<RepoPath>, Vec<RepoPath>), EngineError> {
        let mut roots = Vec::new();
        let mut dependents: Vec<RepoPath> = Vec::new();

        for file in &push.files {
            let path = push.repo_path(file.clone());
            if path.file_name() == self.settings.dinghy_filename {
                roots.push(path);
            } else {
                for root in self.graph.get_roots(&path)? {
                    let fresh = !roots.iter().any(|r| r.encode_url() == root.encode_url())
                        && !dependents
                            .iter()
                            .any(|r| r.encode_url() == root.encode_url());
                    if fresh {
                        dependents.push(root);
                    }
                }
            }
        }

        Ok((roots, dependents))
    }

    async fn process_affected(
        &self,
        push: &Push,
        roots: Vec<RepoPath>,
        dependents: Vec<RepoPath>,
    ) -> Result<(), EngineError> {
        for root in &roots {
            info!(root = %root, "processing root manifest from push");
            self.process_root(root).await?;
        }
        for root in &dependents {
            // a direct root in this push already covered itself
            if roots.iter().any(|r| r.encode_url() == root.encode_url()) {
                continue;
            }
            info!(root = %root, "rebuilding root depending on pushed module");
            self.process_root(root).await?;
        }
        Ok(())
    }

    /// Render, persist dependencies, parse, and reconcile one root.
    pub async fn process_root(&self, root: &RepoPath) -> Result<(), EngineError> {
        let guard = self.root_lock(root);
        let _serialized = guard.lock().await;

        let payload = EventPayload::begin(&root.org, &root.repo, &root.path);
        self.events.emit(EventKind::RenderStart, &payload);

        let renderer = Renderer::new(
            self.settings.clone(),
            self.fetcher.clone(),
            self.cd.clone(),
        );
        let rendered = renderer.render(root, &[]).await?;
        self.events.emit(EventKind::RenderEnd, &payload.finished());

        // the commit point: edges only move once the render succeeded
        self.graph.set_children(root, &rendered.children)?;

        let mut manifest = unmarshal_any(&self.unmarshallers, &rendered.text)?;
        manifest.normalize(&self.settings.spec_email_default);
        self.events.emit(EventKind::ParseEnd, &payload.finished());

        let reconciler = Reconciler::new(self.settings.clone(), self.cd.clone());
        reconciler.apply(&manifest).await?;
        self.events
            .emit(EventKind::ReconcileEnd, &payload.finished());

        info!(
            root = %root,
            application = %manifest.application,
            pipelines = manifest.pipelines.len(),
            "root reconciled",
        );
        Ok(())
    }

    fn root_lock(&self, root: &RepoPath) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.root_locks.lock();
        locks.entry(root.encode_url()).or_default().clone()
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
