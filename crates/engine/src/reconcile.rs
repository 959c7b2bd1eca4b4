// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline reconciliation
//!
//! Projects a rendered pipeline set onto the CD API: ensure the application
//! exists, upsert every desired pipeline in input order (adopting ids from
//! the current state by name), then optionally sweep pipelines the fresh
//! render no longer names.

use crate::error::ReconcileError;
use skiff_adapters::CdClient;
use skiff_core::{Dinghyfile, Settings};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Reconciler {
    settings: Arc<Settings>,
    cd: Arc<dyn CdClient>,
}

impl Reconciler {
    pub fn new(settings: Arc<Settings>, cd: Arc<dyn CdClient>) -> Self {
        Self { settings, cd }
    }

    /// Apply a normalized manifest to the CD API.
    ///
    /// Application ensure and upserts are fatal; stale deletion is
    /// best-effort. Not transactional: a mid-run failure leaves earlier
    /// upserts applied.
    pub async fn apply(&self, manifest: &Dinghyfile) -> Result<(), ReconcileError> {
        let application = &manifest.application;

        // duplicate desired names fault before any mutation
        let mut names = HashSet::new();
        for pipeline in &manifest.pipelines {
            if !names.insert(pipeline.name.as_str()) {
                return Err(ReconcileError::DuplicateName {
                    application: application.clone(),
                    name: pipeline.name.clone(),
                });
            }
        }

        self.ensure_application(manifest).await?;

        // snapshot current state: name → id, and which ids the fresh
        // render still accounts for
        let existing = self.cd.get_pipelines(application).await?;
        let mut seen: Vec<(String, bool)> = existing
            .iter()
            .filter_map(|p| p.id.clone())
            .map(|id| (id, false))
            .collect();

        for desired in &manifest.pipelines {
            let mut outgoing = desired.clone();
            if let Some(id) = existing
                .iter()
                .find(|p| p.name == desired.name)
                .and_then(|p| p.id.clone())
            {
                if let Some(entry) = seen.iter_mut().find(|(known, _)| *known == id) {
                    entry.1 = true;
                }
                outgoing.id = Some(id);
            }
            if self.settings.auto_lock() {
                outgoing.locked = Some(true);
            }
            info!(
                application = %application,
                pipeline = %outgoing.name,
                "upserting pipeline",
            );
            self.cd.upsert_pipeline(&outgoing).await?;
        }

        let sweep = manifest
            .delete_stale_pipelines
            .unwrap_or(self.settings.delete_stale_pipelines);
        if sweep {
            for (id, kept) in seen {
                if kept {
                    continue;
                }
                info!(application = %application, id = %id, "deleting stale pipeline");
                if let Err(e) = self.cd.delete_pipeline(&id).await {
                    warn!(application = %application, id = %id, error = %e, "stale delete failed");
                }
            }
        }

        Ok(())
    }

    /// Create the application when absent. A create that races another
    /// writer is retried once; a second failure surfaces.
    async fn ensure_application(&self, manifest: &Dinghyfile) -> Result<(), ReconcileError> {
        if self.cd.application_exists(&manifest.application).await? {
            return Ok(());
        }
        let spec = manifest.effective_spec(&self.settings.spec_email_default);
        info!(application = %manifest.application, "creating application");
        if let Err(first) = self.cd.create_application(&spec).await {
            warn!(
                application = %manifest.application,
                error = %first,
                "application create failed, retrying once",
            );
            self.cd.create_application(&spec).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
