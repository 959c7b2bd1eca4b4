// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory CD client for tests

use super::{CdClient, CdError};
use async_trait::async_trait;
use parking_lot::Mutex;
use skiff_core::{AppSpec, Pipeline};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct FakeState {
    applications: HashSet<String>,
    pipelines: HashMap<String, Vec<Pipeline>>,
    upserts: Vec<Pipeline>,
    deleted: Vec<String>,
    create_failures: u32,
    fail_upserts: bool,
    fail_deletes: bool,
}

/// Records every mutation and assigns ids on create, like the real
/// control plane.
#[derive(Default)]
pub struct FakeCdClient {
    state: Mutex<FakeState>,
}

impl FakeCdClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_application(&self, name: impl Into<String>) {
        self.state.lock().applications.insert(name.into());
    }

    pub fn seed_pipeline(&self, application: &str, name: &str, id: &str) {
        let mut state = self.state.lock();
        state.applications.insert(application.to_string());
        state
            .pipelines
            .entry(application.to_string())
            .or_default()
            .push(Pipeline {
                name: name.to_string(),
                id: Some(id.to_string()),
                application: application.to_string(),
                ..Pipeline::default()
            });
    }

    /// Make the next `n` create_application calls fail.
    pub fn fail_next_creates(&self, n: u32) {
        self.state.lock().create_failures = n;
    }

    pub fn fail_upserts(&self, fail: bool) {
        self.state.lock().fail_upserts = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state.lock().fail_deletes = fail;
    }

    pub fn applications(&self) -> Vec<String> {
        let mut apps: Vec<_> = self.state.lock().applications.iter().cloned().collect();
        apps.sort();
        apps
    }

    pub fn pipelines(&self, application: &str) -> Vec<Pipeline> {
        self.state
            .lock()
            .pipelines
            .get(application)
            .cloned()
            .unwrap_or_default()
    }

    /// Every upsert in call order.
    pub fn upserts(&self) -> Vec<Pipeline> {
        self.state.lock().upserts.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().deleted.clone()
    }
}

#[async_trait]
impl CdClient for FakeCdClient {
    async fn application_exists(&self, name: &str) -> Result<bool, CdError> {
        Ok(self.state.lock().applications.contains(name))
    }

    async fn create_application(&self, spec: &AppSpec) -> Result<(), CdError> {
        let mut state = self.state.lock();
        if state.create_failures > 0 {
            state.create_failures -= 1;
            return Err(CdError::Faulted("application create failed".to_string()));
        }
        state.applications.insert(spec.name.clone());
        Ok(())
    }

    async fn get_pipelines(&self, application: &str) -> Result<Vec<Pipeline>, CdError> {
        Ok(self
            .state
            .lock()
            .pipelines
            .get(application)
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_pipeline(&self, pipeline: &Pipeline) -> Result<(), CdError> {
        let mut state = self.state.lock();
        if state.fail_upserts {
            return Err(CdError::Faulted("pipeline upsert failed".to_string()));
        }

        let mut stored = pipeline.clone();
        if stored.id.is_none() {
            stored.id = Some(uuid::Uuid::new_v4().to_string());
        }
        state.upserts.push(stored.clone());

        let entry = state
            .pipelines
            .entry(stored.application.clone())
            .or_default();
        match entry.iter_mut().find(|p| p.name == stored.name) {
            Some(existing) => *existing = stored,
            None => entry.push(stored),
        }
        Ok(())
    }

    async fn delete_pipeline(&self, id: &str) -> Result<(), CdError> {
        let mut state = self.state.lock();
        if state.fail_deletes {
            return Err(CdError::Faulted("pipeline delete failed".to_string()));
        }
        for pipelines in state.pipelines.values_mut() {
            pipelines.retain(|p| p.id.as_deref() != Some(id));
        }
        state.deleted.push(id.to_string());
        Ok(())
    }
}
