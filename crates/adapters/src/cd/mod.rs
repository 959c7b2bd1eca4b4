// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CD control-plane client
//!
//! The reconciler sees [`CdClient`]; production traffic goes through
//! [`HttpCdClient`] with bounded retries on transient upstream failures.

mod http;

pub use http::HttpCdClient;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeCdClient;

use async_trait::async_trait;
use skiff_core::{AppSpec, Pipeline};
use thiserror::Error;

/// Errors from CD API calls
#[derive(Debug, Error)]
pub enum CdError {
    #[error("CD API transient failure ({status}) at {url}")]
    Transient { url: String, status: u16 },

    #[error("CD API permanent failure ({status}) at {url}")]
    Permanent { url: String, status: u16 },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Faulted(String),
}

/// Application and pipeline CRUD on the CD control plane.
#[async_trait]
pub trait CdClient: Send + Sync {
    async fn application_exists(&self, name: &str) -> Result<bool, CdError>;

    async fn create_application(&self, spec: &AppSpec) -> Result<(), CdError>;

    /// Current pipelines of an application. An unknown application yields
    /// an empty list.
    async fn get_pipelines(&self, application: &str) -> Result<Vec<Pipeline>, CdError>;

    /// Name-keyed upsert; an empty id is a create.
    async fn upsert_pipeline(&self, pipeline: &Pipeline) -> Result<(), CdError>;

    async fn delete_pipeline(&self, id: &str) -> Result<(), CdError>;
}
