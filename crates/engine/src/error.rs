// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types
//!
//! The first error aborts a render and is returned verbatim. At the push
//! boundary, malformed output maps to a 422 response and commit status
//! `failure`; every other category maps to 500 and status `error`.

use skiff_adapters::{CdError, FetchError};
use skiff_manifest::{PreprocessError, TemplateError, UnmarshalError};
use skiff_storage::StoreError;
use thiserror::Error;

/// Errors from rendering one root manifest.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("preprocess failed: {0}")]
    Preprocess(#[from] PreprocessError),

    #[error("template parse failed: {0}")]
    Parse(#[from] TemplateError),

    /// Template runtime faults: missing var without default, odd module
    /// argument count, non-string argument key.
    #[error("template execution failed: {0}")]
    Execute(String),

    #[error("module recursion revisits {url}")]
    Cycle { url: String },

    #[error("module recursion exceeded depth {depth} at {url}")]
    MaxDepth { depth: usize, url: String },

    #[error("globals of {url} must be a mapping")]
    MalformedGlobals { url: String },
}

/// Errors from reconciling a pipeline set.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Cd(#[from] CdError),

    #[error("duplicate pipeline name '{name}' in application '{application}'")]
    DuplicateName { application: String, name: String },
}

/// Push-level error, the union the webhook surface maps to responses.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("malformed rendered output: {0}")]
    Malformed(#[from] UnmarshalError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("dependency store failure: {0}")]
    Store(#[from] StoreError),

    #[error("push deadline of {0}s exceeded")]
    Deadline(u64),
}

impl EngineError {
    /// True for faults that mean "the manifest itself is bad": 422 at the
    /// HTTP surface and commit status `failure` rather than `error`.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            EngineError::Malformed(_) | EngineError::Render(RenderError::MalformedGlobals { .. })
        )
    }
}
