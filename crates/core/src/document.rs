// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical pipeline document model
//!
//! A rendered root manifest parses into a [`Dinghyfile`] regardless of the
//! source format (JSON or HCL). Unknown pipeline fields are preserved
//! verbatim so the reconciler can forward them to the CD API untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Tolerate explicit `null` where a container is expected.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt = Option::<T>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Data-source enable/disable lists on an application spec.
///
/// Always serialized as arrays, never null, so downstream consumers
/// round-trip cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSources {
    #[serde(default, deserialize_with = "null_to_default")]
    pub enabled: Vec<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub disabled: Vec<String>,
}

/// Application metadata carried by a root manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "dataSources")]
    pub data_sources: DataSources,
}

/// An application-scoped pipeline.
///
/// `id` is assigned by the CD API; within one application pipeline names are
/// unique. Fields skiff does not interpret are kept in `rest`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub application: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The top-level rendered document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dinghyfile {
    #[serde(default)]
    pub application: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<AppSpec>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub globals: Map<String, Value>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub pipelines: Vec<Pipeline>,
    #[serde(
        default,
        rename = "deleteStalePipelines",
        skip_serializing_if = "Option::is_none"
    )]
    pub delete_stale_pipelines: Option<bool>,
}

impl Dinghyfile {
    /// Apply post-parse invariants: an empty spec name adopts the
    /// application name, an empty spec email adopts the configured default,
    /// and every pipeline carries the application name.
    pub fn normalize(&mut self, default_email: &str) {
        if let Some(spec) = &mut self.spec {
            if spec.name.is_empty() {
                spec.name = self.application.clone();
            }
            if spec.email.is_empty() {
                spec.email = default_email.to_string();
            }
        }
        for pipeline in &mut self.pipelines {
            if pipeline.application.is_empty() {
                pipeline.application = self.application.clone();
            }
        }
    }

    /// The application spec to send when the application has to be created,
    /// synthesized from the application name when the manifest has none.
    pub fn effective_spec(&self, default_email: &str) -> AppSpec {
        self.spec.clone().unwrap_or_else(|| AppSpec {
            name: self.application.clone(),
            email: default_email.to_string(),
            data_sources: DataSources::default(),
        })
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
