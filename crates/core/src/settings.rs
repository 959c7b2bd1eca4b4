// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed service configuration
//!
//! Settings are loaded once at startup and treated as immutable; the
//! renderer, reconciler, and webhook handlers all receive the value
//! explicitly. Reconfiguration requires a restart.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Basename that identifies root manifests in a push.
    pub dinghy_filename: String,
    /// Where `module "x"` lookups resolve.
    pub template_org: String,
    pub template_repo: String,
    /// "true"/"false"; kept as a string for parity with legacy config files.
    pub auto_lock_pipelines: String,
    /// Global stale-sweep policy; a root manifest may override it.
    pub delete_stale_pipelines: bool,

    // Git providers
    pub github_endpoint: String,
    pub github_token: String,
    pub stash_endpoint: String,
    pub stash_username: String,
    pub stash_token: String,
    pub bitbucket_cloud_endpoint: String,
    pub bitbucket_cloud_username: String,
    pub bitbucket_cloud_token: String,

    // CD API
    /// Application store (create/get applications).
    pub front_store_base_url: String,
    /// Pipeline CRUD.
    pub pipeline_base_url: String,
    /// Linked from commit statuses.
    pub ui_base_url: String,

    // Remote event sink; disabled when unset
    pub events_url: Option<String>,
    pub events_version: String,

    /// File-backed dependency store; in-memory when unset.
    pub store_path: Option<PathBuf>,

    /// Only process pushes to this branch when set.
    pub repository_branch: Option<String>,
    pub push_timeout_secs: u64,
    pub max_render_depth: usize,
    /// When true, `var` with no binding and no default renders empty
    /// instead of failing the render.
    pub lenient_vars: bool,
    pub spec_email_default: String,

    pub listen_addr: String,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dinghy_filename: "dinghyfile".to_string(),
            template_org: String::new(),
            template_repo: "dinghy-templates".to_string(),
            auto_lock_pipelines: "true".to_string(),
            delete_stale_pipelines: false,
            github_endpoint: "https://api.github.com".to_string(),
            github_token: String::new(),
            stash_endpoint: "http://localhost:7990/rest/api/1.0".to_string(),
            stash_username: String::new(),
            stash_token: String::new(),
            bitbucket_cloud_endpoint: "https://api.bitbucket.org/2.0".to_string(),
            bitbucket_cloud_username: String::new(),
            bitbucket_cloud_token: String::new(),
            front_store_base_url: "http://front50:8080".to_string(),
            pipeline_base_url: "http://orca:8083".to_string(),
            ui_base_url: String::new(),
            events_url: None,
            events_version: String::new(),
            store_path: None,
            repository_branch: None,
            push_timeout_secs: 300,
            max_render_depth: 10,
            lenient_vars: false,
            spec_email_default: "unknown@unknown.com".to_string(),
            listen_addr: "0.0.0.0:8081".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn auto_lock(&self) -> bool {
        self.auto_lock_pipelines == "true"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let s = Settings::default();
        assert_eq!(s.dinghy_filename, "dinghyfile");
        assert_eq!(s.template_repo, "dinghy-templates");
        assert!(s.auto_lock());
        assert!(!s.delete_stale_pipelines);
        assert_eq!(s.max_render_depth, 10);
        assert_eq!(s.push_timeout_secs, 300);
    }

    #[test]
    fn auto_lock_is_string_typed() {
        let s = Settings {
            auto_lock_pipelines: "false".to_string(),
            ..Settings::default()
        };
        assert!(!s.auto_lock());
    }

    #[test]
    fn partial_toml_overlays_defaults() {
        let s: Settings = toml::from_str(
            r#"
            template_org = "armory"
            delete_stale_pipelines = true
            "#,
        )
        .unwrap();
        assert_eq!(s.template_org, "armory");
        assert!(s.delete_stale_pipelines);
        assert_eq!(s.dinghy_filename, "dinghyfile");
    }
}
