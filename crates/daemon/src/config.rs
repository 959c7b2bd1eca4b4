// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loading
//!
//! Settings come from an optional TOML file overlaid by environment
//! variables for the secrets and endpoints a deployment most often
//! injects. The result is immutable for the life of the process.

use skiff_core::Settings;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Default config location: `$SKIFF_CONFIG`, else
/// `~/.config/skiff/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SKIFF_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("skiff/config.toml"))
}

/// Load settings from `path` (skipped when absent) and apply environment
/// overrides.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut settings = match path {
        Some(path) if path.exists() => {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let parsed = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), "loaded config file");
            parsed
        }
        _ => Settings::default(),
    };

    apply_env_overrides(&mut settings);
    Ok(settings)
}

fn apply_env_overrides(settings: &mut Settings) {
    let overrides: &mut [(&str, &mut String)] = &mut [
        ("SKIFF_GITHUB_TOKEN", &mut settings.github_token),
        ("SKIFF_GITHUB_ENDPOINT", &mut settings.github_endpoint),
        ("SKIFF_STASH_USERNAME", &mut settings.stash_username),
        ("SKIFF_STASH_TOKEN", &mut settings.stash_token),
        ("SKIFF_STASH_ENDPOINT", &mut settings.stash_endpoint),
        (
            "SKIFF_BITBUCKET_CLOUD_USERNAME",
            &mut settings.bitbucket_cloud_username,
        ),
        (
            "SKIFF_BITBUCKET_CLOUD_TOKEN",
            &mut settings.bitbucket_cloud_token,
        ),
        (
            "SKIFF_FRONT_STORE_BASE_URL",
            &mut settings.front_store_base_url,
        ),
        ("SKIFF_PIPELINE_BASE_URL", &mut settings.pipeline_base_url),
        ("SKIFF_LISTEN_ADDR", &mut settings.listen_addr),
        ("SKIFF_LOG_LEVEL", &mut settings.log_level),
    ];
    for (key, slot) in overrides {
        if let Ok(value) = std::env::var(key) {
            **slot = value;
        }
    }

    if let Ok(url) = std::env::var("SKIFF_EVENTS_URL") {
        settings.events_url = Some(url);
    }
    if let Ok(path) = std::env::var("SKIFF_STORE_PATH") {
        settings.store_path = Some(PathBuf::from(path));
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
