// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! skiffd
//!
//! Webhook daemon: receives push notifications from hosted git services,
//! renders the touched pipeline manifests, and reconciles the result
//! against the CD control plane.

use skiff_adapters::{
    BitbucketCloudFetcher, CachedFetcher, CdClient, Dispatcher, EventSink, FileFetcher,
    GithubFetcher, GithubStatusNotifier, HttpCdClient, HttpSink, LogSink, RoutingFetcher,
    RoutingStatusNotifier, StashFetcher,
};
use skiff_core::{Provider, Settings};
use skiff_daemon::{build_router, load_settings, AppContext};
use skiff_engine::PipelineBuilder;
use skiff_storage::{DependencyGraph, FileStore, MemoryStore, RelationStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("skiffd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" => {
                println!("skiffd {}", env!("CARGO_PKG_VERSION"));
                println!("Pipeline-templating webhook daemon");
                println!();
                println!("USAGE:");
                println!("    skiffd");
                println!();
                println!("Configuration is read from $SKIFF_CONFIG (or");
                println!("~/.config/skiff/config.toml) plus SKIFF_* environment");
                println!("overrides; see the README for the full list.");
                return Ok(());
            }
            other => {
                eprintln!("error: unexpected argument '{other}'");
                eprintln!("Usage: skiffd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config_path = skiff_daemon::config::default_config_path();
    let settings = Arc::new(load_settings(config_path.as_deref())?);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    info!(listen = %settings.listen_addr, "starting skiffd");

    let ctx = app_context(settings.clone())?;
    let listener = tokio::net::TcpListener::bind(&settings.listen_addr).await?;
    axum::serve(listener, build_router(ctx)).await?;
    Ok(())
}

fn app_context(settings: Arc<Settings>) -> anyhow::Result<Arc<AppContext>> {
    let fetcher: Arc<dyn FileFetcher> = Arc::new(CachedFetcher::new(Arc::new(
        RoutingFetcher::new()
            .with(
                Provider::Github,
                Arc::new(GithubFetcher::new(
                    settings.github_endpoint.clone(),
                    settings.github_token.clone(),
                )),
            )
            .with(
                Provider::Stash,
                Arc::new(StashFetcher::new(
                    settings.stash_endpoint.clone(),
                    settings.stash_username.clone(),
                    settings.stash_token.clone(),
                )),
            )
            .with(
                Provider::BitbucketCloud,
                Arc::new(BitbucketCloudFetcher::new(
                    settings.bitbucket_cloud_endpoint.clone(),
                    settings.bitbucket_cloud_username.clone(),
                    settings.bitbucket_cloud_token.clone(),
                )),
            ),
    )));

    let cd: Arc<dyn CdClient> = Arc::new(HttpCdClient::new(
        settings.front_store_base_url.clone(),
        settings.pipeline_base_url.clone(),
    ));

    let store: Arc<dyn RelationStore> = match &settings.store_path {
        Some(path) => {
            info!(path = %path.display(), "using file-backed dependency store");
            Arc::new(FileStore::open(path)?)
        }
        None => {
            info!("using in-memory dependency store");
            Arc::new(MemoryStore::new())
        }
    };
    let graph = Arc::new(DependencyGraph::new(store));

    let status = Arc::new(RoutingStatusNotifier::new().with(
        Provider::Github,
        Arc::new(GithubStatusNotifier::new(
            settings.github_endpoint.clone(),
            settings.github_token.clone(),
            settings.ui_base_url.clone(),
        )),
    ));

    let mut sinks: Vec<Arc<dyn EventSink>> = vec![Arc::new(LogSink)];
    if let Some(url) = &settings.events_url {
        info!(url = %url, "remote event sink enabled");
        sinks.push(Arc::new(HttpSink::new(
            url.clone(),
            settings.events_version.clone(),
        )));
    }
    let events = Dispatcher::new(sinks);

    let builder = Arc::new(PipelineBuilder::new(
        settings.clone(),
        fetcher,
        cd.clone(),
        graph,
        status,
        events.clone(),
    ));

    Ok(Arc::new(AppContext {
        settings,
        builder,
        cd,
        events,
    }))
}
