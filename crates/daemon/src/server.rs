// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface
//!
//! Route table:
//!
//! | path | method | behavior |
//! |---|---|---|
//! | `/`, `/health`, `/healthcheck` | GET | liveness |
//! | `/v1/webhooks/github` | POST | GitHub push |
//! | `/v1/webhooks/stash` | POST | legacy Bitbucket Server push |
//! | `/v1/webhooks/bitbucket` | POST | modern Bitbucket Server push, `eventKey`-filtered |
//! | `/v1/webhooks/bitbucket-cloud` | POST | Bitbucket Cloud push |
//! | `/v1/updatePipeline` | POST | render the raw body as a root manifest |
//!
//! A malformed render answers 422; fetch, CD, and store faults answer 500.

use crate::webhooks::{BitbucketCloudWebhook, GithubWebhook, StashWebhook};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use skiff_adapters::{CdClient, Dispatcher, MemoryFetcher, NoopStatusNotifier};
use skiff_core::{Provider, Push, RepoPath, Settings};
use skiff_engine::PipelineBuilder;
use skiff_storage::{DependencyGraph, MemoryStore};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

pub struct AppContext {
    pub settings: Arc<Settings>,
    pub builder: Arc<PipelineBuilder>,
    pub cd: Arc<dyn CdClient>,
    pub events: Dispatcher,
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/healthcheck", get(health))
        .route("/v1/webhooks/github", post(github_webhook))
        .route("/v1/webhooks/stash", post(stash_webhook))
        .route("/v1/webhooks/bitbucket", post(bitbucket_webhook))
        .route("/v1/webhooks/bitbucket-cloud", post(bitbucket_cloud_webhook))
        .route("/v1/updatePipeline", post(update_pipeline))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn github_webhook(
    State(ctx): State<Arc<AppContext>>,
    Json(payload): Json<GithubWebhook>,
) -> (StatusCode, Json<Value>) {
    handle(&ctx, payload.into_push()).await
}

async fn stash_webhook(
    State(ctx): State<Arc<AppContext>>,
    Json(payload): Json<StashWebhook>,
) -> (StatusCode, Json<Value>) {
    handle(&ctx, payload.into_push()).await
}

async fn bitbucket_webhook(
    State(ctx): State<Arc<AppContext>>,
    Json(payload): Json<StashWebhook>,
) -> (StatusCode, Json<Value>) {
    if !payload.is_refs_changed() {
        info!(event_key = ?payload.event_key, "ignoring non-push bitbucket event");
        return accepted();
    }
    handle(&ctx, payload.into_push()).await
}

async fn bitbucket_cloud_webhook(
    State(ctx): State<Arc<AppContext>>,
    Json(payload): Json<BitbucketCloudWebhook>,
) -> (StatusCode, Json<Value>) {
    handle(&ctx, payload.into_push()).await
}

/// Render the raw request body as a root manifest through an in-memory
/// file service, reconciling against the real CD API. Used for local
/// manifest debugging without a git round-trip.
async fn update_pipeline(
    State(ctx): State<Arc<AppContext>>,
    body: String,
) -> (StatusCode, Json<Value>) {
    let filename = ctx.settings.dinghy_filename.clone();
    let fetcher = MemoryFetcher::new();
    fetcher.insert(filename.clone(), body);

    let builder = PipelineBuilder::new(
        ctx.settings.clone(),
        Arc::new(fetcher),
        ctx.cd.clone(),
        Arc::new(DependencyGraph::new(Arc::new(MemoryStore::new()))),
        Arc::new(NoopStatusNotifier),
        ctx.events.clone(),
    );

    let root = RepoPath::new(Provider::Memory, "local", "local", filename);
    match builder.process_root(&root).await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "ok"}))),
        Err(e) => {
            error!(error = %e, "manual pipeline update failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "error": e.to_string()})),
            )
        }
    }
}

async fn handle(ctx: &AppContext, push: Push) -> (StatusCode, Json<Value>) {
    info!(
        org = %push.org,
        repo = %push.repo,
        files = push.files.len(),
        "webhook push received",
    );
    match ctx.builder.handle_push(&push).await {
        Ok(()) => accepted(),
        Err(e) if e.is_malformed() => {
            error!(error = %e, "push produced malformed output");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"status": "malformed", "error": e.to_string()})),
            )
        }
        Err(e) => {
            error!(error = %e, "push failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": "error", "error": e.to_string()})),
            )
        }
    }
}

fn accepted() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({"status": "accepted"})))
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
