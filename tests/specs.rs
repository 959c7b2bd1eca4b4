// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios across the whole stack: webhook-shaped pushes
//! through render, dependency recording, parsing, and reconciliation,
//! using the in-memory file service, relation store, and CD client.

use serde_json::json;
use skiff_adapters::{Dispatcher, FakeCdClient, FakeStatusNotifier, MemoryFetcher};
use skiff_core::{CommitStatus, Provider, Push, RepoPath, Settings};
use skiff_engine::{PipelineBuilder, Renderer};
use skiff_storage::{DependencyGraph, FileStore, MemoryStore};
use std::sync::Arc;

fn settings() -> Settings {
    Settings {
        auto_lock_pipelines: "false".to_string(),
        template_repo: "repo".to_string(),
        ..Settings::default()
    }
}

struct World {
    builder: PipelineBuilder,
    cd: Arc<FakeCdClient>,
    status: Arc<FakeStatusNotifier>,
}

fn world(files: &[(&str, &str)], settings: Settings) -> World {
    let fetcher = MemoryFetcher::new();
    for (path, contents) in files {
        fetcher.insert(*path, *contents);
    }
    let cd = Arc::new(FakeCdClient::new());
    let status = Arc::new(FakeStatusNotifier::new());
    let builder = PipelineBuilder::new(
        Arc::new(settings),
        Arc::new(fetcher),
        cd.clone(),
        Arc::new(DependencyGraph::new(Arc::new(MemoryStore::new()))),
        status.clone(),
        Dispatcher::disabled(),
    );
    World {
        builder,
        cd,
        status,
    }
}

fn push(files: &[&str]) -> Push {
    Push {
        provider: Provider::Memory,
        org: "org".to_string(),
        repo: "repo".to_string(),
        branch: None,
        files: files.iter().map(|f| f.to_string()).collect(),
        commits: vec!["head-sha".to_string()],
    }
}

// Scenario: a module's fields are overridden by scalar and structured
// call arguments.
#[tokio::test]
async fn simple_wait_stage_renders_with_substituted_fields() {
    let files = [
        (
            "dinghyfile",
            r#"{"stages":[{{ module "wait.stage.module" "waitTime" 10 "refId" { "c": "d" } "requisiteStageRefIds" ["1","2","3"] }}]}"#,
        ),
        (
            "wait.stage.module",
            r#"{
                "name": "Wait",
                "refId": {},
                "requisiteStageRefIds": [],
                "type": "wait",
                "waitTime": 12044
            }"#,
        ),
    ];
    let renderer = Renderer::new(
        Arc::new(settings()),
        Arc::new(MemoryFetcher::seeded(files)),
        Arc::new(FakeCdClient::new()),
    );

    let rendered = renderer
        .render(&RepoPath::new(Provider::Memory, "org", "repo", "dinghyfile"), &[])
        .await
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&rendered.text).unwrap();
    assert_eq!(
        parsed,
        json!({
            "stages": [{
                "name": "Wait",
                "refId": {"c": "d"},
                "requisiteStageRefIds": ["1", "2", "3"],
                "type": "wait",
                "waitTime": 10
            }]
        })
    );
}

// Scenario: variables fall through nested module scopes.
#[tokio::test]
async fn nested_variable_fallthrough() {
    let files = [
        ("dinghyfile", r#"{{ module "mod4" "foo" "baz" "waitTime" 100 }}"#),
        (
            "mod4",
            r#"{
                "foo": "{{ var "foo" "baz" }}",
                "a": "{{ var "nonexistent" "b" }}",
                "nested": {{ module "mod5" }}
            }"#,
        ),
        ("mod5", r#"{ "waitTime": {{ var "waitTime" 1000 }} }"#),
    ];
    let renderer = Renderer::new(
        Arc::new(settings()),
        Arc::new(MemoryFetcher::seeded(files)),
        Arc::new(FakeCdClient::new()),
    );

    let rendered = renderer
        .render(&RepoPath::new(Provider::Memory, "org", "repo", "dinghyfile"), &[])
        .await
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&rendered.text).unwrap();
    assert_eq!(parsed["foo"], "baz");
    assert_eq!(parsed["a"], "b");
    assert_eq!(parsed["nested"]["waitTime"], 100);
}

// Scenario: stale sweep deletes pipelines missing from the fresh render,
// preserving ids of the survivors.
#[tokio::test]
async fn stale_sweep_upserts_and_deletes() {
    let root = r#"{
        "application": "app",
        "deleteStalePipelines": true,
        "pipelines": [ { "name": "A" }, { "name": "B" } ]
    }"#;
    let w = world(&[("dinghyfile", root)], settings());
    w.cd.seed_pipeline("app", "A", "id-a");
    w.cd.seed_pipeline("app", "B", "id-b");
    w.cd.seed_pipeline("app", "C", "id-c");

    w.builder.handle_push(&push(&["dinghyfile"])).await.unwrap();

    let upserts = w.cd.upserts();
    assert_eq!(upserts.len(), 2);
    assert_eq!(upserts[0].id.as_deref(), Some("id-a"));
    assert_eq!(upserts[1].id.as_deref(), Some("id-b"));
    assert_eq!(w.cd.deleted(), vec!["id-c".to_string()]);
}

// Scenario: a push touching only a shared module rebuilds each root that
// references it, exactly once, across a process restart.
#[tokio::test]
async fn module_push_rebuilds_roots_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("deps.json");
    let files = [
        (
            "dinghyfile",
            r#"{"application": "app", "pipelines": [{{ module "shared.module" }}]}"#,
        ),
        ("shared.module", r#"{ "name": "p" }"#),
    ];

    let build = |cd: Arc<FakeCdClient>| {
        let fetcher = MemoryFetcher::new();
        for (path, contents) in &files {
            fetcher.insert(*path, *contents);
        }
        PipelineBuilder::new(
            Arc::new(settings()),
            Arc::new(fetcher),
            cd,
            Arc::new(DependencyGraph::new(Arc::new(
                FileStore::open(&store_path).unwrap(),
            ))),
            Arc::new(FakeStatusNotifier::new()),
            Dispatcher::disabled(),
        )
    };

    // first process records the dependency edge and exits
    let cd = Arc::new(FakeCdClient::new());
    build(cd.clone())
        .handle_push(&push(&["dinghyfile"]))
        .await
        .unwrap();
    assert_eq!(cd.upserts().len(), 1);

    // a new process sees the module push and rebuilds the root once
    let cd2 = Arc::new(FakeCdClient::new());
    build(cd2.clone())
        .handle_push(&push(&["shared.module"]))
        .await
        .unwrap();
    assert_eq!(cd2.upserts().len(), 1);
}

// Scenario: a rendered root whose globals field is a list is malformed,
// reported as commit status failure.
#[tokio::test]
async fn malformed_globals_fails_the_push() {
    let w = world(
        &[("dinghyfile", r#"{ "globals": ["foo", "bar"] }"#)],
        settings(),
    );

    let err = w
        .builder
        .handle_push(&push(&["dinghyfile"]))
        .await
        .unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(
        w.status.statuses(),
        vec![CommitStatus::Pending, CommitStatus::Failure]
    );
    assert!(w.cd.upserts().is_empty());
}

// Scenario: one terminal status per successful push.
#[tokio::test]
async fn successful_push_reports_pending_then_success() {
    let root = r#"{"application": "app", "pipelines": [{ "name": "p" }]}"#;
    let w = world(&[("dinghyfile", root)], settings());

    w.builder.handle_push(&push(&["dinghyfile"])).await.unwrap();
    assert_eq!(
        w.status.statuses(),
        vec![CommitStatus::Pending, CommitStatus::Success]
    );
}

// Auto-lock applies to every pipeline the reconciler emits.
#[tokio::test]
async fn auto_lock_locks_all_emitted_pipelines() {
    let root = r#"{"application": "app", "pipelines": [{ "name": "a" }, { "name": "b" }]}"#;
    let w = world(
        &[("dinghyfile", root)],
        Settings {
            auto_lock_pipelines: "true".to_string(),
            template_repo: "repo".to_string(),
            ..Settings::default()
        },
    );

    w.builder.handle_push(&push(&["dinghyfile"])).await.unwrap();
    let upserts = w.cd.upserts();
    assert_eq!(upserts.len(), 2);
    assert!(upserts.iter().all(|p| p.locked == Some(true)));
}

// An HCL root travels the same path as JSON.
#[tokio::test]
async fn hcl_manifest_renders_and_reconciles() {
    let root = r#"
        application = "search"

        pipelines = [
            { {{ module "mod1" }} }
        ]
    "#;
    let w = world(
        &[("dinghyfile", root), ("mod1", r#"name = "deploy""#)],
        settings(),
    );

    w.builder.handle_push(&push(&["dinghyfile"])).await.unwrap();
    assert_eq!(w.cd.applications(), vec!["search".to_string()]);
    let pipelines = w.cd.pipelines("search");
    assert_eq!(pipelines.len(), 1);
    assert_eq!(pipelines[0].name, "deploy");
}
