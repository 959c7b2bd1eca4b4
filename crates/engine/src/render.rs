// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive template expansion
//!
//! A render expands one root manifest: each `module` invocation fetches the
//! named template from the configured template repo, binds its arguments as
//! a new scope frame, expands it recursively, and splices the result in
//! place after field substitution. Every included module is recorded as a
//! dependency of the root.
//!
//! Globals need two passes: the first expansion's output is parsed to pull
//! out the `globals` mapping, and when one is present the root is expanded
//! again with globals as the outermost scope frame so every module sees
//! them.

use crate::error::RenderError;
use crate::vars::VarScope;
use serde_json::{Map, Value};
use skiff_adapters::{CdClient, FileFetcher};
use skiff_core::{RepoPath, Settings};
use skiff_manifest::{parse_any, parse_object, parse_template, parse_value, preprocess, to_text};
use skiff_manifest::{Action, Arg, Segment};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, warn};

/// The product of rendering one root.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub text: String,
    /// Every module pulled in transitively, in first-inclusion order.
    pub children: Vec<RepoPath>,
    /// The `globals` mapping extracted from the root, empty if absent.
    pub globals: Map<String, Value>,
}

pub struct Renderer {
    settings: Arc<Settings>,
    fetcher: Arc<dyn FileFetcher>,
    cd: Arc<dyn CdClient>,
}

/// Per-render state threaded through the recursion. No process-wide
/// anything: two renders never share a context.
struct RenderContext {
    children: Vec<RepoPath>,
    /// Active render stack of canonical URLs, for cycle detection.
    stack: Vec<String>,
    scope: VarScope,
}

impl Renderer {
    pub fn new(
        settings: Arc<Settings>,
        fetcher: Arc<dyn FileFetcher>,
        cd: Arc<dyn CdClient>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            cd,
        }
    }

    /// Expand `root` with caller-supplied bindings.
    pub async fn render(
        &self,
        root: &RepoPath,
        bindings: &[(String, Value)],
    ) -> Result<Rendered, RenderError> {
        let (text, children) = self.render_pass(root, bindings, Map::new()).await?;
        let globals = extract_globals(&text, root)?;
        if globals.is_empty() {
            return Ok(Rendered {
                text,
                children,
                globals,
            });
        }

        debug!(root = %root, globals = globals.len(), "re-rendering with globals in scope");
        let (text, children) = self.render_pass(root, bindings, globals.clone()).await?;
        Ok(Rendered {
            text,
            children,
            globals,
        })
    }

    async fn render_pass(
        &self,
        root: &RepoPath,
        bindings: &[(String, Value)],
        globals: Map<String, Value>,
    ) -> Result<(String, Vec<RepoPath>), RenderError> {
        let mut ctx = RenderContext {
            children: Vec::new(),
            stack: Vec::new(),
            scope: VarScope::new(),
        };
        if !globals.is_empty() {
            ctx.scope.push_outermost(globals);
        }
        ctx.scope.push(pairs_to_frame(bindings));

        let text = self.expand(root, bindings, &mut ctx).await?;
        Ok((text, ctx.children))
    }

    /// Expand one template. `invocation` is the argument list the template
    /// was invoked with; it participates in field substitution of nested
    /// modules.
    fn expand<'a>(
        &'a self,
        path: &'a RepoPath,
        invocation: &'a [(String, Value)],
        ctx: &'a mut RenderContext,
    ) -> Pin<Box<dyn Future<Output = Result<String, RenderError>> + Send + 'a>> {
        Box::pin(async move {
            let url = path.encode_url();
            if ctx.stack.contains(&url) {
                return Err(RenderError::Cycle { url });
            }
            if ctx.stack.len() >= self.settings.max_render_depth {
                return Err(RenderError::MaxDepth {
                    depth: self.settings.max_render_depth,
                    url,
                });
            }

            ctx.stack.push(url);
            let result = self.expand_segments(path, invocation, ctx).await;
            ctx.stack.pop();
            result
        })
    }

    async fn expand_segments(
        &self,
        path: &RepoPath,
        invocation: &[(String, Value)],
        ctx: &mut RenderContext,
    ) -> Result<String, RenderError> {
        let raw = self.fetcher.download(path).await?;
        let preprocessed = preprocess(&raw)?;
        let segments = parse_template(&preprocessed)?;

        let mut out = String::with_capacity(preprocessed.len());
        for segment in segments {
            match segment {
                Segment::Text(text) => out.push_str(&text),
                Segment::Action(Action::Module { name, args })
                | Segment::Action(Action::AppModule { name, args }) => {
                    let spliced = self.expand_module(path, &name, &args, invocation, ctx).await?;
                    out.push_str(&spliced);
                }
                Segment::Action(Action::Var {
                    name,
                    default,
                    fallback_on_empty,
                }) => {
                    let value = self.resolve_var(&name, default.as_ref(), fallback_on_empty, ctx)?;
                    out.push_str(&value_text(&value));
                }
                Segment::Action(Action::PipelineId {
                    application,
                    pipeline,
                }) => {
                    out.push_str(&self.lookup_pipeline_id(&application, &pipeline).await);
                }
            }
        }
        Ok(out)
    }

    async fn expand_module(
        &self,
        caller: &RepoPath,
        name: &str,
        args: &[Arg],
        invocation: &[(String, Value)],
        ctx: &mut RenderContext,
    ) -> Result<String, RenderError> {
        let child = self.module_path(caller, name);
        ctx.children.push(child.clone());

        let child_pairs = bind_pairs(args, name)?;

        ctx.scope.push(pairs_to_frame(&child_pairs));
        let rendered = self.expand(&child, &child_pairs, ctx).await;
        ctx.scope.pop();
        let rendered = rendered?;

        // Field substitution: keys the caller passed override matching
        // top-level keys of the module's output; the enclosing template's
        // own invocation args apply after, last write wins.
        match parse_object(&rendered) {
            Some((format, mut map)) => {
                for (key, value) in child_pairs.iter().chain(invocation.iter()) {
                    if map.contains_key(key) {
                        map.insert(key.clone(), value.clone());
                    }
                }
                to_text(format, &map).map_err(|e| {
                    RenderError::Execute(format!(
                        "could not re-serialize module {name} after substitution: {e}"
                    ))
                })
            }
            // scalar or free-form module output splices verbatim
            None => Ok(rendered),
        }
    }

    fn resolve_var(
        &self,
        name: &str,
        default: Option<&Arg>,
        fallback_on_empty: bool,
        ctx: &RenderContext,
    ) -> Result<Value, RenderError> {
        let resolved = ctx.scope.resolve(name).cloned();
        let bound = match resolved {
            Some(v) if fallback_on_empty && value_is_empty(&v) => None,
            other => other,
        };
        if let Some(value) = bound {
            return Ok(value);
        }
        match default {
            // "@name" defers to another variable, usually a global
            Some(Arg::Str(reference)) if reference.starts_with('@') => Ok(ctx
                .scope
                .resolve(&reference[1..])
                .cloned()
                .unwrap_or(Value::String(String::new()))),
            Some(arg) => Ok(arg_value(arg)),
            None if self.settings.lenient_vars => Ok(Value::String(String::new())),
            None => Err(RenderError::Execute(format!(
                "var \"{name}\" is not bound and has no default"
            ))),
        }
    }

    async fn lookup_pipeline_id(&self, application: &str, pipeline: &str) -> String {
        match self.cd.get_pipelines(application).await {
            Ok(pipelines) => pipelines
                .into_iter()
                .find(|p| p.name == pipeline)
                .and_then(|p| p.id)
                .unwrap_or_default(),
            Err(e) => {
                // a missing pipeline renders as empty, never fails the render
                warn!(application, pipeline, error = %e, "pipelineID lookup failed");
                String::new()
            }
        }
    }

    /// Modules resolve against the configured template repo on its default
    /// branch; an unset template org falls back to the caller's.
    fn module_path(&self, caller: &RepoPath, name: &str) -> RepoPath {
        let org = if self.settings.template_org.is_empty() {
            caller.org.clone()
        } else {
            self.settings.template_org.clone()
        };
        RepoPath::new(
            caller.provider,
            org,
            self.settings.template_repo.clone(),
            name,
        )
    }
}

/// Interpret a module argument list pairwise as `(key, value)`.
fn bind_pairs(args: &[Arg], module: &str) -> Result<Vec<(String, Value)>, RenderError> {
    if args.len() % 2 != 0 {
        return Err(RenderError::Execute(format!(
            "invalid number of args to module {module}"
        )));
    }
    let mut pairs = Vec::with_capacity(args.len() / 2);
    for chunk in args.chunks(2) {
        let key = chunk[0].as_key().ok_or_else(|| {
            RenderError::Execute(format!("dict keys must be strings in module {module}"))
        })?;
        pairs.push((key.to_string(), arg_value(&chunk[1])));
    }
    Ok(pairs)
}

/// Convert an argument literal to a value, re-parsing stringified
/// structured literals (the preprocess round-trip).
fn arg_value(arg: &Arg) -> Value {
    match arg {
        Arg::Str(s) => parse_value(s).unwrap_or_else(|| Value::String(s.clone())),
        Arg::Number(n) => Value::Number(n.clone()),
        Arg::Bool(b) => Value::Bool(*b),
        Arg::Null => Value::Null,
        Arg::Raw(r) => parse_value(r).unwrap_or_else(|| Value::String(r.clone())),
    }
}

fn pairs_to_frame(pairs: &[(String, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// How a value splices into template output: strings bare, null empty,
/// everything else as JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn value_is_empty(value: &Value) -> bool {
    matches!(value, Value::Null) || matches!(value, Value::String(s) if s.is_empty())
}

/// Pull the `globals` mapping out of a rendered root. Output that parses
/// to a non-mapping, or a `globals` value that is not a mapping, is a
/// malformed-globals fault; unparseable output is left for the
/// unmarshaller stage to judge.
fn extract_globals(text: &str, root: &RepoPath) -> Result<Map<String, Value>, RenderError> {
    let Some(value) = parse_any(text) else {
        return Ok(Map::new());
    };
    match value {
        Value::Object(map) => match map.get("globals") {
            None => Ok(Map::new()),
            Some(Value::Object(globals)) => Ok(globals.clone()),
            Some(_) => Err(RenderError::MalformedGlobals {
                url: root.encode_url(),
            }),
        },
        _ => Err(RenderError::MalformedGlobals {
            url: root.encode_url(),
        }),
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
