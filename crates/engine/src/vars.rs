// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Variable scope stack for template expansion

use serde_json::{Map, Value};

/// An ordered stack of binding frames, innermost last.
///
/// `var` resolution searches from innermost to outermost. Globals from the
/// enclosing root form the outermost frame; each module invocation pushes a
/// frame of its named arguments for the duration of its expansion.
#[derive(Debug, Clone, Default)]
pub struct VarScope {
    frames: Vec<Map<String, Value>>,
}

impl VarScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an innermost frame.
    pub fn push(&mut self, frame: Map<String, Value>) {
        self.frames.push(frame);
    }

    /// Pop the innermost frame, restoring the caller's scope.
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Install `frame` as the outermost frame, below everything pushed so
    /// far.
    pub fn push_outermost(&mut self, frame: Map<String, Value>) {
        self.frames.insert(0, frame);
    }

    /// Resolve `key`, innermost frame first.
    pub fn resolve(&self, key: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn innermost_frame_wins() {
        let mut scope = VarScope::new();
        scope.push(frame(&[("waitTime", json!(1000))]));
        scope.push(frame(&[("waitTime", json!(100))]));
        assert_eq!(scope.resolve("waitTime"), Some(&json!(100)));
    }

    #[test]
    fn outer_frames_remain_visible() {
        let mut scope = VarScope::new();
        scope.push(frame(&[("foo", json!("baz"))]));
        scope.push(frame(&[]));
        assert_eq!(scope.resolve("foo"), Some(&json!("baz")));
    }

    #[test]
    fn pop_restores_caller_scope() {
        let mut scope = VarScope::new();
        scope.push(frame(&[("k", json!("outer"))]));
        scope.push(frame(&[("k", json!("inner"))]));
        scope.pop();
        assert_eq!(scope.resolve("k"), Some(&json!("outer")));
    }

    #[test]
    fn globals_sit_below_everything() {
        let mut scope = VarScope::new();
        scope.push(frame(&[("type", json!("foobar"))]));
        scope.push_outermost(frame(&[("type", json!("foo")), ("team", json!("search"))]));
        assert_eq!(scope.resolve("type"), Some(&json!("foobar")));
        assert_eq!(scope.resolve("team"), Some(&json!("search")));
    }

    #[test]
    fn unbound_key_is_none() {
        let scope = VarScope::new();
        assert_eq!(scope.resolve("missing"), None);
    }
}
