// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn set() -> Vec<Box<dyn Unmarshaller>> {
    vec![Box::new(JsonUnmarshaller), Box::new(HclUnmarshaller)]
}

#[test]
fn json_document() {
    let text = r#"{
        "application": "search",
        "globals": {"type": "foo"},
        "pipelines": [{"name": "deploy", "stages": []}]
    }"#;
    let df = unmarshal_any(&set(), text).unwrap();
    assert_eq!(df.application, "search");
    assert_eq!(df.globals["type"], serde_json::json!("foo"));
    assert_eq!(df.pipelines.len(), 1);
    assert_eq!(df.pipelines[0].name, "deploy");
}

#[test]
fn hcl_document() {
    let text = r#"
        application = "search"

        globals = {
          type = "foo"
        }

        pipelines = [
          {
            name = "deploy"
          }
        ]
    "#;
    let df = unmarshal_any(&set(), text).unwrap();
    assert_eq!(df.application, "search");
    assert_eq!(df.globals["type"], serde_json::json!("foo"));
    assert_eq!(df.pipelines[0].name, "deploy");
}

#[test]
fn hcl_spec_block() {
    let text = r#"
        application = "search"

        spec = {
          name = ""
          email = ""
          dataSources = {
            enabled = ["canaryConfigs"]
            disabled = []
          }
        }
    "#;
    let df = unmarshal_any(&set(), text).unwrap();
    let spec = df.spec.unwrap();
    assert_eq!(spec.data_sources.enabled, vec!["canaryConfigs".to_string()]);
    assert!(spec.data_sources.disabled.is_empty());
}

#[test]
fn data_sources_default_to_empty_arrays() {
    let df = unmarshal_any(&set(), r#"{"application": "a", "spec": {"name": "a"}}"#).unwrap();
    let spec = df.spec.unwrap();
    assert!(spec.data_sources.enabled.is_empty());
    assert!(spec.data_sources.disabled.is_empty());
    // serialized form carries arrays, never null
    let out = serde_json::to_value(&spec).unwrap();
    assert_eq!(out["dataSources"]["enabled"], serde_json::json!([]));
}

#[test]
fn list_document_is_rejected() {
    let err = unmarshal_any(&set(), r#"["foo", "bar"]"#).unwrap_err();
    assert!(matches!(err, UnmarshalError::Unrecognized { .. }));
}

#[test]
fn garbage_is_rejected_with_both_failures() {
    let err = unmarshal_any(&set(), "{{ nope").unwrap_err();
    match err {
        UnmarshalError::Unrecognized { detail } => {
            assert!(detail.contains("json"));
            assert!(detail.contains("hcl"));
        }
        other => panic!("expected unrecognized, got {other}"),
    }
}

#[test]
fn parse_object_detects_json() {
    let (format, map) = parse_object(r#"{"type": "wait", "waitTime": 12044}"#).unwrap();
    assert_eq!(format, DocFormat::Json);
    assert_eq!(map["waitTime"], serde_json::json!(12044));
}

#[test]
fn parse_object_detects_hcl() {
    let (format, map) = parse_object("type = \"wait\"\nwaitTime = 12044\n").unwrap();
    assert_eq!(format, DocFormat::Hcl);
    assert_eq!(map["type"], serde_json::json!("wait"));
}

#[test]
fn parse_object_rejects_scalars() {
    assert!(parse_object("12044").is_none());
    assert!(parse_object("\"wait\"").is_none());
}

#[test]
fn to_text_round_trips_json() {
    let (format, map) = parse_object(r#"{"a": 1, "b": {"c": [2]}}"#).unwrap();
    let text = to_text(format, &map).unwrap();
    let (_, again) = parse_object(&text).unwrap();
    assert_eq!(map, again);
}

#[test]
fn to_text_round_trips_hcl() {
    let (format, map) = parse_object("a = 1\nb = \"x\"\n").unwrap();
    assert_eq!(format, DocFormat::Hcl);
    let text = to_text(format, &map).unwrap();
    let (_, again) = parse_object(&text).unwrap();
    assert_eq!(map, again);
}

#[test]
fn parse_value_reparses_stringified_json() {
    assert_eq!(
        parse_value(r#"{"c": "d"}"#),
        Some(serde_json::json!({"c": "d"}))
    );
    assert_eq!(
        parse_value(r#"["1", "2", "3"]"#),
        Some(serde_json::json!(["1", "2", "3"]))
    );
}

#[test]
fn parse_value_reparses_hcl_object_expressions() {
    assert_eq!(
        parse_value(r#"{ "c" = "d" }"#),
        Some(serde_json::json!({"c": "d"}))
    );
}

#[test]
fn parse_value_leaves_plain_strings() {
    assert_eq!(parse_value("baz"), None);
    assert_eq!(parse_value(""), None);
    assert_eq!(parse_value("{not balanced"), None);
}

#[test]
fn json_tried_before_hcl() {
    // valid in both syntaxes only as JSON object
    let (format, _) = parse_object(r#"{"a": 1}"#).unwrap();
    assert_eq!(format, DocFormat::Json);
}
