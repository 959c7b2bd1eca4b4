// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline document unmarshalling (JSON and HCL)

use serde_json::{Map, Value};
use skiff_core::Dinghyfile;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum UnmarshalError {
    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed HCL document: {0}")]
    Hcl(#[from] hcl::Error),

    #[error("no unmarshaller accepted the rendered output: {detail}")]
    Unrecognized { detail: String },
}

/// A document parser for rendered manifest text. Parsers are tried in
/// order; the first to succeed wins.
pub trait Unmarshaller: Send + Sync {
    fn name(&self) -> &'static str;
    fn unmarshal(&self, text: &str) -> Result<Dinghyfile, UnmarshalError>;
}

/// JSON form. Requires an explicit `{…}` envelope; anything else is
/// malformed.
pub struct JsonUnmarshaller;

impl Unmarshaller for JsonUnmarshaller {
    fn name(&self) -> &'static str {
        "json"
    }

    fn unmarshal(&self, text: &str) -> Result<Dinghyfile, UnmarshalError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// HCL form: top-level key assignments and blocks.
pub struct HclUnmarshaller;

impl Unmarshaller for HclUnmarshaller {
    fn name(&self) -> &'static str {
        "hcl"
    }

    fn unmarshal(&self, text: &str) -> Result<Dinghyfile, UnmarshalError> {
        Ok(hcl::from_str(text)?)
    }
}

/// Try each unmarshaller in order and return the first success.
pub fn unmarshal_any(
    unmarshallers: &[Box<dyn Unmarshaller>],
    text: &str,
) -> Result<Dinghyfile, UnmarshalError> {
    let mut failures = Vec::with_capacity(unmarshallers.len());
    for um in unmarshallers {
        match um.unmarshal(text) {
            Ok(parsed) => return Ok(parsed),
            Err(err) => {
                debug!(unmarshaller = um.name(), error = %err, "unmarshaller rejected output");
                failures.push(format!("{}: {}", um.name(), err));
            }
        }
    }
    Err(UnmarshalError::Unrecognized {
        detail: failures.join("; "),
    })
}

/// Source format of a structured module output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Json,
    Hcl,
}

/// Parse text as a top-level mapping, trying JSON then HCL. Returns `None`
/// for text that is neither (scalar module outputs are spliced verbatim).
pub fn parse_object(text: &str) -> Option<(DocFormat, Map<String, Value>)> {
    if let Ok(Value::Object(map)) = serde_json::from_str(text) {
        return Some((DocFormat::Json, map));
    }
    if let Ok(Value::Object(map)) = hcl::from_str(text) {
        return Some((DocFormat::Hcl, map));
    }
    None
}

/// Serialize a substituted mapping back into the format it parsed from.
pub fn to_text(format: DocFormat, map: &Map<String, Value>) -> Result<String, UnmarshalError> {
    match format {
        DocFormat::Json => Ok(serde_json::to_string(map)?),
        DocFormat::Hcl => Ok(hcl::to_string(map)?),
    }
}

/// Parse text as any structured value, trying JSON then HCL. Unlike
/// [`parse_object`] this admits non-mapping top levels, which callers use
/// to tell "parses to the wrong shape" apart from "does not parse".
pub fn parse_any(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }
    hcl::from_str(text).ok()
}

/// Re-parse a stringified structured literal (the preprocess round-trip).
///
/// Text that does not open a `{…}`/`[…]` literal, or parses as neither
/// JSON nor HCL, yields `None` and stays a plain string.
pub fn parse_value(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }
    // HCL expressions only parse inside an attribute, so wrap and unwrap
    hcl::from_str::<Map<String, Value>>(&format!("v = {trimmed}"))
        .ok()
        .and_then(|mut body| body.remove("v"))
}

#[cfg(test)]
#[path = "unmarshal_tests.rs"]
mod tests;
