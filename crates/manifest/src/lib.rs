// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Template language and manifest parsing
//!
//! Three layers, applied in order during a render:
//!
//! 1. [`preprocess`] rewrites structured literals in module-call arguments
//!    into quoted string tokens so the template scanner treats them
//!    atomically.
//! 2. [`parse_template`] splits template text into literal text and builtin
//!    actions (`module`, `appModule`, `var`, `pipelineID`).
//! 3. [`unmarshal_any`] parses fully rendered text into the canonical
//!    [`skiff_core::Dinghyfile`] via an ordered unmarshaller set.

mod preprocess;
mod scan;
mod template;
mod unmarshal;

pub use preprocess::{preprocess, PreprocessError};
pub use template::{parse_template, Action, Arg, Segment, TemplateError};
pub use unmarshal::{
    parse_any, parse_object, parse_value, to_text, unmarshal_any, DocFormat, HclUnmarshaller,
    JsonUnmarshaller, UnmarshalError, Unmarshaller,
};
