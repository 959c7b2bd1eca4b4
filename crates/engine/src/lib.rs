// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Render, dependency, and reconcile engine
//!
//! The [`PipelineBuilder`] ties the subsystems together per push: render
//! each touched root manifest (recording module dependencies), parse the
//! expansion, and reconcile the resulting pipeline set against the CD API.

mod builder;
mod error;
mod reconcile;
mod render;
mod vars;

pub use builder::PipelineBuilder;
pub use error::{EngineError, ReconcileError, RenderError};
pub use reconcile::Reconciler;
pub use render::{Rendered, Renderer};
pub use vars::VarScope;
