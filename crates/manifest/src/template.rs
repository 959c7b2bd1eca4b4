// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template action parsing
//!
//! A template is literal text interleaved with `{{ … }}` actions. The
//! grammar is deliberately small: four builtins, scalar or structured
//! argument literals, nothing else. Evaluation lives in the render engine;
//! this module only produces the segment list.

use crate::scan::{action_end, skip_balanced, skip_string, skip_ws, ScanIssue};
use serde_json::Number;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unterminated template action at byte {site}")]
    UnterminatedAction { site: usize },

    #[error("unterminated string literal at byte {site}")]
    UnterminatedString { site: usize },

    #[error("unbalanced structured literal at byte {site}")]
    Unbalanced { site: usize },

    #[error("unknown template builtin '{name}' at byte {site}")]
    UnknownBuiltin { name: String, site: usize },

    #[error("builtin '{builtin}' expects a quoted name at byte {site}")]
    ExpectedName { builtin: &'static str, site: usize },

    #[error("bad argument token '{token}' at byte {site}")]
    BadArg { token: String, site: usize },

    #[error("pipelineID expects exactly two quoted arguments at byte {site}")]
    PipelineIdArity { site: usize },
}

impl From<ScanIssue> for TemplateError {
    fn from(issue: ScanIssue) -> Self {
        match issue {
            ScanIssue::Unbalanced(site) => TemplateError::Unbalanced { site },
            ScanIssue::UnterminatedString(site) => TemplateError::UnterminatedString { site },
            ScanIssue::UnterminatedAction(site) => TemplateError::UnterminatedAction { site },
        }
    }
}

/// An argument literal inside an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Str(String),
    Number(Number),
    Bool(bool),
    Null,
    /// A balanced `{…}`/`[…]` run kept verbatim; the binder parses it.
    Raw(String),
}

impl Arg {
    /// The key form of an argument; module argument lists are interpreted
    /// pairwise and keys must be strings.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A parsed template builtin invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Module {
        name: String,
        args: Vec<Arg>,
    },
    AppModule {
        name: String,
        args: Vec<Arg>,
    },
    Var {
        name: String,
        /// Value after the optional default marker.
        default: Option<Arg>,
        /// `?:` form: an empty resolved value falls through to the default.
        fallback_on_empty: bool,
    },
    PipelineId {
        application: String,
        pipeline: String,
    },
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    Action(Action),
}

/// Split template text into literal segments and actions.
pub fn parse_template(input: &str) -> Result<Vec<Segment>, TemplateError> {
    let s = input.as_bytes();
    let mut segments = Vec::new();
    let mut i = 0;

    while let Some(open) = find_open(s, i) {
        if open > i {
            segments.push(Segment::Text(input[i..open].to_string()));
        }
        let end = action_end(s, open, open + 2)?;
        segments.push(Segment::Action(parse_action(input, open + 2, end)?));
        i = end + 2;
    }
    if i < input.len() {
        segments.push(Segment::Text(input[i..].to_string()));
    }

    Ok(segments)
}

fn find_open(s: &[u8], mut i: usize) -> Option<usize> {
    while i + 1 < s.len() {
        if s[i] == b'{' && s[i + 1] == b'{' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Parse one action body in `[from, to)`.
fn parse_action(input: &str, from: usize, to: usize) -> Result<Action, TemplateError> {
    let s = input.as_bytes();
    let kind_start = skip_ws(s, from);
    let kind_end = word_end(s, kind_start, to);
    let kind = &input[kind_start..kind_end];

    let mut args = ArgScanner {
        input,
        pos: kind_end,
        end: to,
    };

    match kind {
        "module" | "appModule" => {
            let name = args
                .next_arg()?
                .and_then(|a| a.as_key().map(String::from))
                .ok_or(TemplateError::ExpectedName {
                    builtin: if kind == "module" {
                        "module"
                    } else {
                        "appModule"
                    },
                    site: kind_start,
                })?;
            let rest = args.remaining()?;
            if kind == "module" {
                Ok(Action::Module { name, args: rest })
            } else {
                Ok(Action::AppModule { name, args: rest })
            }
        }
        "var" => {
            let name = args
                .next_arg()?
                .and_then(|a| a.as_key().map(String::from))
                .ok_or(TemplateError::ExpectedName {
                    builtin: "var",
                    site: kind_start,
                })?;
            let fallback_on_empty = args.eat_elvis();
            let default = args.next_arg()?;
            Ok(Action::Var {
                name,
                default,
                fallback_on_empty,
            })
        }
        "pipelineID" => {
            let application = args.next_arg()?.and_then(|a| a.as_key().map(String::from));
            let pipeline = args.next_arg()?.and_then(|a| a.as_key().map(String::from));
            match (application, pipeline) {
                (Some(application), Some(pipeline)) => Ok(Action::PipelineId {
                    application,
                    pipeline,
                }),
                _ => Err(TemplateError::PipelineIdArity { site: kind_start }),
            }
        }
        other => Err(TemplateError::UnknownBuiltin {
            name: other.to_string(),
            site: kind_start,
        }),
    }
}

struct ArgScanner<'a> {
    input: &'a str,
    pos: usize,
    end: usize,
}

impl ArgScanner<'_> {
    fn next_arg(&mut self) -> Result<Option<Arg>, TemplateError> {
        let s = self.input.as_bytes();
        let tok = skip_ws(s, self.pos);
        if tok >= self.end {
            self.pos = tok;
            return Ok(None);
        }
        match s[tok] {
            b'"' => {
                let next = skip_string(s, tok)?;
                self.pos = next;
                Ok(Some(Arg::Str(unescape(&self.input[tok + 1..next - 1]))))
            }
            b'{' | b'[' => {
                let next = skip_balanced(s, tok)?;
                self.pos = next;
                Ok(Some(Arg::Raw(self.input[tok..next].to_string())))
            }
            _ => {
                let next = word_end(s, tok, self.end);
                let token = &self.input[tok..next];
                self.pos = next;
                match token {
                    "true" => Ok(Some(Arg::Bool(true))),
                    "false" => Ok(Some(Arg::Bool(false))),
                    "null" => Ok(Some(Arg::Null)),
                    _ => token
                        .parse::<Number>()
                        .map(|n| Some(Arg::Number(n)))
                        .map_err(|_| TemplateError::BadArg {
                            token: token.to_string(),
                            site: tok,
                        }),
                }
            }
        }
    }

    /// Consume a `?:` marker if present.
    fn eat_elvis(&mut self) -> bool {
        let s = self.input.as_bytes();
        let tok = skip_ws(s, self.pos);
        if tok + 1 < self.end && s[tok] == b'?' && s[tok + 1] == b':' {
            self.pos = tok + 2;
            true
        } else {
            false
        }
    }

    fn remaining(&mut self) -> Result<Vec<Arg>, TemplateError> {
        let mut args = Vec::new();
        while let Some(arg) = self.next_arg()? {
            args.push(arg);
        }
        Ok(args)
    }
}

fn word_end(s: &[u8], mut i: usize, cap: usize) -> usize {
    while i < cap
        && !s[i].is_ascii_whitespace()
        && !matches!(s[i], b'"' | b'{' | b'[' | b'}' | b']')
    {
        i += 1;
    }
    i
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
