// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four-shape tool result envelope (§7).
//!
//! Every tool handler returns one of success/warning/info/error, each with a
//! fixed leading glyph. The wrapper chain (C5 debug hints, C6 auto-heal) keys
//! off the leading glyph alone — it never parses the human-readable prose.

use crate::error::ErrorCode;
use indexmap::IndexMap;
use std::fmt;

/// Leading glyph for a success result.
pub const GLYPH_SUCCESS: &str = "✅";
/// Leading glyph for a warning result.
pub const GLYPH_WARNING: &str = "⚠️";
/// Leading glyph for an info result.
pub const GLYPH_INFO: &str = "ℹ️";
/// Leading glyph for an error result. Always followed by the literal "Error".
pub const GLYPH_ERROR: &str = "❌";

/// Structured detail attached to an error result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorDetail {
    pub code: Option<ErrorCode>,
    pub inner: Option<String>,
    pub context: IndexMap<String, String>,
    pub hint: Option<String>,
}

impl ErrorDetail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_inner(mut self, inner: impl Into<String>) -> Self {
        self.inner = Some(inner.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// The four result shapes a tool handler may return.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Success(String),
    Warning(String),
    Info(String),
    Error(String, ErrorDetail),
}

impl ToolResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(message.into())
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning(message.into())
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::Info(message.into())
    }

    pub fn error(message: impl Into<String>, detail: ErrorDetail) -> Self {
        Self::Error(message.into(), detail)
    }

    /// Shorthand for an error with only a code, no further context.
    pub fn error_code(message: impl Into<String>, code: ErrorCode) -> Self {
        Self::Error(message.into(), ErrorDetail::new().with_code(code))
    }

    /// Whether the rendered string begins with the error sentinel.
    ///
    /// This is the sole test the wrapper chain (C5, C6) performs — it never
    /// parses the human-readable body beyond this leading check.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(..))
    }

    pub fn error_detail(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Error(_, detail) => Some(detail),
            _ => None,
        }
    }

    /// Render the result the way it crosses the host protocol boundary.
    ///
    /// Error shape: `{glyph} Error [{code}]: {message} — {inner} (k=v, ...) hint: {hint}`,
    /// with each trailing segment present only when set.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ToolResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(msg) => write!(f, "{GLYPH_SUCCESS} {msg}"),
            Self::Warning(msg) => write!(f, "{GLYPH_WARNING} {msg}"),
            Self::Info(msg) => write!(f, "{GLYPH_INFO} {msg}"),
            Self::Error(msg, detail) => {
                write!(f, "{GLYPH_ERROR} Error")?;
                if let Some(code) = detail.code {
                    write!(f, " [{code}]")?;
                }
                write!(f, ": {msg}")?;
                if let Some(inner) = &detail.inner {
                    write!(f, " — {inner}")?;
                }
                if !detail.context.is_empty() {
                    let pairs: Vec<String> =
                        detail.context.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    write!(f, " ({})", pairs.join(", "))?;
                }
                if let Some(hint) = &detail.hint {
                    write!(f, " hint: {hint}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
