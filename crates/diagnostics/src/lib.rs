//! Structured findings for the CL toolchain.
//!
//! A [`Diagnostic`] couples a stable code from [`codes`] with a severity, a
//! message, and an optional byte [`Span`] into the offending source. Parsers
//! and decomposers accumulate these instead of failing; only unrecoverable
//! conditions surface as hard errors in the producing crate. [`LineIndex`]
//! converts byte offsets into line/column positions for display.

#![warn(missing_docs)]

/// Stable diagnostic ID constants.
pub mod codes;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── Severity ────────────────────────────────────────────────────────────

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// The input is invalid; the producing operation could not complete
    /// faithfully.
    Error,
    /// Suspicious but recoverable; the result may not match intent.
    Warn,
    /// Advisory note.
    Info,
}

impl Severity {
    /// Lowercase name used in display and serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
        }
    }

    /// Whether this severity should fail a check run.
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Span ────────────────────────────────────────────────────────────────

/// Half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// First byte of the range.
    pub start: usize,
    /// One past the last byte of the range.
    pub end: usize,
}

impl Span {
    /// A span over `[start, end)`. Panics when the range is inverted.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "span ends ({end}) before it starts ({start})");
        Self { start, end }
    }

    /// A zero-width span marking a single position.
    pub fn empty(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// Length of the range in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// ── Diagnostic ──────────────────────────────────────────────────────────

/// One structured finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable code, e.g. `"CL1101"`. `Cow` so the constants in [`codes`]
    /// never allocate.
    pub id: Cow<'static, str>,
    /// Finding severity.
    pub severity: Severity,
    /// One-line human-readable description.
    pub message: String,
    /// Byte range in the source this finding points at, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Free-form key/value details for tooling. `BTreeMap` keeps the
    /// serialized key order stable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    fn with_severity(
        severity: Severity,
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// An [`Severity::Error`] finding.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::with_severity(Severity::Error, id, message, span)
    }

    /// A [`Severity::Warn`] finding.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::with_severity(Severity::Warn, id, message, span)
    }

    /// A [`Severity::Info`] finding.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::with_severity(Severity::Info, id, message, span)
    }

    /// Attach one key/value detail (builder form, chainable).
    pub fn with_context(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.context
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Longer-form explanation of this finding's code, when one is known.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

/// Displays as `severity code: message`, e.g. `warn CL1101: stray content`.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.id, self.message)
    }
}

// ── Explanations ────────────────────────────────────────────────────────

/// Longer-form explanation for a diagnostic code, when one is known.
pub fn explain(id: &str) -> Option<&'static str> {
    match id {
        codes::LEX_UNTERMINATED_STRING => Some(
            "A quoted literal was still open at the end of the command. \
             Inside CL strings a literal quote is written as two quotes ('').",
        ),
        codes::PARSER_MISSING_COMMAND => Some(
            "Every CL command starts with a command name, optionally \
             library-qualified (LIB/NAME). Nothing in the input matched \
             that shape.",
        ),
        codes::PARSER_UNBALANCED_PARENS => Some(
            "A parameter's opening parenthesis has no matching close before \
             the end of the command. Parentheses inside quoted literals do \
             not count.",
        ),
        codes::PARSER_STRAY_CONTENT => Some(
            "Tokens were found that belong to no parameter binding. They are \
             ignored; the rest of the command is parsed normally.",
        ),
        codes::PARSER_POSITIONAL_AFTER_NAMED => Some(
            "Positional (unnamed) parameters may only appear before the \
             first named KEYWORD(...) parameter.",
        ),
        codes::DECOMPOSE_UNKNOWN_KEYWORD => Some(
            "The parameter keyword is not declared in the command \
             definition. The parameter is skipped; siblings are unaffected.",
        ),
        _ => None,
    }
}

// ── LineIndex ───────────────────────────────────────────────────────────

/// Byte-offset to line/column translation for a source string.
///
/// Positions are 0-based; add 1 for user display. Building is a single pass;
/// lookups are `partition_point` over the recorded line starts. Offsets past
/// the end resolve to the last line.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    /// Index the line boundaries of `text`.
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 0-based `(line, column)` of a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self
            .starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        (line, offset - self.starts[line])
    }

    /// Byte offset where the given 0-based line begins.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line).copied()
    }

    /// Number of lines; an empty string still has one.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}
