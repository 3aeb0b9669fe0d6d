//! CL toolchain core library.
//!
//! Provides parsing, decomposition, reassembly, and reflow formatting of
//! IBM i CL command text. The main entry points are [`parse_command`] for
//! parsing, [`decompose_command`] / [`reassemble`] for schema-driven prompt
//! round trips, and [`reflow`] for column-constrained output.

#![warn(missing_docs)]

/// Composition layer: decomposing and reassembling parameter values.
pub mod compose;
/// CL grammar: scanner, lexer, parser, AST, and source helpers.
pub mod grammar;
/// Column-constrained reflow formatting.
pub mod layout;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Parser
pub use grammar::parser::{ParseError, ParseResult, parse_command};

// AST
pub use grammar::ast::{CommandNode, ExprTok, Param, Value};

// Lexer
pub use grammar::lexer::{TokKind, Token, tokenize};

// Source helpers
pub use grammar::source::{extract_comment, extract_label, strip_libl};

// Composition
pub use compose::decompose::{DecomposeResult, decompose_command, decompose_value};
pub use compose::quote::quote_if_needed;
pub use compose::reassemble::{reassemble, serialize_value};

// Layout
pub use layout::{LONG_STRING_MIN_BREAK, LayoutConfig, reflow};

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{Diagnostic, Severity, Span, codes};

// Serialization helpers
pub use grammar::dump::to_pretty_json;
