//! Column-constrained reflow formatting of command ASTs.
//!
//! A [`crate::grammar::ast::CommandNode`] is flattened into atomic layout
//! chunks and re-emitted as fixed-width, continuation-marked lines matching
//! the legacy terminal editor's conventions. All column positions and the
//! continuation character come from [`LayoutConfig`]; nothing is baked in.

mod reflow;

pub use reflow::reflow;

use crate::grammar::ast::{CommandNode, Value};
use crate::grammar::lexer::TokKind;

/// Minimum length at which a quoted string may be broken at an internal
/// space. Shorter strings are atomic layout units.
pub const LONG_STRING_MIN_BREAK: usize = 50;

/// Column layout configuration, typically sourced from editor preferences.
///
/// Columns are 0-based character positions; `right_margin` is the maximum
/// allowed line length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Column where the command name starts.
    pub left_margin: usize,
    /// Maximum line length.
    pub right_margin: usize,
    /// Column where the first parameter starts (when past the command name).
    pub kwd_position: usize,
    /// Column where continuation lines resume.
    pub cont_indent: usize,
    /// Column where a leading label starts.
    pub label_position: usize,
    /// Character appended to a line to mark continuation.
    pub continuation_char: char,
}

/// Flatten a command into atomic layout chunks.
///
/// Chunk boundaries are the only between-token break opportunities; each
/// chunk is indivisible except for the long-quoted-string and last-resort
/// paths in the formatter. `KEYWORD(` stays glued to its first value chunk
/// and `)` to the last, so those protected spans can never be split.
pub(crate) fn command_chunks(node: &CommandNode) -> Vec<String> {
    let mut chunks = Vec::new();
    for param in &node.params {
        let mut vc = value_chunks(&param.value);
        if param.positional {
            chunks.append(&mut vc);
            continue;
        }
        if vc.is_empty() {
            vc.push(String::new());
        }
        vc[0] = format!("{}({}", param.name, vc[0]);
        let last = vc.len() - 1;
        vc[last].push(')');
        chunks.append(&mut vc);
    }
    chunks
}

fn value_chunks(value: &Value) -> Vec<String> {
    match value {
        Value::Scalar { text } => {
            if text.is_empty() {
                Vec::new()
            } else {
                vec![text.clone()]
            }
        }
        Value::Group { items } => items.iter().flat_map(value_chunks).collect(),
        Value::Expression { tokens, wrapped } => {
            let mut out: Vec<String> = Vec::new();
            let mut cur = String::new();
            for tok in tokens {
                if tok.kind == TokKind::Space {
                    if !cur.is_empty() {
                        out.push(std::mem::take(&mut cur));
                    }
                } else {
                    cur.push_str(&tok.text);
                }
            }
            if !cur.is_empty() {
                out.push(cur);
            }
            if *wrapped {
                if out.is_empty() {
                    out.push("()".to_string());
                } else {
                    out[0].insert(0, '(');
                    let last = out.len() - 1;
                    out[last].push(')');
                }
            }
            out
        }
        Value::Nested { command } => {
            let mut out = vec![command.name.clone()];
            out.extend(command_chunks(command));
            out
        }
    }
}
