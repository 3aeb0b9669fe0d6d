//! Value decomposer — splits existing parameter text into the shape its
//! declared schema describes, so an editing form can be pre-populated.
//!
//! All quote/paren questions go through [`crate::grammar::scan`]; the
//! decomposer never counts quotes itself.

use crate::grammar::{
    ast::{CommandNode, Value},
    parser::parse_command,
    scan,
};
use cl_toolchain_diagnostics::{Diagnostic, codes};
use cl_toolchain_schema::{CommandDef, ParamDef, Shape};

/// Schema-shaped decomposition of one command's parameter bindings.
#[derive(Debug)]
pub struct DecomposeResult {
    /// `(keyword, value)` pairs for every binding with a known definition,
    /// in source order.
    pub values: Vec<(String, Value)>,
    /// Non-fatal findings (unknown keywords are reported here, never fatal).
    pub diagnostics: Vec<Diagnostic>,
}

/// Decompose every named parameter of `node` against `def`.
///
/// Unknown keywords are skipped without affecting sibling parameters.
/// Positional bindings carry no keyword and are skipped as well.
pub fn decompose_command(node: &CommandNode, def: &CommandDef) -> DecomposeResult {
    let mut values = Vec::new();
    let mut diagnostics = Vec::new();

    for param in &node.params {
        if param.positional {
            continue;
        }
        match def.param(&param.name) {
            Some(pdef) => {
                let text = param.value.to_source();
                values.push((param.name.clone(), decompose_value(&text, pdef)));
            }
            None => diagnostics.push(
                Diagnostic::warn(
                    codes::DECOMPOSE_UNKNOWN_KEYWORD,
                    format!("keyword {} is not declared for {}", param.name, def.name),
                    None,
                )
                .with_context("keyword", param.name.clone())
                .with_context("command", def.name.clone()),
            ),
        }
    }

    DecomposeResult {
        values,
        diagnostics,
    }
}

/// Decompose one parameter's raw text against its definition.
///
/// For `max > 1` the text is first split into top-level instances (each a
/// bare token or one parenthesized group) and each instance is decomposed
/// independently; the result is a `Group` of per-instance values.
pub fn decompose_value(text: &str, def: &ParamDef) -> Value {
    let text = text.trim();
    if def.max > 1 {
        let items = scan::split_top_level(text)
            .into_iter()
            .map(|inst| decompose_single(strip_wrapping_parens(inst), def))
            .collect();
        return Value::Group { items };
    }
    decompose_single(text, def)
}

fn decompose_single(text: &str, def: &ParamDef) -> Value {
    match &def.shape {
        Shape::Simple => decompose_simple(text, def),
        Shape::Qual { parts } => decompose_qual(text, parts.len()),
        Shape::Elem { parts } => decompose_elem(text, parts),
    }
}

fn decompose_simple(text: &str, def: &ParamDef) -> Value {
    if def.data_type.is_command() {
        // An embedded command call; a parse failure leaves the raw text as
        // an opaque scalar rather than refusing to decompose the parent.
        if let Ok(res) = parse_command(text) {
            return Value::Nested {
                command: Box::new(res.node),
            };
        }
    }
    Value::scalar(text)
}

/// Split a qualified name on unquoted `/`, reverse so the rightmost source
/// token lands at part index 0, and pad with empty strings to the declared
/// arity. A leading `*`-value (`*LDA`) is one unqualified special value.
fn decompose_qual(text: &str, arity: usize) -> Value {
    let mut parts: Vec<Value> = if text.starts_with('*') {
        vec![Value::scalar(text)]
    } else {
        scan::split_on_unquoted(text, '/')
            .into_iter()
            .rev()
            .map(|p| Value::scalar(p.trim()))
            .collect()
    };
    parts.truncate(arity.max(1));
    while parts.len() < arity {
        parts.push(Value::empty());
    }
    Value::Group { items: parts }
}

fn decompose_elem(text: &str, parts: &[ParamDef]) -> Value {
    // Fast path: every part is a plain scalar, so a top-level space split
    // maps pieces to parts one-to-one.
    if parts.iter().all(|p| matches!(p.shape, Shape::Simple)) {
        let pieces = scan::split_top_level(text);
        let items = (0..parts.len())
            .map(|i| match pieces.get(i) {
                Some(piece) => decompose_simple(strip_wrapping_parens(piece), &parts[i]),
                None => Value::empty(),
            })
            .collect();
        return Value::Group { items };
    }

    // General path: walk the declared parts, consuming from the text a
    // QUAL-shaped token, a balanced parenthesized span, or one top-level
    // token per part, advancing a cursor as each part is consumed.
    let mut cursor = 0usize;
    let mut items = Vec::with_capacity(parts.len());
    for part in parts {
        skip_spaces(text, &mut cursor);
        if cursor >= text.len() {
            items.push(Value::empty());
            continue;
        }
        match &part.shape {
            Shape::Qual { parts: qparts } => {
                let token = scan::next_top_level_token(text, &mut cursor).unwrap_or("");
                items.push(decompose_qual(token, qparts.len()));
            }
            Shape::Elem { parts: eparts } => {
                if text[cursor..].starts_with('(') {
                    match scan::matching_paren(text, cursor) {
                        Some(close) => {
                            let inner = &text[cursor + 1..close];
                            cursor = close + 1;
                            items.push(decompose_elem(inner, eparts));
                        }
                        None => {
                            // Unbalanced; consume the rest best-effort.
                            let inner = &text[cursor + 1..];
                            cursor = text.len();
                            items.push(decompose_elem(inner, eparts));
                        }
                    }
                } else {
                    let token = scan::next_top_level_token(text, &mut cursor).unwrap_or("");
                    items.push(decompose_elem(token, eparts));
                }
            }
            Shape::Simple => {
                let token = scan::next_top_level_token(text, &mut cursor).unwrap_or("");
                items.push(decompose_simple(strip_wrapping_parens(token), part));
            }
        }
    }
    Value::Group { items }
}

fn skip_spaces(text: &str, cursor: &mut usize) {
    let bytes = text.as_bytes();
    while *cursor < bytes.len() && bytes[*cursor].is_ascii_whitespace() {
        *cursor += 1;
    }
}

/// Strip one layer of wrapping parentheses when they enclose the whole
/// text, as instance groups and parenthesized scalars do.
fn strip_wrapping_parens(text: &str) -> &str {
    if text.starts_with('(') && scan::matching_paren(text, 0) == Some(text.len() - 1) {
        text[1..text.len() - 1].trim()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_toolchain_schema::DataType;

    fn qual(n: usize) -> ParamDef {
        ParamDef {
            shape: Shape::Qual {
                parts: (0..n).map(|_| ParamDef::default()).collect(),
            },
            ..ParamDef::default()
        }
    }

    fn scalars(v: &Value) -> Vec<String> {
        match v {
            Value::Group { items } => items
                .iter()
                .map(|i| match i {
                    Value::Scalar { text } => text.clone(),
                    other => other.to_source(),
                })
                .collect(),
            other => vec![other.to_source()],
        }
    }

    #[test]
    fn qual_reverses_and_pads() {
        assert_eq!(scalars(&decompose_value("LIB/OBJ", &qual(2))), ["OBJ", "LIB"]);
        assert_eq!(scalars(&decompose_value("OBJ", &qual(2))), ["OBJ", ""]);
    }

    #[test]
    fn qual_star_value_not_split() {
        assert_eq!(scalars(&decompose_value("*LDA", &qual(2))), ["*LDA", ""]);
    }

    #[test]
    fn qual_extra_parts_truncated() {
        assert_eq!(
            scalars(&decompose_value("A/B/C", &qual(2))),
            ["C", "B"]
        );
    }

    #[test]
    fn cmd_typed_becomes_nested() {
        let def = ParamDef {
            data_type: DataType::Cmd,
            ..ParamDef::default()
        };
        let v = decompose_value("DSPJOB JOB(IBMIRD)", &def);
        match v {
            Value::Nested { command } => assert_eq!(command.name, "DSPJOB"),
            other => panic!("expected nested command, got {other:?}"),
        }
    }
}
