//! Command reassembler — turns edited, schema-shaped values back into
//! correctly quoted, correctly qualified command text.
//!
//! Serialization is schema-driven: parameters emit in declared display
//! order, QUAL groups reverse back to `library/object`, ELEM groups join
//! their parts inside one paren set, and every scalar leaf passes through
//! the quoting policy. Shape mismatches pad or truncate defensively; the
//! cost of refusing to emit a command is worse than a best-effort one.

use std::collections::HashSet;

use super::quote::quote_if_needed;
use crate::grammar::{ast::Value, source::strip_libl};
use cl_toolchain_schema::{CommandDef, ParamDef, Shape};

/// Reassemble command text from edited values.
///
/// `values` mirrors the decomposer's output shape (`(keyword, value)` in
/// any order); `touched` holds the keywords the user actually edited. A
/// simple single-instance parameter is emitted only when non-empty and
/// either touched or different (case-insensitively) from its declared
/// default; complex and repeatable parameters are emitted whenever
/// non-empty.
pub fn reassemble(
    name: &str,
    values: &[(String, Value)],
    def: &CommandDef,
    touched: &HashSet<String>,
) -> String {
    let mut out = strip_libl(name).to_string();

    for pdef in &def.params {
        let Some(keyword) = pdef.keyword.as_deref() else {
            continue;
        };
        let Some((_, value)) = values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(keyword))
        else {
            continue;
        };

        let rendered = serialize_value(value, pdef);
        if rendered.trim().is_empty() {
            continue;
        }
        if !pdef.shape.is_complex() && pdef.max <= 1 {
            let touched_here = touched.iter().any(|t| t.eq_ignore_ascii_case(keyword));
            let is_default = pdef
                .default
                .as_deref()
                .is_some_and(|d| d.eq_ignore_ascii_case(rendered.trim()));
            if !touched_here && is_default {
                continue;
            }
        }

        out.push(' ');
        out.push_str(keyword);
        out.push('(');
        out.push_str(&rendered);
        out.push(')');
    }

    out
}

/// Serialize one parameter value (without the enclosing `KEYWORD(...)`).
pub fn serialize_value(value: &Value, def: &ParamDef) -> String {
    if def.max > 1 {
        // Each instance wraps in its own parentheses; empty instances drop.
        let instances: Vec<&Value> = match value {
            Value::Group { items } => items.iter().collect(),
            single => vec![single],
        };
        return instances
            .iter()
            .filter(|inst| !inst.is_empty())
            .map(|inst| format!("({})", serialize_single(inst, def)))
            .collect::<Vec<_>>()
            .join(" ");
    }
    serialize_single(value, def)
}

fn serialize_single(value: &Value, def: &ParamDef) -> String {
    match &def.shape {
        Shape::Simple => serialize_scalar(value, def),
        Shape::Qual { parts } => serialize_qual(value, parts),
        Shape::Elem { parts } => serialize_elem(value, parts),
    }
}

fn serialize_scalar(value: &Value, def: &ParamDef) -> String {
    match value {
        Value::Scalar { text } => quote_if_needed(text, &def.allowed, def.data_type),
        // Expressions and nested commands re-emit verbatim; quoting rules
        // for them are identity anyway.
        other => other.to_source(),
    }
}

/// Parts arrive in internal order (index 0 = rightmost source token); emit
/// left-to-right as `library/object`, omitting empty leading qualifiers.
fn serialize_qual(value: &Value, parts: &[ParamDef]) -> String {
    let items: Vec<String> = match value {
        Value::Group { items } => {
            let mut rendered: Vec<String> = items
                .iter()
                .zip(parts)
                .map(|(item, pdef)| serialize_scalar(item, pdef))
                .collect();
            // Defensive padding: missing parts become empty strings.
            while rendered.len() < parts.len() {
                rendered.push(String::new());
            }
            rendered
        }
        single => vec![serialize_scalar(single, parts.first().unwrap_or(&DEFAULT_PART))],
    };

    items
        .into_iter()
        .rev()
        .skip_while(String::is_empty)
        .collect::<Vec<_>>()
        .join("/")
}

fn serialize_elem(value: &Value, parts: &[ParamDef]) -> String {
    let items: Vec<&Value> = match value {
        Value::Group { items } => items.iter().collect(),
        single => vec![single],
    };

    let mut rendered: Vec<String> = parts
        .iter()
        .enumerate()
        .map(|(i, pdef)| match items.get(i) {
            Some(item) => match &pdef.shape {
                // Nested element groups render their own parentheses.
                Shape::Elem { parts: inner } => format!("({})", serialize_elem(item, inner)),
                Shape::Qual { parts: inner } => serialize_qual(item, inner),
                Shape::Simple => serialize_scalar(item, pdef),
            },
            // Defensive padding; extra items past the declared parts drop.
            None => String::new(),
        })
        .collect();

    while rendered.last().is_some_and(|r| r.is_empty() || r == "()") {
        rendered.pop();
    }
    rendered.join(" ")
}

static DEFAULT_PART: ParamDef = ParamDef {
    keyword: None,
    shape: Shape::Simple,
    data_type: cl_toolchain_schema::DataType::Char,
    allowed: Vec::new(),
    default: None,
    max: 1,
};
