//! Shared test helpers for `cl_toolchain_core` integration tests.

#![allow(unreachable_pub)]

use cl_toolchain_diagnostics::Diagnostic;
use cl_toolchain_schema::{CommandDef, DataType, ParamDef, Shape};

// ─── Schema fixtures ─────────────────────────────────────────────────────────

/// A simple single-instance parameter with a declared type.
#[allow(dead_code)]
pub fn typed(keyword: &str, data_type: DataType) -> ParamDef {
    ParamDef {
        keyword: Some(keyword.to_string()),
        data_type,
        ..ParamDef::default()
    }
}

/// A QUAL parameter of the given arity (index 0 = rightmost source token).
#[allow(dead_code)]
pub fn qual(keyword: &str, arity: usize) -> ParamDef {
    ParamDef {
        keyword: Some(keyword.to_string()),
        shape: Shape::Qual {
            parts: (0..arity).map(|_| ParamDef::default()).collect(),
        },
        ..ParamDef::default()
    }
}

/// An ELEM parameter with the given parts.
#[allow(dead_code)]
pub fn elem(keyword: &str, parts: Vec<ParamDef>) -> ParamDef {
    ParamDef {
        keyword: Some(keyword.to_string()),
        shape: Shape::Elem { parts },
        ..ParamDef::default()
    }
}

/// A command definition from its parts.
#[allow(dead_code)]
pub fn def(name: &str, params: Vec<ParamDef>) -> CommandDef {
    CommandDef {
        name: name.to_string(),
        params,
    }
}

// ─── Diagnostic helpers ──────────────────────────────────────────────────────

/// Collect diagnostic codes in order.
#[allow(dead_code)]
pub fn diag_codes(diags: &[Diagnostic]) -> Vec<String> {
    diags.iter().map(|d| d.id.to_string()).collect()
}

// ─── Layout helpers ──────────────────────────────────────────────────────────

/// Strip continuation markers and indents back into one logical line, the
/// way the legacy editor joins continued source records.
#[allow(dead_code)]
pub fn rejoin(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        let body = line.trim_start();
        match body.strip_suffix('+') {
            Some(stripped) => out.push_str(stripped),
            None => out.push_str(body),
        }
    }
    out
}
