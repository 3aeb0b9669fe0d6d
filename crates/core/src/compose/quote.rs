//! Literal quoting policy.
//!
//! Decides whether and how to quote a scalar value when re-serializing a
//! parameter. Evaluated as an ordered rule list, first match wins; the rule
//! numbers in the comments below are load-bearing for the tests.

use crate::grammar::lexer::{SYMBOLIC_OPERATORS, is_name};
use crate::grammar::scan::{ScanState, matching_paren, split_top_level};
use cl_toolchain_schema::DataType;

/// Quote `value` for emission if its shape requires it.
///
/// `allowed` is the parameter's declared special-value list; `data_type` is
/// its declared type. The returned string is ready to splice into command
/// text.
pub fn quote_if_needed(value: &str, allowed: &[String], data_type: DataType) -> String {
    let v = value.trim();

    // 1. Embedded commands are never quoted.
    if data_type.is_command() {
        return v.to_string();
    }
    // 2. A variable reference passes through.
    if is_variable(v) {
        return v.to_string();
    }
    // 3. A hexadecimal literal X'...' passes through.
    if is_hex_literal(v) {
        return v.to_string();
    }
    // 4. Declared special values and *-values pass through.
    if v.starts_with('*') || allowed.iter().any(|a| a.eq_ignore_ascii_case(v)) {
        return v.to_string();
    }
    // 5. An already-valid quoted CL string is kept as-is (the empty literal
    //    '' falls through to rule 11).
    if is_valid_quoted(v) && v.len() > 2 {
        return v.to_string();
    }
    // 6. A user-supplied double-quoted string is kept as-is.
    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        return v.to_string();
    }
    // 7. A library-qualified bare name needs no quoting.
    if is_qualified_name(v) {
        return v.to_string();
    }
    // 8. An unqualified valid CL name (already uppercase) needs no quoting.
    if is_uppercase_name(v) {
        return v.to_string();
    }
    // 9. For NAME-family declared types, any valid name passes through.
    if data_type.is_name_family() && is_name(v) {
        return v.to_string();
    }
    // 10. A recognized CL expression is emitted verbatim.
    if is_expression(v) {
        return v.to_string();
    }
    // 11. Empty (or already-empty-quoted) collapses to the empty string.
    if v.is_empty() || v == "''" {
        return String::new();
    }
    // 12. A pure numeric literal needs no quoting.
    if is_numeric(v) {
        return v.to_string();
    }
    // 13. Quoted on both ends but with a bad internal quote: repair by
    //     re-escaping the content.
    if v.len() >= 2 && v.starts_with('\'') && v.ends_with('\'') {
        let inner = &v[1..v.len() - 1];
        return wrap(&inner.replace("''", "'"));
    }
    // 14. Default: wrap in single quotes, doubling any internal quotes.
    wrap(v)
}

fn wrap(inner: &str) -> String {
    format!("'{}'", inner.replace('\'', "''"))
}

/// `&NAME` with at most 10 characters after the sigil.
fn is_variable(s: &str) -> bool {
    let Some(rest) = s.strip_prefix('&') else {
        return false;
    };
    !rest.is_empty() && rest.len() <= 10 && is_name(rest)
}

/// `X'F1F2'` — hex digits between quotes.
fn is_hex_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    s.len() >= 4
        && (bytes[0] == b'X' || bytes[0] == b'x')
        && bytes[1] == b'\''
        && bytes[s.len() - 1] == b'\''
        && s[2..s.len() - 1].bytes().all(|b| b.is_ascii_hexdigit())
}

/// A single-quoted literal whose internal quotes are all correctly doubled.
fn is_valid_quoted(s: &str) -> bool {
    if s.len() < 2 || !s.starts_with('\'') || !s.ends_with('\'') {
        return false;
    }
    let inner = s[1..s.len() - 1].as_bytes();
    let mut i = 0usize;
    while i < inner.len() {
        if inner[i] == b'\'' {
            if i + 1 < inner.len() && inner[i + 1] == b'\'' {
                i += 2;
                continue;
            }
            return false;
        }
        i += 1;
    }
    true
}

fn is_uppercase_name(s: &str) -> bool {
    is_name(s) && !s.bytes().any(|b| b.is_ascii_lowercase())
}

/// `NAME/NAME`, both halves uppercase bare names.
fn is_qualified_name(s: &str) -> bool {
    match s.split_once('/') {
        Some((lib, name)) => is_uppercase_name(lib) && is_uppercase_name(name),
        None => false,
    }
}

fn is_numeric(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && digits.bytes().filter(|b| *b == b'.').count() <= 1
        && digits.bytes().any(|b| b.is_ascii_digit())
}

/// Heuristic for "this is already a CL expression": parenthesized, or
/// carrying a symbolic operator / function sigil, or a variable combined
/// with an arithmetic/relational sigil — all checked outside quoted content.
fn is_expression(s: &str) -> bool {
    if s.starts_with('(') && matching_paren(s, 0) == Some(s.len() - 1) {
        return true;
    }
    if split_top_level(s)
        .iter()
        .any(|tok| SYMBOLIC_OPERATORS.contains(&tok.to_ascii_uppercase().as_str()))
    {
        return true;
    }
    let mut state = ScanState::new();
    let mut has_sigil = false;
    let mut has_function = false;
    let mut has_variable = false;
    let mut prev = '\0';
    for ch in s.chars() {
        if !state.in_quote() {
            if matches!(ch, '+' | '-' | '*' | '/' | '=' | '<' | '>' | '|' | '¬') {
                has_sigil = true;
            }
            if prev == '%' && ch.is_ascii_alphabetic() {
                has_function = true;
            }
            if prev == '&' && ch.is_ascii_alphabetic() {
                has_variable = true;
            }
        }
        prev = ch;
        state.step(ch);
    }
    has_function || (has_variable && has_sigil)
}
