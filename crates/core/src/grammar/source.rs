//! Helpers for the raw source surface of a logical command line: trailing
//! comment extraction, leading label extraction, and `*LIBL/` stripping.
//!
//! Joining physically continued lines into one logical string is the
//! caller's job; these helpers only operate on an already-joined string.

use super::scan::ScanState;

/// Split a logical command string into `(command_text, trailing_comment)`.
///
/// A comment starts at the first unquoted ` /*` (or at `/*` when the whole
/// string is a comment). Quote state is tracked so a `/*`-looking substring
/// inside a quoted literal is never misidentified. The returned comment
/// keeps its `/* ... */` markers.
pub fn extract_comment(input: &str) -> (String, Option<String>) {
    let trimmed = input.trim_start();
    if trimmed.starts_with("/*") {
        return (String::new(), Some(trimmed.trim_end().to_string()));
    }

    let mut state = ScanState::new();
    let mut prev_blank = false;
    for (i, ch) in input.char_indices() {
        if prev_blank && !state.in_quote() && input[i..].starts_with("/*") {
            let body = input[..i].trim_end().to_string();
            let comment = input[i..].trim_end().to_string();
            return (body, Some(comment));
        }
        prev_blank = ch.is_whitespace() && !state.in_quote();
        state.step(ch);
    }
    (input.trim_end().to_string(), None)
}

/// Split a leading `LABEL:` off a command string, returning
/// `(label_without_colon, rest)`.
///
/// A label is a name-shaped run glued to a `:` before the command name.
pub fn extract_label(input: &str) -> (Option<String>, String) {
    let trimmed = input.trim_start();
    if let Some(colon) = trimmed.find(':') {
        let head = &trimmed[..colon];
        if !head.is_empty() && super::lexer::is_name(head) {
            let rest = trimmed[colon + 1..].trim_start().to_string();
            return (Some(head.to_string()), rest);
        }
    }
    (None, trimmed.to_string())
}

/// Strip a leading `*LIBL/` qualifier from a command name. Searching the
/// library list is the default, so it need not be stated explicitly.
pub fn strip_libl(name: &str) -> &str {
    let upper_prefix = "*LIBL/";
    if name.len() > upper_prefix.len()
        && name[..upper_prefix.len()].eq_ignore_ascii_case(upper_prefix)
    {
        &name[upper_prefix.len()..]
    } else {
        name
    }
}
