//! Quote and parenthesis scan state machine.
//!
//! Every component that needs to answer "am I inside a quoted literal?" or
//! "where does this parenthesis close?" goes through this module, so there is
//! exactly one definition of those semantics in the codebase. CL escapes an
//! embedded quote by doubling it (`''`), and parentheses inside quoted
//! literals never count toward nesting depth.

/// Incremental quote/paren tracker, advanced one character at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    in_single: bool,
    in_double: bool,
    depth: u32,
}

impl ScanState {
    /// A fresh state: outside any quote, at paren depth zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the state over one character.
    ///
    /// A doubled `''` inside a single-quoted literal is handled by the
    /// toggle itself: the first quote leaves the literal, the second
    /// re-enters it, so the net state after both characters is unchanged.
    /// Positions strictly between the two quotes are never queried by any
    /// caller (no whitespace or paren can sit there).
    pub fn step(&mut self, ch: char) {
        match ch {
            '\'' if !self.in_double => self.in_single = !self.in_single,
            '"' if !self.in_single => self.in_double = !self.in_double,
            '(' if !self.in_quote() => self.depth += 1,
            ')' if !self.in_quote() => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }

    /// Whether the scanner is currently inside a single- or double-quoted
    /// literal.
    pub fn in_quote(&self) -> bool {
        self.in_single || self.in_double
    }

    /// Current unmatched-paren depth (parens inside quotes ignored).
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// Whether the character starting at byte offset `pos` is inside a quoted
/// literal (the opening quote itself is not "inside"; the closing quote is).
pub fn is_inside_quote(text: &str, pos: usize) -> bool {
    let mut state = ScanState::new();
    for (i, ch) in text.char_indices() {
        if i >= pos {
            break;
        }
        state.step(ch);
    }
    state.in_quote()
}

/// Byte offset of the close-paren matching the open-paren at `open`,
/// skipping quoted content. Returns `None` when `open` does not sit on an
/// unquoted `(` or no matching close exists.
pub fn matching_paren(text: &str, open: usize) -> Option<usize> {
    if is_inside_quote(text, open) || !text[open..].starts_with('(') {
        return None;
    }
    let mut state = ScanState::new();
    let mut started = false;
    for (i, ch) in text.char_indices() {
        if i < open {
            state.step(ch);
            continue;
        }
        state.step(ch);
        if i == open {
            started = true;
            continue;
        }
        if started && ch == ')' && state.depth() == 0 && !state.in_quote() {
            return Some(i);
        }
    }
    None
}

/// Split `text` into top-level whitespace-delimited tokens, respecting
/// quotes and paren nesting: `A ('B C') (D E)` yields three tokens.
pub fn split_top_level(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut state = ScanState::new();
    let mut start: Option<usize> = None;
    for (i, ch) in text.char_indices() {
        let boundary = ch.is_whitespace() && !state.in_quote() && state.depth() == 0;
        state.step(ch);
        if boundary {
            if let Some(s) = start.take() {
                out.push(&text[s..i]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push(&text[s..]);
    }
    out
}

/// Split `text` on a delimiter character occurring outside quotes and at
/// paren depth zero. Empty fields are preserved.
pub fn split_on_unquoted(text: &str, delim: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut state = ScanState::new();
    let mut start = 0usize;
    for (i, ch) in text.char_indices() {
        if ch == delim && !state.in_quote() && state.depth() == 0 {
            out.push(&text[start..i]);
            start = i + ch.len_utf8();
        }
        state.step(ch);
    }
    out.push(&text[start..]);
    out
}

/// Byte offset of the first occurrence of `needle` that starts outside any
/// quoted literal, or `None`.
pub fn find_unquoted(text: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    let mut state = ScanState::new();
    for (i, ch) in text.char_indices() {
        if !state.in_quote() && text[i..].starts_with(needle) {
            return Some(i);
        }
        state.step(ch);
    }
    None
}

/// Consume the next top-level token starting at or after `*cursor`,
/// advancing the cursor past it. Leading whitespace is skipped; the token
/// runs to the next top-level whitespace (quote- and paren-aware).
pub fn next_top_level_token<'a>(text: &'a str, cursor: &mut usize) -> Option<&'a str> {
    let bytes = text.as_bytes();
    while *cursor < bytes.len() && bytes[*cursor].is_ascii_whitespace() {
        *cursor += 1;
    }
    if *cursor >= bytes.len() {
        return None;
    }
    let start = *cursor;
    let mut state = ScanState::new();
    for (i, ch) in text[start..].char_indices() {
        if ch.is_whitespace() && !state.in_quote() && state.depth() == 0 {
            *cursor = start + i;
            return Some(&text[start..start + i]);
        }
        state.step(ch);
    }
    *cursor = text.len();
    Some(&text[start..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_state_basic() {
        let text = "VAL('a b') X";
        assert!(!is_inside_quote(text, 0));
        assert!(is_inside_quote(text, 6)); // the space inside the literal
        assert!(!is_inside_quote(text, 10));
    }

    #[test]
    fn doubled_quote_stays_inside() {
        // 'it''s ok' — the space after ''s is still inside the literal
        let text = "'it''s ok'";
        assert!(is_inside_quote(text, 6));
        assert!(!is_inside_quote(text, text.len()));
    }

    #[test]
    fn parens_in_quotes_ignored() {
        let text = "KWD('a)b')";
        assert_eq!(matching_paren(text, 3), Some(9));
    }

    #[test]
    fn matching_paren_nested() {
        let text = "A(B(C)D)E";
        assert_eq!(matching_paren(text, 1), Some(7));
        assert_eq!(matching_paren(text, 3), Some(5));
        assert_eq!(matching_paren(text, 0), None); // not a paren
    }

    #[test]
    fn matching_paren_unbalanced() {
        assert_eq!(matching_paren("(abc", 0), None);
    }

    #[test]
    fn split_top_level_respects_groups() {
        assert_eq!(
            split_top_level("A ('B C') (D E)"),
            vec!["A", "('B C')", "(D E)"]
        );
    }

    #[test]
    fn split_top_level_quoted_space() {
        assert_eq!(split_top_level("'a b' c"), vec!["'a b'", "c"]);
    }

    #[test]
    fn split_on_unquoted_slash() {
        assert_eq!(split_on_unquoted("LIB/OBJ", '/'), vec!["LIB", "OBJ"]);
        assert_eq!(split_on_unquoted("'a/b'/C", '/'), vec!["'a/b'", "C"]);
        assert_eq!(split_on_unquoted("ABC", '/'), vec!["ABC"]);
    }

    #[test]
    fn find_unquoted_skips_literals() {
        let text = "VALUE('a /* not a comment */ b') /* real */";
        assert_eq!(find_unquoted(text, "/*"), Some(33));
    }

    #[test]
    fn next_token_walks_cursor() {
        let text = "  *LIBL/OBJ ('x y') Z";
        let mut cur = 0;
        assert_eq!(next_top_level_token(text, &mut cur), Some("*LIBL/OBJ"));
        assert_eq!(next_top_level_token(text, &mut cur), Some("('x y')"));
        assert_eq!(next_top_level_token(text, &mut cur), Some("Z"));
        assert_eq!(next_top_level_token(text, &mut cur), None);
    }
}
