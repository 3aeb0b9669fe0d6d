//! CL lexer — tokenizes one logical command string into a stream of
//! borrowed tokens.
//!
//! The input has physical continuations already joined and the trailing
//! comment already stripped (see [`super::source`]). Classification is done
//! with explicit character-class predicates and static lookup tables; there
//! are no regexes.

use serde::{Deserialize, Serialize};

/// Classification of a CL lexer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokKind {
    /// The leading command name (`NAME` or `LIB/NAME`).
    Command,
    /// A bare name that may introduce a `KEYWORD(...)` parameter.
    Keyword,
    /// Any other unquoted run of characters.
    Value,
    /// A single-quoted literal, quotes included (`'it''s'`).
    String,
    /// A CL variable reference (`&NAME`).
    Variable,
    /// A symbolic special value (`*LIBL`, `*CURRENT`).
    SymbolicValue,
    /// An operator: symbolic (`*CAT`), two-character (`||`, `>=`), or
    /// single-character (`+`, `/`, `¬`).
    Operator,
    /// A built-in function reference (`%SST`, `%BIN`).
    Function,
    /// An opening parenthesis.
    ParenOpen,
    /// A closing parenthesis.
    ParenClose,
    /// A run of whitespace.
    Space,
}

/// A token that borrows its text directly from the source input.
///
/// `text` is always exactly `&input[start..end]`; the byte offsets are kept
/// for consumers that need spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The classification of this token.
    pub kind: TokKind,
    /// Borrowed slice of the source input for this token.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token<'_> {
    /// Whether this token can stand alone as a parameter value.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self.kind,
            TokKind::Value
                | TokKind::String
                | TokKind::Variable
                | TokKind::SymbolicValue
                | TokKind::Function
        )
    }
}

/// Symbolic operators, matched case-insensitively against a `*LETTERS` run.
/// Any other `*LETTERS` run is a symbolic special value.
pub const SYMBOLIC_OPERATORS: [&str; 14] = [
    "*CAT", "*BCAT", "*TCAT", "*AND", "*OR", "*NOT", "*EQ", "*GT", "*LT", "*GE", "*LE", "*NE",
    "*NG", "*NL",
];

/// Two-character operator glyphs, matched before single characters.
const TWO_CHAR_OPERATORS: [&str; 8] = ["||", "|>", "|<", ">=", "<=", "¬=", "¬>", "¬<"];

/// Single-character operator glyphs (`*` is handled separately because it
/// also introduces symbolic values).
const ONE_CHAR_OPERATORS: [char; 9] = ['+', '-', '/', '=', '>', '<', '&', '|', '¬'];

/// First character of a CL name (`$`, `#`, `@` are valid name characters).
fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || matches!(ch, '$' | '#' | '@')
}

/// Subsequent character of a CL name.
fn is_name_char(ch: char) -> bool {
    is_name_start(ch) || ch.is_ascii_digit() || ch == '_' || ch == '.'
}

/// Whether `s` has the shape of a bare CL name.
pub fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_name_start(c) => {}
        _ => return false,
    }
    s.len() <= 10 && chars.all(is_name_char)
}

/// Whether `s` has the shape of a command name: `NAME` or `LIB/NAME`.
pub fn is_command_name(s: &str) -> bool {
    match s.split_once('/') {
        Some((lib, name)) => is_name(lib) && is_name(name),
        None => is_name(s),
    }
}

/// Tokenize one logical CL command string.
///
/// Every token's `text` borrows directly from `input`. An unterminated
/// quoted literal consumes to end of input rather than failing here; the
/// parser decides whether that is fatal.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut toks: Vec<Token<'_>> = Vec::new();
    let mut i = 0usize;

    // Byte offset one past the character at chars[k].
    let end_of = |k: usize| -> usize {
        chars
            .get(k)
            .map_or(input.len(), |&(off, ch)| off + ch.len_utf8())
    };

    let mut seen_nonspace = false;
    while i < chars.len() {
        let (start, c) = chars[i];

        if c.is_whitespace() {
            while i < chars.len() && chars[i].1.is_whitespace() {
                i += 1;
            }
            push(&mut toks, input, TokKind::Space, start, offset_at(&chars, i, input));
            continue;
        }

        let first = !seen_nonspace;
        seen_nonspace = true;

        if c == '(' {
            i += 1;
            push(&mut toks, input, TokKind::ParenOpen, start, end_of(i - 1));
            continue;
        }
        if c == ')' {
            i += 1;
            push(&mut toks, input, TokKind::ParenClose, start, end_of(i - 1));
            continue;
        }

        if c == '\'' {
            // Quoted literal: consume through the matching unescaped quote;
            // a doubled '' stays inside. Unterminated runs to end of input.
            i += 1;
            while i < chars.len() {
                if chars[i].1 == '\'' {
                    if i + 1 < chars.len() && chars[i + 1].1 == '\'' {
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                i += 1;
            }
            push(&mut toks, input, TokKind::String, start, offset_at(&chars, i, input));
            continue;
        }

        if c == '&' && i + 1 < chars.len() && chars[i + 1].1.is_ascii_alphabetic() {
            i += 1;
            while i < chars.len()
                && (chars[i].1.is_ascii_alphanumeric() || chars[i].1 == '_')
            {
                i += 1;
            }
            push(&mut toks, input, TokKind::Variable, start, offset_at(&chars, i, input));
            continue;
        }

        if c == '*' {
            if i + 1 < chars.len() && chars[i + 1].1.is_ascii_alphabetic() {
                i += 1;
                while i < chars.len() && chars[i].1.is_ascii_alphabetic() {
                    i += 1;
                }
                let end = offset_at(&chars, i, input);
                let text = &input[start..end];
                let upper = text.to_ascii_uppercase();
                let kind = if SYMBOLIC_OPERATORS.contains(&upper.as_str()) {
                    TokKind::Operator
                } else {
                    TokKind::SymbolicValue
                };
                push(&mut toks, input, kind, start, end);
            } else {
                // Bare * is multiplication.
                i += 1;
                push(&mut toks, input, TokKind::Operator, start, end_of(i - 1));
            }
            continue;
        }

        // Two-character glyphs take priority over single characters.
        if let Some(op) = TWO_CHAR_OPERATORS
            .iter()
            .find(|op| input[start..].starts_with(**op))
        {
            i += op.chars().count();
            push(&mut toks, input, TokKind::Operator, start, start + op.len());
            continue;
        }
        if ONE_CHAR_OPERATORS.contains(&c) {
            i += 1;
            push(&mut toks, input, TokKind::Operator, start, end_of(i - 1));
            continue;
        }

        if c == '%' && i + 1 < chars.len() && chars[i + 1].1.is_ascii_alphabetic() {
            i += 1;
            while i < chars.len() && chars[i].1.is_ascii_alphabetic() {
                i += 1;
            }
            push(&mut toks, input, TokKind::Function, start, offset_at(&chars, i, input));
            continue;
        }

        // Catch-all run: consume to the next top-level whitespace or paren,
        // quote-aware so embedded literals like X'FF' stay in one token.
        let mut in_quote = false;
        while i < chars.len() {
            let ch = chars[i].1;
            if ch == '\'' {
                in_quote = !in_quote;
            } else if !in_quote && (ch.is_whitespace() || ch == '(' || ch == ')') {
                break;
            }
            i += 1;
        }
        let end = offset_at(&chars, i, input);
        let text = &input[start..end];
        let kind = if first && is_command_name(text) {
            TokKind::Command
        } else if is_name(text) {
            TokKind::Keyword
        } else {
            TokKind::Value
        };
        push(&mut toks, input, kind, start, end);
    }

    toks
}

fn offset_at(chars: &[(usize, char)], i: usize, input: &str) -> usize {
    chars.get(i).map_or(input.len(), |&(off, _)| off)
}

fn push<'a>(toks: &mut Vec<Token<'a>>, input: &'a str, kind: TokKind, start: usize, end: usize) {
    toks.push(Token {
        kind,
        text: &input[start..end],
        start,
        end,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokKind> {
        tokenize(input).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn command_then_keyword_param() {
        let toks = tokenize("CHGVAR VAR(&X)");
        assert_eq!(toks[0].kind, TokKind::Command);
        assert_eq!(toks[0].text, "CHGVAR");
        assert_eq!(toks[2].kind, TokKind::Keyword);
        assert_eq!(toks[2].text, "VAR");
        assert_eq!(toks[3].kind, TokKind::ParenOpen);
        assert_eq!(toks[4].kind, TokKind::Variable);
        assert_eq!(toks[4].text, "&X");
        assert_eq!(toks[5].kind, TokKind::ParenClose);
    }

    #[test]
    fn qualified_command_name() {
        let toks = tokenize("QSYS/CRTLIB LIB(X)");
        assert_eq!(toks[0].kind, TokKind::Command);
        assert_eq!(toks[0].text, "QSYS/CRTLIB");
    }

    #[test]
    fn quoted_string_with_doubled_quote() {
        let toks = tokenize("X VAL('it''s')");
        let s = toks.iter().find(|t| t.kind == TokKind::String).unwrap();
        assert_eq!(s.text, "'it''s'");
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        let toks = tokenize("X VAL('oops");
        let s = toks.last().unwrap();
        assert_eq!(s.kind, TokKind::String);
        assert_eq!(s.text, "'oops");
    }

    #[test]
    fn symbolic_operator_vs_symbolic_value() {
        let toks = tokenize("IF COND(&A *EQ *YES)");
        let star_toks: Vec<_> = toks.iter().filter(|t| t.text.starts_with('*')).collect();
        assert_eq!(star_toks[0].kind, TokKind::Operator); // *EQ
        assert_eq!(star_toks[1].kind, TokKind::SymbolicValue); // *YES
    }

    #[test]
    fn bare_star_is_multiplication() {
        let toks = tokenize("CHGVAR VAR(&X) VALUE(&A * 2)");
        assert!(
            toks.iter()
                .any(|t| t.kind == TokKind::Operator && t.text == "*")
        );
    }

    #[test]
    fn two_char_operators_beat_single() {
        let toks = tokenize("IF COND(&A >= 2)");
        let op = toks.iter().find(|t| t.kind == TokKind::Operator).unwrap();
        assert_eq!(op.text, ">=");
    }

    #[test]
    fn concat_glyph() {
        let toks = tokenize("X VAL(&A || &B)");
        let op = toks.iter().find(|t| t.kind == TokKind::Operator).unwrap();
        assert_eq!(op.text, "||");
    }

    #[test]
    fn function_token() {
        let toks = tokenize("IF COND(%SST(&A 1 2) *EQ 'X')");
        let f = toks.iter().find(|t| t.kind == TokKind::Function).unwrap();
        assert_eq!(f.text, "%SST");
    }

    #[test]
    fn hex_literal_is_one_value() {
        let toks = tokenize("X VAL(X'F1F2')");
        let v = toks
            .iter()
            .find(|t| t.kind == TokKind::Value && t.text.starts_with('X'))
            .unwrap();
        assert_eq!(v.text, "X'F1F2'");
    }

    #[test]
    fn qualified_value_stays_whole() {
        let toks = tokenize("DSPJOB JOB(063459/COZZI/THREADS)");
        let v = toks.iter().find(|t| t.kind == TokKind::Value).unwrap();
        assert_eq!(v.text, "063459/COZZI/THREADS");
    }

    #[test]
    fn whitespace_collapses_to_one_space_token() {
        assert_eq!(
            kinds("A   B"),
            vec![TokKind::Command, TokKind::Space, TokKind::Keyword]
        );
    }

    #[test]
    fn non_name_first_token_is_not_command() {
        let toks = tokenize("123 X");
        assert_eq!(toks[0].kind, TokKind::Value);
    }

    #[test]
    fn spans_cover_input() {
        let input = "CMD KWD(&VAR)";
        for t in tokenize(input) {
            assert_eq!(t.text, &input[t.start..t.end]);
        }
    }
}
