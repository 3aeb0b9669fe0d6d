//! CL structural parser — converts a token stream into a [`CommandNode`].
//!
//! The parser is schema-independent: it recovers the command name, the
//! ordered parameter bindings, and each parameter's recursive value tree
//! from token shapes alone. Schema-aware decomposition happens later in
//! [`crate::compose::decompose`].

use serde::Serialize;
use thiserror::Error;

use super::{
    ast::{CommandNode, ExprTok, Param, Value},
    lexer::{TokKind, Token, tokenize},
    scan::ScanState,
    source,
};
use cl_toolchain_diagnostics::{Diagnostic, Span, codes};

/// Result of parsing one logical CL command string.
#[derive(Debug, Serialize)]
pub struct ParseResult {
    /// The parsed command.
    pub node: CommandNode,
    /// Non-fatal findings produced during parsing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Fatal parse failure. The caller keeps the original source untouched;
/// no partial or corrupted text is ever written back.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A quoted literal was still open at end of input.
    #[error("unterminated quoted literal starting at byte {pos}")]
    UnterminatedString {
        /// Byte offset of the opening quote.
        pos: usize,
    },
    /// Nothing in the input matched the command-name shape.
    #[error("no leading command name found")]
    MissingCommand,
    /// An opening parenthesis has no matching close.
    #[error("unbalanced parentheses at byte {pos}")]
    UnbalancedParens {
        /// Byte offset of the unmatched opening parenthesis.
        pos: usize,
    },
}

/// Parse one logical CL command string (continuations already joined).
///
/// A trailing `/* ... */` comment is extracted into the node; an optional
/// leading `LABEL:` is stripped and ignored here (labels belong to the
/// layout layer), as is a redundant `*LIBL/` qualifier on the command name.
/// Diagnostic spans refer to the comment-stripped text.
pub fn parse_command(input: &str) -> Result<ParseResult, ParseError> {
    let (body, comment) = source::extract_comment(input);
    let (_, body) = source::extract_label(&body);
    let body = source::strip_libl(&body);
    let mut result = Parser::new(body).parse()?;
    result.node.comment = comment;
    Ok(result)
}

struct Parser<'a> {
    toks: Vec<Token<'a>>,
    pos: usize,
    diags: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            toks: tokenize(input),
            pos: 0,
            diags: Vec::new(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.toks.len()
    }

    fn parse(mut self) -> Result<ParseResult, ParseError> {
        // Lex-level failure check: a String token still open at its end.
        for tok in &self.toks {
            if tok.kind == TokKind::String && !is_terminated_string(tok.text) {
                return Err(ParseError::UnterminatedString { pos: tok.start });
            }
        }

        // The mandatory leading command token (leading whitespace allowed).
        while !self.at_end() && self.toks[self.pos].kind == TokKind::Space {
            self.pos += 1;
        }
        if self.at_end() || self.toks[self.pos].kind != TokKind::Command {
            return Err(ParseError::MissingCommand);
        }
        let name = self.toks[self.pos].text.to_ascii_uppercase();
        self.pos += 1;

        let mut params: Vec<Param> = Vec::new();
        let mut named_seen = false;
        let mut positional_count = 0usize;

        while !self.at_end() {
            let tok = &self.toks[self.pos];
            match tok.kind {
                TokKind::Space => self.pos += 1,

                // KEYWORD immediately followed by ( begins a named parameter.
                TokKind::Keyword if self.next_is_adjacent_paren() => {
                    let keyword = tok.text.to_ascii_uppercase();
                    let open = self.pos + 1;
                    let close = find_matching(&self.toks, open).ok_or(
                        ParseError::UnbalancedParens {
                            pos: self.toks[open].start,
                        },
                    )?;
                    let value = parse_value(&self.toks[open + 1..close]);
                    params.push(Param {
                        name: keyword,
                        value,
                        positional: false,
                    });
                    named_seen = true;
                    self.pos = close + 1;
                }

                _ if is_scalar_looking(&self.toks, self.pos) => {
                    if named_seen {
                        // The first named binding closed positional parsing
                        // permanently for this command.
                        let span = Span::new(tok.start, tok.end);
                        self.diags.push(Diagnostic::warn(
                            codes::PARSER_POSITIONAL_AFTER_NAMED,
                            format!("positional value {:?} after a named parameter", tok.text),
                            Some(span),
                        ));
                        self.pos += 1;
                    } else {
                        positional_count += 1;
                        params.push(Param {
                            name: format!("P{positional_count}"),
                            value: Value::scalar(tok.text),
                            positional: true,
                        });
                        self.pos += 1;
                    }
                }

                // Anything else is stray content. Coalesce adjacent stray
                // tokens into a single diagnostic.
                _ => {
                    let start = tok.start;
                    let mut end = tok.end;
                    self.pos += 1;
                    while !self.at_end() {
                        let t = &self.toks[self.pos];
                        if t.kind == TokKind::Space
                            || (t.kind == TokKind::Keyword && self.next_is_adjacent_paren())
                        {
                            break;
                        }
                        end = t.end;
                        self.pos += 1;
                    }
                    self.diags.push(Diagnostic::warn(
                        codes::PARSER_STRAY_CONTENT,
                        "stray content outside of any parameter binding",
                        Some(Span::new(start, end)),
                    ));
                }
            }
        }

        Ok(ParseResult {
            node: CommandNode {
                name,
                comment: None,
                params,
            },
            diagnostics: self.diags,
        })
    }

    /// Whether the token after `pos` is a `(` glued to the current one.
    fn next_is_adjacent_paren(&self) -> bool {
        self.toks.get(self.pos + 1).is_some_and(|next| {
            next.kind == TokKind::ParenOpen && next.start == self.toks[self.pos].end
        })
    }
}

/// Whether the token at `idx` can stand alone as a positional value.
/// A bare name counts only when it does not introduce a `KEYWORD(...)`.
fn is_scalar_looking(toks: &[Token<'_>], idx: usize) -> bool {
    let tok = &toks[idx];
    tok.is_scalar()
        || (tok.kind == TokKind::Keyword
            && !toks
                .get(idx + 1)
                .is_some_and(|n| n.kind == TokKind::ParenOpen && n.start == tok.end))
}

/// Index of the `ParenClose` matching the `ParenOpen` at `open`, by token
/// depth counting (quoted content is already folded into `String` tokens).
fn find_matching(toks: &[Token<'_>], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, tok) in toks.iter().enumerate().skip(open) {
        match tok.kind {
            TokKind::ParenOpen => depth += 1,
            TokKind::ParenClose => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Value-grouping over the tokens between a parameter's parentheses.
///
/// Repeatedly, skipping spaces: a standalone `(` starts a wrapped
/// expression covering its balanced span; anything else starts a run that
/// extends to the next paren boundary — except that a keyword glued to its
/// own `(` keeps the whole `KEYWORD(...)` span inside the run, which is what
/// preserves nested command calls like `CMD(DSPJOB JOB(...))` verbatim.
pub(crate) fn parse_value(toks: &[Token<'_>]) -> Value {
    let mut groups: Vec<Value> = Vec::new();
    let mut i = 0usize;

    while i < toks.len() {
        match toks[i].kind {
            TokKind::Space => {
                i += 1;
            }
            TokKind::ParenClose => {
                // Defensive: callers always pass a balanced slice.
                i += 1;
            }
            TokKind::ParenOpen => {
                let close = match find_matching(toks, i) {
                    Some(c) => c,
                    None => toks.len(),
                };
                let inner = toks[i + 1..close.min(toks.len())]
                    .iter()
                    .map(|t| ExprTok::of(t.kind, t.text))
                    .collect();
                groups.push(Value::Expression {
                    tokens: inner,
                    wrapped: true,
                });
                i = close + 1;
            }
            _ => {
                let mut run: Vec<&Token<'_>> = Vec::new();
                while i < toks.len() {
                    match toks[i].kind {
                        TokKind::ParenClose => break,
                        TokKind::ParenOpen => {
                            let glued = run.last().is_some_and(|prev| {
                                prev.kind == TokKind::Keyword && prev.end == toks[i].start
                            });
                            if !glued {
                                break;
                            }
                            let close = match find_matching(toks, i) {
                                Some(c) => c,
                                None => toks.len() - 1,
                            };
                            for t in &toks[i..=close.min(toks.len() - 1)] {
                                run.push(t);
                            }
                            i = close + 1;
                        }
                        _ => {
                            run.push(&toks[i]);
                            i += 1;
                        }
                    }
                }
                while run.last().is_some_and(|t| t.kind == TokKind::Space) {
                    run.pop();
                }
                if run.is_empty() {
                    continue;
                }
                if run.len() == 1
                    && (run[0].is_scalar() || run[0].kind == TokKind::Keyword)
                {
                    groups.push(Value::scalar(run[0].text));
                } else {
                    groups.push(Value::Expression {
                        tokens: run.iter().map(|t| ExprTok::of(t.kind, t.text)).collect(),
                        wrapped: false,
                    });
                }
            }
        }
    }

    match groups.len() {
        0 => Value::empty(),
        1 => groups.into_iter().next().expect("len checked"),
        _ => Value::Group { items: groups },
    }
}

/// Whether a `String` token's text is a correctly terminated quoted literal
/// (doubled `''` counts as an escaped embedded quote).
fn is_terminated_string(text: &str) -> bool {
    let mut state = ScanState::new();
    for ch in text.chars() {
        state.step(ch);
    }
    !state.in_quote() && text.len() >= 2 && text.ends_with('\'')
}
