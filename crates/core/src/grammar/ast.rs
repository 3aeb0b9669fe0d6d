//! CL abstract syntax tree types.
//!
//! One [`CommandNode`] per logical command. Parameter values are a closed
//! sum type — scalar, group, expression, or nested command — with exhaustive
//! matching at every consumer, so no runtime shape probing is ever needed.

use serde::{Deserialize, Serialize};

use super::lexer::TokKind;

/// An owned token inside an [`Value::Expression`] span.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExprTok {
    /// The classification of this token.
    pub kind: TokKind,
    /// The token's literal text.
    pub text: String,
}

impl ExprTok {
    /// An owned copy of a borrowed lexer token.
    pub fn of(kind: TokKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// A parameter's parsed content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Value {
    /// A single literal, variable reference, or symbolic value.
    Scalar {
        /// The scalar's source text.
        text: String,
    },
    /// Juxtaposed sub-values (ELEM parts, multi-instance repetitions).
    Group {
        /// Ordered sub-values.
        items: Vec<Value>,
    },
    /// A multi-token span that does not collapse to one scalar.
    Expression {
        /// Ordered tokens of the span; `Space` tokens render as one blank.
        tokens: Vec<ExprTok>,
        /// Whether the span was written inside explicit parentheses in the
        /// source (affects re-emission).
        wrapped: bool,
    },
    /// An embedded command, e.g. a CMD-typed parameter holding another
    /// command call.
    Nested {
        /// The embedded command.
        command: Box<CommandNode>,
    },
}

impl Value {
    /// A scalar value from borrowed text.
    pub fn scalar(text: &str) -> Self {
        Value::Scalar {
            text: text.to_string(),
        }
    }

    /// An empty scalar.
    pub fn empty() -> Self {
        Value::Scalar {
            text: String::new(),
        }
    }

    /// Whether this value renders to nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar { text } => text.trim().is_empty(),
            Value::Group { items } => items.iter().all(Value::is_empty),
            Value::Expression { tokens, .. } => tokens.iter().all(|t| t.text.trim().is_empty()),
            Value::Nested { .. } => false,
        }
    }

    /// Render this value back to raw parameter text.
    ///
    /// Group items join with a single blank, wrapped expressions re-emit
    /// their parentheses, and `Space` tokens normalize to one blank. This is
    /// the inverse of parsing modulo whitespace collapsing.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        self.write_source(&mut out);
        out
    }

    fn write_source(&self, out: &mut String) {
        match self {
            Value::Scalar { text } => out.push_str(text),
            Value::Group { items } => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    item.write_source(out);
                }
            }
            Value::Expression { tokens, wrapped } => {
                if *wrapped {
                    out.push('(');
                }
                write_tokens(out, tokens);
                if *wrapped {
                    out.push(')');
                }
            }
            Value::Nested { command } => out.push_str(&command.to_source()),
        }
    }
}

fn write_tokens(out: &mut String, tokens: &[ExprTok]) {
    for tok in tokens {
        match tok.kind {
            TokKind::Space => out.push(' '),
            _ => out.push_str(&tok.text),
        }
    }
}

/// One parameter binding on a command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Param {
    /// Parameter keyword, or a synthesized `P1`, `P2`, ... placeholder for
    /// positional bindings.
    pub name: String,
    /// The parameter's parsed value.
    pub value: Value,
    /// Whether this binding was supplied positionally (no keyword).
    pub positional: bool,
}

/// A parsed CL command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandNode {
    /// Command name, possibly library-qualified (`LIB/NAME`).
    pub name: String,
    /// Trailing `/* ... */` comment, markers included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Ordered parameter bindings. Positional bindings only ever precede the
    /// first named one.
    pub params: Vec<Param>,
}

impl CommandNode {
    /// Look up a parameter binding by name (case-insensitive).
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Render the command back to single-line source text (without the
    /// trailing comment).
    pub fn to_source(&self) -> String {
        let mut out = self.name.clone();
        for param in &self.params {
            out.push(' ');
            if param.positional {
                param.value.write_source(&mut out);
            } else {
                out.push_str(&param.name);
                out.push('(');
                param.value.write_source(&mut out);
                out.push(')');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_to_source() {
        assert_eq!(Value::scalar("*LIBL").to_source(), "*LIBL");
    }

    #[test]
    fn group_joins_with_blank() {
        let v = Value::Group {
            items: vec![Value::scalar("A"), Value::scalar("B")],
        };
        assert_eq!(v.to_source(), "A B");
    }

    #[test]
    fn wrapped_expression_keeps_parens() {
        let v = Value::Expression {
            tokens: vec![
                ExprTok::of(TokKind::Variable, "&A"),
                ExprTok::of(TokKind::Space, " "),
                ExprTok::of(TokKind::Operator, "*CAT"),
                ExprTok::of(TokKind::Space, " "),
                ExprTok::of(TokKind::Variable, "&B"),
            ],
            wrapped: true,
        };
        assert_eq!(v.to_source(), "(&A *CAT &B)");
    }

    #[test]
    fn command_to_source() {
        let node = CommandNode {
            name: "CHGVAR".into(),
            comment: None,
            params: vec![
                Param {
                    name: "VAR".into(),
                    value: Value::scalar("&X"),
                    positional: false,
                },
                Param {
                    name: "VALUE".into(),
                    value: Value::scalar("'Y'"),
                    positional: false,
                },
            ],
        };
        assert_eq!(node.to_source(), "CHGVAR VAR(&X) VALUE('Y')");
    }

    #[test]
    fn emptiness() {
        assert!(Value::empty().is_empty());
        assert!(Value::Group { items: vec![] }.is_empty());
        assert!(!Value::scalar("X").is_empty());
    }
}
