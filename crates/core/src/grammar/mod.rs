/// CL abstract syntax tree types.
pub mod ast;
/// Re-exports from the diagnostics crate.
pub mod diag;
/// JSON serialization helpers for the AST.
pub mod dump;
/// CL lexer — tokenizes raw input into a stream of borrowed tokens.
pub mod lexer;
/// CL structural parser — converts tokens into a command AST.
pub mod parser;
/// Quote/paren scan state machine shared by every text-walking component.
pub mod scan;
/// Raw-source helpers: comment, label, and `*LIBL/` handling.
pub mod source;
