//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete.

/// Quoted literal not terminated before end of input.
pub const LEX_UNTERMINATED_STRING: &str = "CL1001";
/// No leading command token found in the input.
pub const PARSER_MISSING_COMMAND: &str = "CL1002";
/// Unbalanced parentheses while matching a parameter span.
pub const PARSER_UNBALANCED_PARENS: &str = "CL1003";
/// Tokens that belong to no parameter binding.
pub const PARSER_STRAY_CONTENT: &str = "CL1101";
/// Positional value encountered after a named parameter.
pub const PARSER_POSITIONAL_AFTER_NAMED: &str = "CL1102";
/// Parameter keyword not present in the command definition.
pub const DECOMPOSE_UNKNOWN_KEYWORD: &str = "CL1103";
