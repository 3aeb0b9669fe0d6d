use super::ast::CommandNode;

/// Serialize a command AST to a pretty-printed JSON string.
pub fn to_pretty_json(node: &CommandNode) -> String {
    serde_json::to_string_pretty(node).expect("CommandNode serialization cannot fail")
}
