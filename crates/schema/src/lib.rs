//! CL command parameter schema model.
//!
//! Defines the passive, recursive data structures describing a command's
//! declared parameters: simple scalars, slash-qualified names (QUAL), and
//! ordered element groups (ELEM), plus each parameter's declared type,
//! allowed special values, default, and repetition bound.  These are
//! deserialized from JSON produced by an external command-definition loader
//! and consumed by the decomposer, quoting policy, and reassembler.

use serde::{Deserialize, Serialize};

/// Declared data type of a parameter or sub-element.
///
/// Only the distinctions the text engine cares about are modelled; anything
/// else maps to [`DataType::Other`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// A CL object name (`*NAME`).
    Name,
    /// A generic (possibly wildcarded) name (`*GENERIC`).
    GenericName,
    /// An IFS path name (`*PNAME`).
    PathName,
    /// Character data (`*CHAR`).
    #[default]
    Char,
    /// Packed decimal (`*DEC`).
    Dec,
    /// Logical '0'/'1' (`*LGL`).
    Logical,
    /// A nested command call (`*CMD`).
    Cmd,
    /// A command string (`*CMDSTR`).
    CmdStr,
    /// Any other declared type.
    Other,
}

impl DataType {
    /// Whether the declared type is one of the NAME family.
    pub fn is_name_family(self) -> bool {
        matches!(
            self,
            DataType::Name | DataType::GenericName | DataType::PathName
        )
    }

    /// Whether the declared type holds an embedded command.
    pub fn is_command(self) -> bool {
        matches!(self, DataType::Cmd | DataType::CmdStr)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Name => write!(f, "*NAME"),
            DataType::GenericName => write!(f, "*GENERIC"),
            DataType::PathName => write!(f, "*PNAME"),
            DataType::Char => write!(f, "*CHAR"),
            DataType::Dec => write!(f, "*DEC"),
            DataType::Logical => write!(f, "*LGL"),
            DataType::Cmd => write!(f, "*CMD"),
            DataType::CmdStr => write!(f, "*CMDSTR"),
            DataType::Other => write!(f, "*OTHER"),
        }
    }
}

/// Structural shape of a parameter or sub-element.
///
/// `Qual` and `Elem` parts are themselves full [`ParamDef`]s, so arbitrary
/// (in practice shallow, ≤4 levels) nesting terminates structurally rather
/// than by null-checking.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    /// A single scalar value.
    #[default]
    Simple,
    /// A slash-qualified name (`library/object`). Parts are declared in
    /// internal order: index 0 is the rightmost source token.
    Qual {
        /// Ordered qualifier parts (index 0 = rightmost in source).
        parts: Vec<ParamDef>,
    },
    /// An ordered, space-separated group of heterogeneous sub-fields.
    Elem {
        /// Ordered element parts in declared order.
        parts: Vec<ParamDef>,
    },
}

impl Shape {
    /// Whether this shape has QUAL or ELEM children.
    pub fn is_complex(&self) -> bool {
        !matches!(self, Shape::Simple)
    }
}

/// Declaration of one parameter (or one QUAL/ELEM sub-element).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParamDef {
    /// Parameter keyword (e.g. `"VAR"`). Absent on sub-elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Structural shape: simple, QUAL, or ELEM.
    #[serde(default)]
    pub shape: Shape,
    /// Declared data type.
    #[serde(default, rename = "type")]
    pub data_type: DataType,
    /// Declared allowed special values (e.g. `["*LIBL", "*CURLIB"]`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
    /// Declared default value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Maximum number of instances (`>= 1`).
    #[serde(default = "default_max")]
    pub max: u32,
}

fn default_max() -> u32 {
    1
}

impl Default for ParamDef {
    fn default() -> Self {
        Self {
            keyword: None,
            shape: Shape::default(),
            data_type: DataType::default(),
            allowed: Vec::new(),
            default: None,
            max: default_max(),
        }
    }
}

impl ParamDef {
    /// A simple single-instance parameter with the given keyword.
    pub fn simple(keyword: &str) -> Self {
        Self {
            keyword: Some(keyword.to_string()),
            ..Self::default()
        }
    }

    /// Keyword of this definition, or `""` for unnamed sub-elements.
    pub fn keyword_or_empty(&self) -> &str {
        self.keyword.as_deref().unwrap_or("")
    }

    /// Declared arity of a QUAL shape (0 for other shapes).
    pub fn qual_arity(&self) -> usize {
        match &self.shape {
            Shape::Qual { parts } => parts.len(),
            _ => 0,
        }
    }
}

/// A command's full declared-parameter schema, in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommandDef {
    /// Command name (e.g. `"CRTDUPOBJ"`).
    pub name: String,
    /// Parameter definitions in declared display order.
    #[serde(default)]
    pub params: Vec<ParamDef>,
}

impl CommandDef {
    /// Look up a parameter definition by keyword (case-insensitive).
    pub fn param(&self, keyword: &str) -> Option<&ParamDef> {
        self.params.iter().find(|p| {
            p.keyword
                .as_deref()
                .is_some_and(|k| k.eq_ignore_ascii_case(keyword))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qual2(keyword: &str) -> ParamDef {
        ParamDef {
            keyword: Some(keyword.into()),
            shape: Shape::Qual {
                parts: vec![ParamDef::default(), ParamDef::default()],
            },
            ..ParamDef::default()
        }
    }

    #[test]
    fn param_lookup_is_case_insensitive() {
        let def = CommandDef {
            name: "CHGVAR".into(),
            params: vec![ParamDef::simple("VAR"), ParamDef::simple("VALUE")],
        };
        assert!(def.param("value").is_some());
        assert!(def.param("NOPE").is_none());
    }

    #[test]
    fn qual_arity() {
        assert_eq!(qual2("OBJ").qual_arity(), 2);
        assert_eq!(ParamDef::simple("X").qual_arity(), 0);
    }

    #[test]
    fn serde_roundtrip() {
        let def = CommandDef {
            name: "SBMJOB".into(),
            params: vec![
                ParamDef {
                    keyword: Some("CMD".into()),
                    data_type: DataType::Cmd,
                    ..ParamDef::default()
                },
                qual2("JOBD"),
            ],
        };
        let json = serde_json::to_string(&def).unwrap();
        let back: CommandDef = serde_json::from_str(&json).unwrap();
        assert_eq!(def, back);
    }

    #[test]
    fn max_defaults_to_one() {
        let p: ParamDef = serde_json::from_str(r#"{"keyword":"OBJ"}"#).unwrap();
        assert_eq!(p.max, 1);
        assert_eq!(p.shape, Shape::Simple);
    }

    #[test]
    fn data_type_predicates() {
        assert!(DataType::Name.is_name_family());
        assert!(!DataType::Char.is_name_family());
        assert!(DataType::Cmd.is_command());
        assert!(DataType::CmdStr.is_command());
        assert!(!DataType::Dec.is_command());
    }
}
