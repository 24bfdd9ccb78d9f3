//! Flattened, language-agnostic view of matched declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a matched declaration is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Struct,
    Func,
    /// Declarations the flattener does not classify; renders as `""`.
    #[default]
    #[serde(rename = "")]
    Unclassified,
}

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Struct => "struct",
            ResultKind::Func => "func",
            ResultKind::Unclassified => "",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A matched declaration, its comments and (for structs) its fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchResult {
    /// The name of the object
    pub name: String,
    /// The kind of the object
    #[serde(rename = "type")]
    pub kind: ResultKind,
    /// Comments associated with the object
    pub comments: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub comments: String,
}
