//! Declaration flattening.
//!
//! Turns one [`Declaration`] into a [`MatchResult`]. Functions and methods
//! become `func` results, struct types become `struct` results with one
//! [`Field`] per member. Everything else is either passed through as an
//! unclassified result or rejected, depending on the [`FlattenPolicy`].

use serde::{Deserialize, Serialize};

use crate::analysis::{CommentGroup, Declaration, DeclarationShape, FieldDecl};
use crate::error::AsterError;
use crate::record::{Field, MatchResult, ResultKind};

/// How to treat declarations that are neither functions nor structs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlattenPolicy {
    /// Produce an [`ResultKind::Unclassified`] result.
    #[default]
    Permissive,
    /// Fail with [`AsterError::UnsupportedDeclaration`].
    Strict,
}

/// Flatten a declaration into a result record.
pub fn flatten(decl: &Declaration, policy: FlattenPolicy) -> Result<MatchResult, AsterError> {
    let comments = doc_text(decl.doc.as_ref());

    match &decl.shape {
        DeclarationShape::Function { name, .. } => Ok(MatchResult {
            name: name.clone(),
            kind: ResultKind::Func,
            comments,
            fields: Vec::new(),
        }),
        DeclarationShape::Struct { name, fields } => Ok(MatchResult {
            name: name.clone(),
            kind: ResultKind::Struct,
            comments,
            fields: fields.iter().map(flatten_field).collect(),
        }),
        shape if policy == FlattenPolicy::Strict => Err(AsterError::UnsupportedDeclaration {
            shape: shape.describe(),
            line: decl.start_line(),
        }),
        DeclarationShape::OtherType { name, .. } => Ok(MatchResult {
            name: name.clone(),
            kind: ResultKind::Unclassified,
            comments,
            fields: Vec::new(),
        }),
        DeclarationShape::Other { .. } => Ok(MatchResult {
            comments,
            ..MatchResult::default()
        }),
    }
}

fn flatten_field(field: &FieldDecl) -> Field {
    Field {
        name: field.name.clone(),
        type_name: field.type_name.clone(),
        comments: doc_text(field.doc.as_ref()),
    }
}

fn doc_text(doc: Option<&CommentGroup>) -> String {
    doc.map(CommentGroup::text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Span;

    fn span(line: usize) -> Span {
        Span {
            start_line: line,
            end_line: line,
            start_col: 1,
            end_col: 1,
            ..Span::default()
        }
    }

    fn doc(text: &str, line: usize) -> Option<CommentGroup> {
        Some(CommentGroup {
            comments: vec![text.to_string()],
            span: span(line),
            line_comment: false,
            lead: true,
        })
    }

    fn decl(shape: DeclarationShape) -> Declaration {
        Declaration {
            shape,
            doc: doc("// aster: hello", 4),
            span: span(5),
        }
    }

    #[test]
    fn test_flatten_function() {
        let result = flatten(
            &decl(DeclarationShape::Function {
                name: "Sampler".to_string(),
                receiver: None,
            }),
            FlattenPolicy::Permissive,
        )
        .unwrap();

        assert_eq!(result.name, "Sampler");
        assert_eq!(result.kind, ResultKind::Func);
        assert_eq!(result.comments, "aster: hello\n");
        assert!(result.fields.is_empty());
    }

    #[test]
    fn test_flatten_struct() {
        let shape = DeclarationShape::Struct {
            name: "Sample".to_string(),
            fields: vec![
                FieldDecl {
                    name: "Text".to_string(),
                    type_name: "string".to_string(),
                    doc: doc("// Text is some sample text", 6),
                },
                FieldDecl {
                    name: "Count".to_string(),
                    type_name: "int".to_string(),
                    doc: None,
                },
            ],
        };

        let result = flatten(&decl(shape), FlattenPolicy::Strict).unwrap();
        assert_eq!(result.kind, ResultKind::Struct);
        assert_eq!(
            result.fields,
            vec![
                Field {
                    name: "Text".to_string(),
                    type_name: "string".to_string(),
                    comments: "Text is some sample text\n".to_string(),
                },
                Field {
                    name: "Count".to_string(),
                    type_name: "int".to_string(),
                    comments: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_flatten_other_permissive() {
        let iface = decl(DeclarationShape::OtherType {
            name: "Service".to_string(),
            shape: "interface_type".to_string(),
        });
        let result = flatten(&iface, FlattenPolicy::Permissive).unwrap();
        assert_eq!(result.name, "Service");
        assert_eq!(result.kind, ResultKind::Unclassified);
        assert_eq!(result.comments, "aster: hello\n");

        let import = decl(DeclarationShape::Other {
            keyword: "import".to_string(),
        });
        let result = flatten(&import, FlattenPolicy::Permissive).unwrap();
        assert_eq!(result.name, "");
        assert_eq!(result.kind, ResultKind::Unclassified);
        assert_eq!(result.comments, "aster: hello\n");
    }

    #[test]
    fn test_flatten_other_strict() {
        let iface = decl(DeclarationShape::OtherType {
            name: "Service".to_string(),
            shape: "interface_type".to_string(),
        });
        match flatten(&iface, FlattenPolicy::Strict) {
            Err(AsterError::UnsupportedDeclaration { shape, line }) => {
                assert_eq!(shape, "type (interface_type)");
                assert_eq!(line, 5);
            }
            other => panic!("expected unsupported declaration, got {other:?}"),
        }
    }
}
