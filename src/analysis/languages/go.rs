//! Go language analyzer using tree-sitter.
//!
//! Extracts:
//! - The package clause and the comment documenting it
//! - Every comment group in the file
//! - Top-level declarations (functions, methods, types, imports, consts, vars)
//! - Struct fields with their declared types and doc comments

use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};

use crate::analysis::comments::CommentGrouper;
use crate::analysis::{
    CommentGroup, Declaration, DeclarationShape, FieldDecl, LanguageAnalyzer, ParsedFile,
    SourceFile, Span,
};
use crate::error::AsterError;

/// Tree-sitter query for package declaration.
const PACKAGE_QUERY: &str = r#"
(package_clause
  (package_identifier) @package_name
) @package
"#;

/// Go language analyzer.
pub struct GoAnalyzer {
    language: Language,
}

impl GoAnalyzer {
    /// Create a new Go analyzer.
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// Create a new parser for this thread.
    fn create_parser(&self) -> Result<Parser, AsterError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| AsterError::Language(e.to_string()))?;
        Ok(parser)
    }

    /// Extract the package name and the span of the package clause.
    fn extract_package(&self, parsed: &ParsedFile) -> Result<(String, Span), AsterError> {
        let query = Query::new(&self.language, PACKAGE_QUERY)
            .map_err(|e| AsterError::Language(e.to_string()))?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

        if let Some(m) = matches.next() {
            let mut name = None;
            let mut span = None;
            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "package_name" => name = Some(parsed.node_text(capture.node).to_string()),
                    "package" => span = Some(Span::from_node(capture.node)),
                    _ => {}
                }
            }
            if let (Some(name), Some(span)) = (name, span) {
                return Ok((name, span));
            }
        }

        Err(AsterError::MissingPackageClause {
            path: parsed.path.clone(),
        })
    }

    /// Walk every token in source order and group the comments.
    fn collect_comments(&self, parsed: &ParsedFile) -> Vec<CommentGroup> {
        let mut grouper = CommentGrouper::new();
        let mut cursor = parsed.tree.walk();

        'walk: loop {
            let node = cursor.node();
            if node.kind() == "comment" {
                grouper.comment(parsed.node_text(node), Span::from_node(node));
            } else if node.child_count() == 0 && !parsed.node_text(node).trim().is_empty() {
                // Newline terminators are tokens too; they must not count as code.
                grouper.code(Span::from_node(node));
            }

            if node.kind() != "comment" && cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    break 'walk;
                }
            }
        }

        grouper.finish()
    }

    /// Extract top-level declarations in source order.
    fn extract_declarations(
        &self,
        parsed: &ParsedFile,
        groups: &[CommentGroup],
    ) -> Vec<Declaration> {
        let root = parsed.tree.root_node();
        let mut cursor = root.walk();

        root.named_children(&mut cursor)
            .filter_map(|node| {
                let shape = self.declaration_shape(parsed, node, groups)?;
                let span = Span::from_node(node);
                Some(Declaration {
                    shape,
                    doc: doc_for(groups, span.start_line),
                    span,
                })
            })
            .collect()
    }

    fn declaration_shape(
        &self,
        parsed: &ParsedFile,
        node: Node,
        groups: &[CommentGroup],
    ) -> Option<DeclarationShape> {
        match node.kind() {
            "function_declaration" => Some(DeclarationShape::Function {
                name: field_text(parsed, node, "name"),
                receiver: None,
            }),
            "method_declaration" => Some(DeclarationShape::Function {
                name: field_text(parsed, node, "name"),
                receiver: self.receiver_type(parsed, node),
            }),
            "type_declaration" => Some(self.type_shape(parsed, node, groups)),
            "import_declaration" => Some(other("import")),
            "const_declaration" => Some(other("const")),
            "var_declaration" => Some(other("var")),
            _ => None,
        }
    }

    /// Receiver type name of a method, without pointer or type arguments.
    fn receiver_type(&self, parsed: &ParsedFile, method: Node) -> Option<String> {
        let receiver = method.child_by_field_name("receiver")?;
        let mut cursor = receiver.walk();
        let param = receiver
            .named_children(&mut cursor)
            .find(|n| n.kind() == "parameter_declaration")?;
        let ty = param.child_by_field_name("type")?;
        Some(bare_type_name(parsed.node_text(ty)))
    }

    /// Shape of a `type` declaration, decided by its first spec.
    fn type_shape(
        &self,
        parsed: &ParsedFile,
        node: Node,
        groups: &[CommentGroup],
    ) -> DeclarationShape {
        let mut cursor = node.walk();
        let first_spec = node
            .named_children(&mut cursor)
            .find(|n| matches!(n.kind(), "type_spec" | "type_alias"));

        let Some(spec) = first_spec else {
            return other("type");
        };

        let name = field_text(parsed, spec, "name");
        match spec.child_by_field_name("type") {
            Some(ty) if ty.kind() == "struct_type" => DeclarationShape::Struct {
                name,
                fields: self.struct_fields(parsed, ty, groups),
            },
            Some(ty) => DeclarationShape::OtherType {
                name,
                shape: ty.kind().to_string(),
            },
            None => DeclarationShape::OtherType {
                name,
                shape: spec.kind().to_string(),
            },
        }
    }

    /// One field per declared name; embedded fields are named after their type.
    fn struct_fields(
        &self,
        parsed: &ParsedFile,
        struct_type: Node,
        groups: &[CommentGroup],
    ) -> Vec<FieldDecl> {
        let mut cursor = struct_type.walk();
        let Some(list) = struct_type
            .named_children(&mut cursor)
            .find(|n| n.kind() == "field_declaration_list")
        else {
            return Vec::new();
        };

        let mut fields = Vec::new();
        let mut list_cursor = list.walk();
        for decl in list.named_children(&mut list_cursor) {
            if decl.kind() != "field_declaration" {
                continue;
            }

            let doc = doc_for(groups, Span::from_node(decl).start_line);
            let type_text = decl
                .child_by_field_name("type")
                .map(|ty| normalize_whitespace(parsed.node_text(ty)))
                .unwrap_or_default();

            let mut name_cursor = decl.walk();
            let names: Vec<String> = decl
                .children_by_field_name("name", &mut name_cursor)
                .map(|n| parsed.node_text(n).to_string())
                .collect();

            if names.is_empty() {
                let mut child_cursor = decl.walk();
                let pointer = decl
                    .children(&mut child_cursor)
                    .any(|c| !c.is_named() && c.kind() == "*");
                fields.push(FieldDecl {
                    name: bare_type_name(&type_text),
                    type_name: if pointer {
                        format!("*{}", type_text)
                    } else {
                        type_text
                    },
                    doc,
                });
                continue;
            }

            for name in names {
                fields.push(FieldDecl {
                    name,
                    type_name: type_text.clone(),
                    doc: doc.clone(),
                });
            }
        }

        fields
    }
}

impl Default for GoAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for GoAnalyzer {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile, AsterError> {
        if std::str::from_utf8(source).is_err() {
            return Err(AsterError::Io {
                path: path.to_path_buf(),
                message: "source is not valid UTF-8".to_string(),
            });
        }

        let mut parser = self.create_parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| {
            AsterError::Language(format!("failed to parse Go source: {}", path.display()))
        })?;

        if let Some(bad) = first_error_node(tree.root_node()) {
            let at = bad.start_position();
            return Err(AsterError::Syntax {
                path: path.to_path_buf(),
                line: at.row + 1,
                column: at.column + 1,
            });
        }

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_path_buf(),
        })
    }

    fn extract_file(&self, parsed: &ParsedFile) -> Result<SourceFile, AsterError> {
        let (package, package_span) = self.extract_package(parsed)?;
        let comments = self.collect_comments(parsed);
        let declarations = self.extract_declarations(parsed, &comments);

        Ok(SourceFile {
            path: parsed.path.clone(),
            package,
            doc: doc_for(&comments, package_span.start_line),
            comments,
            declarations,
        })
    }
}

fn other(keyword: &str) -> DeclarationShape {
    DeclarationShape::Other {
        keyword: keyword.to_string(),
    }
}

fn field_text(parsed: &ParsedFile, node: Node, field: &str) -> String {
    node.child_by_field_name(field)
        .map(|n| parsed.node_text(n).to_string())
        .unwrap_or_default()
}

/// The lead comment group documenting something that starts on `line`.
fn doc_for(groups: &[CommentGroup], line: usize) -> Option<CommentGroup> {
    groups.iter().find(|g| g.documents(line)).cloned()
}

/// `*pkg.Base[T]` -> `Base`
fn bare_type_name(text: &str) -> String {
    let text = text.trim().trim_start_matches('*');
    let text = text.split('[').next().unwrap_or(text);
    text.rsplit('.').next().unwrap_or(text).trim().to_string()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First ERROR or MISSING node in source order.
fn first_error_node(root: Node) -> Option<Node> {
    if !root.has_error() {
        return None;
    }
    if root.is_error() || root.is_missing() {
        return Some(root);
    }
    let mut cursor = root.walk();
    let children: Vec<Node> = root.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_node)
}
