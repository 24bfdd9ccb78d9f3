//! The parsed source forest: packages, files, comment groups, declarations.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use super::comments;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }

    /// Span covering `self` through `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start_byte: self.start_byte,
            end_byte: other.end_byte,
            start_line: self.start_line,
            start_col: self.start_col,
            end_line: other.end_line,
            end_col: other.end_col,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// A contiguous run of comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    /// Raw comment texts, markers included (`// x`, `/* y */`).
    pub comments: Vec<String>,
    /// Span from the first comment's start to the last comment's end.
    pub span: Span,
    /// The group trails code on the line it starts on.
    pub line_comment: bool,
    /// The next token starts on the line right after the group ends.
    pub lead: bool,
}

impl CommentGroup {
    /// Line the group ends on.
    pub fn end_line(&self) -> usize {
        self.span.end_line
    }

    /// Documentation text with comment markers removed.
    pub fn text(&self) -> String {
        comments::group_text(&self.comments)
    }

    /// Whether this group documents something starting on `line`.
    pub fn documents(&self, line: usize) -> bool {
        self.lead && self.end_line() + 1 == line
    }
}

/// A struct member. Embedded fields (`Base`, `*pkg.Base`) are named after
/// the bare type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    /// Declared type, as written (whitespace normalized).
    pub type_name: String,
    pub doc: Option<CommentGroup>,
}

/// What a top-level declaration declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationShape {
    /// Function or method.
    Function {
        name: String,
        receiver: Option<String>,
    },
    /// `type X struct { ... }`
    Struct { name: String, fields: Vec<FieldDecl> },
    /// `type X <anything else>`; `shape` is the syntax kind of the type.
    OtherType { name: String, shape: String },
    /// `import`, `const`, `var`, or an empty `type ()` group.
    Other { keyword: String },
}

impl DeclarationShape {
    /// Short description used in errors and logs.
    pub fn describe(&self) -> String {
        match self {
            DeclarationShape::Function { .. } => "function".to_string(),
            DeclarationShape::Struct { .. } => "struct".to_string(),
            DeclarationShape::OtherType { shape, .. } => format!("type ({})", shape),
            DeclarationShape::Other { keyword } => keyword.clone(),
        }
    }
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub shape: DeclarationShape,
    /// Lead comment group ending on the line before the declaration.
    pub doc: Option<CommentGroup>,
    pub span: Span,
}

impl Declaration {
    /// Line the declaration starts on.
    pub fn start_line(&self) -> usize {
        self.span.start_line
    }

    /// Declared name, if the declaration has one.
    pub fn name(&self) -> Option<&str> {
        match &self.shape {
            DeclarationShape::Function { name, .. }
            | DeclarationShape::Struct { name, .. }
            | DeclarationShape::OtherType { name, .. } => Some(name),
            DeclarationShape::Other { .. } => None,
        }
    }
}

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub package: String,
    /// Comment group documenting the package clause.
    pub doc: Option<CommentGroup>,
    /// Every comment group in the file, in source order.
    pub comments: Vec<CommentGroup>,
    /// Top-level declarations, in source order.
    pub declarations: Vec<Declaration>,
}

impl SourceFile {
    /// Declarations starting on `line`.
    pub fn declarations_at(&self, line: usize) -> impl Iterator<Item = &Declaration> {
        self.declarations
            .iter()
            .filter(move |d| d.start_line() == line)
    }
}

/// Files sharing a package clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub files: Vec<SourceFile>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
        }
    }
}

/// All packages parsed from a directory, keyed by package name.
pub type Forest = BTreeMap<String, Package>;

/// Group files into packages by their package clause.
pub fn forest_from_files(files: impl IntoIterator<Item = SourceFile>) -> Forest {
    let mut forest = Forest::new();
    for file in files {
        forest
            .entry(file.package.clone())
            .or_insert_with(|| Package::new(file.package.clone()))
            .files
            .push(file);
    }
    forest
}
