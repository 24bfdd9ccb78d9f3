//! Core traits for source analysis.

use std::path::{Path, PathBuf};

use super::{Forest, SourceFile};
use crate::error::AsterError;

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// This is kept separate from [`SourceFile`] so the tree can be inspected
/// (e.g. for syntax errors) before facts are extracted.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for error reporting).
    pub path: PathBuf,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Language-specific analyzer trait.
///
/// # Thread Safety
///
/// Note: tree_sitter::Parser is not Sync, so implementations should
/// create parsers as needed.
pub trait LanguageAnalyzer: Send + Sync {
    /// Returns the language identifier (e.g., "go").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this analyzer handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse a source file into a tree-sitter tree.
    ///
    /// Syntax errors are reported as errors, not as trees with ERROR nodes.
    fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile, AsterError>;

    /// Extract package, comments and declarations from a parsed file.
    fn extract_file(&self, parsed: &ParsedFile) -> Result<SourceFile, AsterError>;

    /// Check if this analyzer handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}

/// Parses a directory into a [`Forest`].
///
/// The query engine calls this exactly once, at construction.
pub trait SourceTreeProvider {
    fn parse_dir(&self, dir: &Path) -> Result<Forest, AsterError>;
}
