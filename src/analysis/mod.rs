//! Go source tree provider.
//!
//! This module turns a directory of Go files into a [`Forest`] of packages,
//! files, comment groups and declarations using tree-sitter.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Directory       │────▶│ GoAnalyzer   │────▶│ SourceFile    │
//! └─────────────────┘     │ (tree-sitter)│     │ (comments,    │
//!                         └──────────────┘     │  declarations)│
//!                                              └───────────────┘
//!                                                      │
//!                                                      ▼
//!                                              ┌───────────────┐
//!                                              │ Forest        │
//!                                              │ (by package)  │
//!                                              └───────────────┘
//! ```
//!
//! Every node keeps a [`Span`]; comment groups are associated with the
//! declaration starting on the line after they end.

pub(crate) mod comments;
mod facts;
mod languages;
mod provider;
mod traits;

pub use comments::group_text;
pub use facts::{
    forest_from_files, CommentGroup, Declaration, DeclarationShape, FieldDecl, Forest, Package,
    SourceFile, Span,
};
pub use languages::{get_analyzer, register_analyzers, GoAnalyzer};
pub use provider::DirectoryProvider;
pub use traits::{LanguageAnalyzer, ParsedFile, SourceTreeProvider};
