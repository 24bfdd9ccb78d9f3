//! Aster - query Go declarations by their comments.
//!
//! Aster parses a directory of Go source files and finds the declarations
//! that sit directly under a comment matching a regular expression. Matches
//! are flattened into simple [`MatchResult`] records: name, kind, comments
//! and, for structs, fields.
//!
//! ```no_run
//! let mut aster = aster::Aster::from_directory("sample");
//! for result in aster.find_by_comment("aster:")? {
//!     println!("{} {}", result.kind, result.name);
//! }
//! # Ok::<(), aster::AsterError>(())
//! ```
//!
//! # Architecture
//!
//! - `analysis`: tree-sitter backed parsing of a directory into a forest of
//!   packages, files, comment groups and declarations
//! - `engine`: the [`Aster`] query engine (filtering, package comments,
//!   comment matching)
//! - `flatten`: declaration to [`MatchResult`] conversion
//! - `record`: the output records
//! - `report`: output formatting (text, JSON)
//! - `config`, `cli`: the `aster` command

pub mod analysis;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod flatten;
pub mod record;
pub mod report;

pub use analysis::{
    Declaration, DeclarationShape, DirectoryProvider, Forest, GoAnalyzer, LanguageAnalyzer,
    SourceTreeProvider,
};
pub use config::Config;
pub use engine::Aster;
pub use error::AsterError;
pub use flatten::{flatten, FlattenPolicy};
pub use record::{Field, MatchResult, ResultKind};
