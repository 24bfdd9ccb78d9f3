//! Error type shared by the source tree provider and the query engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors recorded by [`crate::Aster`].
///
/// The engine keeps the first error it hits and hands it back from every
/// later query, so the type is `Clone`.
#[derive(Debug, Clone, Error)]
pub enum AsterError {
    #[error("failed to read {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("{}:{line}:{column}: syntax error", .path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("{}: expected 'package' clause", .path.display())]
    MissingPackageClause { path: PathBuf },

    #[error("parser setup failed: {0}")]
    Language(String),

    #[error("invalid comment pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unsupported declaration shape {shape:?} at line {line}")]
    UnsupportedDeclaration { shape: String, line: usize },
}

impl AsterError {
    /// Wrap an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        AsterError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Whether this error came from reading or parsing the source tree.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            AsterError::Io { .. }
                | AsterError::Syntax { .. }
                | AsterError::MissingPackageClause { .. }
                | AsterError::Language(_)
        )
    }
}
