//! The query engine.
//!
//! [`Aster`] parses a directory once and answers queries against the
//! resulting forest. Errors are sticky: the first failure moves the engine
//! into a failed state it never leaves, and every later query returns empty
//! output (plus the stored error where the signature allows it). The only
//! way to recover is to build a new engine.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

use crate::analysis::{
    Declaration, DeclarationShape, DirectoryProvider, Forest, SourceTreeProvider,
};
use crate::error::AsterError;
use crate::flatten::{flatten, FlattenPolicy};
use crate::record::MatchResult;

/// Engine state. `Ready -> Failed` is one-way.
#[derive(Debug, Clone)]
enum State {
    Ready(Forest),
    Failed(AsterError),
}

/// Parsed Go packages plus the queries that run over them.
///
/// [`Aster::filter_packages`] and [`Aster::find_by_comment`] take
/// `&mut self` (the latter may record an error), so the borrow checker
/// serializes them against every other query.
#[derive(Debug, Clone)]
pub struct Aster {
    state: State,
    policy: FlattenPolicy,
    /// Results flattened before the failure that stopped the last query.
    partial: Vec<MatchResult>,
}

impl Aster {
    /// Parse every Go file in `path`.
    ///
    /// Never fails: a parse failure is stored and reported by the first
    /// query that can return an error.
    pub fn from_directory<P: AsRef<Path>>(path: P) -> Self {
        Self::with_provider(&DirectoryProvider, path)
    }

    /// Like [`Aster::from_directory`], using a custom provider.
    pub fn with_provider<S, P>(provider: &S, path: P) -> Self
    where
        S: SourceTreeProvider + ?Sized,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let state = match provider.parse_dir(path) {
            Ok(forest) => {
                debug!(
                    dir = %path.display(),
                    packages = forest.len(),
                    "loaded source tree"
                );
                State::Ready(forest)
            }
            Err(err) => {
                warn!(dir = %path.display(), error = %err, "failed to load source tree");
                State::Failed(err)
            }
        };

        Self {
            state,
            policy: FlattenPolicy::default(),
            partial: Vec::new(),
        }
    }

    /// Build an engine over an already parsed forest.
    pub fn from_forest(forest: Forest) -> Self {
        Self {
            state: State::Ready(forest),
            policy: FlattenPolicy::default(),
            partial: Vec::new(),
        }
    }

    /// Select how non-struct, non-function declarations are flattened.
    pub fn with_policy(mut self, policy: FlattenPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The stored error, if any query or the construction failed.
    pub fn error(&self) -> Option<&AsterError> {
        match &self.state {
            State::Ready(_) => None,
            State::Failed(err) => Some(err),
        }
    }

    /// Results gathered by the query that failed the engine, up to the
    /// declaration the flattener rejected. Empty otherwise.
    pub fn partial_results(&self) -> &[MatchResult] {
        &self.partial
    }

    pub fn is_failed(&self) -> bool {
        self.error().is_some()
    }

    /// The current forest; `None` once failed.
    pub fn forest(&self) -> Option<&Forest> {
        match &self.state {
            State::Ready(forest) => Some(forest),
            State::Failed(_) => None,
        }
    }

    /// Names of the packages still in the forest, sorted.
    pub fn package_names(&self) -> Vec<String> {
        self.forest()
            .map(|forest| forest.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Keep only the packages whose name is in `names`.
    ///
    /// Unknown names are ignored; an empty list empties the forest. Does
    /// nothing once failed.
    pub fn filter_packages<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let State::Ready(forest) = &mut self.state {
            let wanted: HashSet<String> = names
                .into_iter()
                .map(|n| n.as_ref().to_string())
                .collect();
            forest.retain(|name, _| wanted.contains(name));
            debug!(packages = forest.len(), "filtered packages");
        }
        self
    }

    /// Package documentation of every remaining package.
    ///
    /// Each package contributes the doc text of all its files, in file
    /// order. With more than one package each block is prefixed with
    /// `"<name>:\n"`. Blocks are sorted before being joined so the output
    /// does not depend on iteration order. Empty once failed.
    pub fn package_comment(&self) -> String {
        let Some(forest) = self.forest() else {
            return String::new();
        };

        let mut blocks: Vec<String> = forest
            .iter()
            .map(|(name, pkg)| {
                let mut block = String::new();
                if forest.len() > 1 {
                    block.push_str(name);
                    block.push_str(":\n");
                }
                for file in &pkg.files {
                    if let Some(doc) = &file.doc {
                        block.push_str(&doc.text());
                    }
                }
                block
            })
            .collect();

        blocks.sort();
        blocks.concat()
    }

    /// Declarations whose preceding comment group matches `pattern`.
    ///
    /// `pattern` is a regular expression matched against the full text of
    /// every comment group. A matching group selects every declaration that
    /// starts on the line right after the group ends. Results come in
    /// package, file, comment group, declaration order.
    ///
    /// An invalid pattern or a declaration the flattener rejects fails the
    /// engine.
    pub fn find_by_comment(&mut self, pattern: &str) -> Result<Vec<MatchResult>, AsterError> {
        let forest = match &self.state {
            State::Failed(err) => return Err(err.clone()),
            State::Ready(forest) => forest,
        };

        let matcher = match Regex::new(pattern) {
            Ok(re) => re,
            Err(source) => {
                return Err(self.fail(AsterError::Pattern {
                    pattern: pattern.to_string(),
                    source,
                }))
            }
        };

        let mut results = Vec::new();
        let mut failure = None;

        'search: for pkg in forest.values() {
            for file in &pkg.files {
                for group in &file.comments {
                    if !matcher.is_match(&group.text()) {
                        continue;
                    }
                    for decl in file.declarations_at(group.end_line() + 1) {
                        log_match(decl);
                        match flatten(decl, self.policy) {
                            Ok(result) => results.push(result),
                            Err(err) => {
                                failure = Some(err);
                                break 'search;
                            }
                        }
                    }
                }
            }
        }

        if let Some(err) = failure {
            self.partial = results;
            return Err(self.fail(err));
        }

        debug!(pattern, matches = results.len(), "matched comments");
        Ok(results)
    }

    /// Move into the failed state and hand back the error.
    fn fail(&mut self, err: AsterError) -> AsterError {
        warn!(error = %err, "query failed; engine disabled");
        self.state = State::Failed(err.clone());
        err
    }
}

fn log_match(decl: &Declaration) {
    let receiver = match &decl.shape {
        DeclarationShape::Function { receiver, .. } => receiver.as_deref(),
        _ => None,
    };
    debug!(
        name = decl.name().unwrap_or(""),
        receiver,
        shape = %decl.shape.describe(),
        at = %decl.span,
        "matched declaration"
    );
}
