//! Directory parsing: the default [`SourceTreeProvider`].

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use super::{forest_from_files, get_analyzer, Forest, SourceTreeProvider};
use crate::error::AsterError;

/// Parses every Go file directly inside a directory (no recursion).
///
/// Files are read in file-name order, so each package's files keep that
/// order. Symlinks to files are followed. The first file that fails to read or parse fails the whole
/// directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryProvider;

impl SourceTreeProvider for DirectoryProvider {
    fn parse_dir(&self, dir: &Path) -> Result<Forest, AsterError> {
        let metadata = fs::metadata(dir).map_err(|e| AsterError::io(dir, e))?;
        if !metadata.is_dir() {
            return Err(AsterError::Io {
                path: dir.to_path_buf(),
                message: "not a directory".to_string(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| AsterError::Io {
                path: dir.to_path_buf(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            let Some(analyzer) = get_analyzer(ext) else {
                continue;
            };

            let source = fs::read(path).map_err(|e| AsterError::io(path, e))?;
            let parsed = analyzer.parse(path, &source)?;
            let file = analyzer.extract_file(&parsed)?;
            debug!(
                file = %path.display(),
                package = %file.package,
                declarations = file.declarations.len(),
                comment_groups = file.comments.len(),
                "parsed source file"
            );
            files.push(file);
        }

        Ok(forest_from_files(files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_dir_groups_by_package() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.go"), "package foo\n\nfunc B() {}\n").unwrap();
        fs::write(dir.path().join("a.go"), "package foo\n\nfunc A() {}\n").unwrap();
        fs::write(dir.path().join("a_test.go"), "package foo_test\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not go").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.go"), "package sub\n").unwrap();

        let forest = DirectoryProvider.parse_dir(dir.path()).unwrap();

        let names: Vec<&str> = forest.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["foo", "foo_test"]);

        let files: Vec<String> = forest["foo"]
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(files, vec!["a.go", "b.go"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_dir_follows_file_symlinks() {
        let target = tempfile::tempdir().unwrap();
        let real = target.path().join("linked.go");
        fs::write(&real, "package foo\n\n// aster: linked\nfunc Linked() {}\n").unwrap();

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.go"), "package foo\n").unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("b.go")).unwrap();

        let forest = DirectoryProvider.parse_dir(dir.path()).unwrap();
        let foo = &forest["foo"];
        assert_eq!(foo.files.len(), 2);
        assert_eq!(foo.files[1].declarations[0].name(), Some("Linked"));
    }

    #[test]
    fn test_parse_dir_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = DirectoryProvider.parse_dir(&missing).unwrap_err();
        assert!(matches!(err, AsterError::Io { .. }));
    }

    #[test]
    fn test_parse_dir_rejects_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.go");
        fs::write(&file, "package a\n").unwrap();
        let err = DirectoryProvider.parse_dir(&file).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_parse_dir_syntax_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.go"), "package foo\n").unwrap();
        fs::write(dir.path().join("bad.go"), "package foo\n\nfunc (\n").unwrap();
        let err = DirectoryProvider.parse_dir(dir.path()).unwrap_err();
        assert!(matches!(err, AsterError::Syntax { .. }), "got {err:?}");
    }
}
