//! Where scanned files come from.
//!
//! The scanner does not walk the file system itself. A [`FileSource`] lists
//! the files to scan and a [`FileReader`] reads them, so hosts (a bundler
//! plugin, a dev server, tests) can supply their own.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::{ScanError, ScanResult};

/// Lists the files a whole-tree scan covers.
pub trait FileSource: Send + Sync {
    /// Files matching `patterns` under `base_dir`, minus `ignore`.
    ///
    /// Called once per whole-tree scan. The order of the returned paths is
    /// the order results are aggregated in.
    fn files(&self, base_dir: &Path, patterns: &[String], ignore: &[String]) -> ScanResult<Vec<PathBuf>>;
}

/// Reads file content.
pub trait FileReader: Send + Sync {
    fn read(&self, path: &Path) -> std::io::Result<String>;
}

/// File source backed by the `glob` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobFileSource;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn compile(pattern: &str) -> ScanResult<Pattern> {
    Pattern::new(pattern).map_err(|source| ScanError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl FileSource for GlobFileSource {
    fn files(&self, base_dir: &Path, patterns: &[String], ignore: &[String]) -> ScanResult<Vec<PathBuf>> {
        let ignore = ignore
            .iter()
            .map(|pattern| compile(pattern))
            .collect::<ScanResult<Vec<_>>>()?;

        let mut files = Vec::new();
        for pattern in patterns {
            let full = base_dir.join(pattern);
            let full = full.to_string_lossy();
            let entries = glob::glob_with(&full, MATCH_OPTIONS).map_err(|source| ScanError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;

            for entry in entries {
                let path = entry?;
                if !path.is_file() {
                    continue;
                }
                let relative = path.strip_prefix(base_dir).unwrap_or(&path);
                if ignore
                    .iter()
                    .any(|p| p.matches_path_with(relative, MATCH_OPTIONS) || p.matches_path_with(&path, MATCH_OPTIONS))
                {
                    continue;
                }
                files.push(path);
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }
}

/// Reads files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_glob_source_sorts_dedups_and_ignores() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/components")).unwrap();
        fs::create_dir_all(root.join("node_modules/lib")).unwrap();
        fs::write(root.join("src/App.vue"), "").unwrap();
        fs::write(root.join("src/components/Button.vue"), "").unwrap();
        fs::write(root.join("src/main.ts"), "").unwrap();
        fs::write(root.join("node_modules/lib/index.vue"), "").unwrap();

        let files = GlobFileSource
            .files(
                root,
                &["**/*.vue".to_string(), "src/*.vue".to_string()],
                &["**/node_modules/**".to_string()],
            )
            .unwrap();

        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(relative, vec!["src/App.vue", "src/components/Button.vue"]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GlobFileSource
            .files(dir.path(), &["src/[".to_string()], &[])
            .unwrap_err();
        assert!(matches!(err, ScanError::Pattern { .. }));
    }
}
