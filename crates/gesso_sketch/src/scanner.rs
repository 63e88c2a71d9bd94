//! Content scanner.
//!
//! Reads source files, extracts the utility classes they use and parses
//! them. Per-file work is independent, so whole-tree scans fan out over the
//! rayon thread pool; results are aggregated in file-source order so the
//! output is stable for a given set of files.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use gesso_primer::hash::ContentHash;
use gesso_primer::{CompactString, FxIndexSet, IndexMap};
use rayon::prelude::*;

use crate::cache::{FileScanResult, ScanCache};
use crate::class_name::{parse_utility_class, ParsedUtilityClass};
use crate::config::ScannerConfig;
use crate::error::{ScanError, ScanResult};
use crate::extract::{extract_classes, Dialect};
use crate::source::{FileReader, FileSource, FsReader, GlobFileSource};
use crate::watcher::ChangeBatcher;

/// Counters of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files that were read.
    pub files_scanned: usize,
    /// Files whose cached result was reused.
    pub cache_hits: usize,
    /// Files that could not be read, in source order.
    pub failed: Vec<PathBuf>,
}

/// Aggregate of a scan over several files.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    /// Result per file, in source order.
    pub files: IndexMap<PathBuf, Arc<FileScanResult>>,
    /// Union of all classes, first-seen order.
    pub all_classes: FxIndexSet<CompactString>,
    /// Concatenation of every file's parsed classes, in file order.
    pub all_parsed: Vec<ParsedUtilityClass>,
    pub stats: ScanStats,
}

impl ScanOutput {
    fn push(&mut self, result: Arc<FileScanResult>) {
        self.all_classes.extend(result.classes.iter().cloned());
        self.all_parsed.extend(result.parsed.iter().cloned());
        self.files.insert(result.path.clone(), result);
    }
}

/// Parse every extracted class, dropping malformed ones.
fn parse_all<'a>(classes: impl IntoIterator<Item = &'a CompactString>) -> Vec<ParsedUtilityClass> {
    classes
        .into_iter()
        .filter_map(|class| parse_utility_class(class))
        .collect()
}

pub struct Scanner {
    config: ScannerConfig,
    cache: ScanCache,
    source: Arc<dyn FileSource>,
    reader: Arc<dyn FileReader>,
}

impl Scanner {
    /// Scanner over the file system.
    pub fn new(config: ScannerConfig) -> Self {
        Self {
            config,
            cache: ScanCache::new(),
            source: Arc::new(GlobFileSource),
            reader: Arc::new(FsReader),
        }
    }

    pub fn with_source(mut self, source: impl FileSource + 'static) -> Self {
        self.source = Arc::new(source);
        self
    }

    pub fn with_reader(mut self, reader: impl FileReader + 'static) -> Self {
        self.reader = Arc::new(reader);
        self
    }

    #[inline]
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    #[inline]
    pub fn cache(&self) -> &ScanCache {
        &self.cache
    }

    /// Scan every file the source lists.
    ///
    /// A file that cannot be read is logged and left out of the output. Only
    /// a failing file source aborts the scan.
    pub fn scan(&self) -> ScanResult<ScanOutput> {
        let start = Instant::now();
        let files = self.source.files(
            self.config.base_dir(),
            &self.config.content,
            &self.config.ignore,
        )?;
        let output = self.scan_paths(&files);

        tracing::info!(
            files = output.files.len(),
            cache_hits = output.stats.cache_hits,
            failed = output.stats.failed.len(),
            classes = output.all_classes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan complete"
        );
        Ok(output)
    }

    /// Scan the given files in parallel, skipping the ones that fail.
    pub fn scan_paths(&self, files: &[PathBuf]) -> ScanOutput {
        let results: Vec<(&PathBuf, ScanResult<(Arc<FileScanResult>, bool)>)> = files
            .par_iter()
            .map(|path| (path, self.scan_file_cached(path)))
            .collect();

        let mut output = ScanOutput::default();
        for (path, result) in results {
            match result {
                Ok((result, hit)) => {
                    if hit {
                        output.stats.cache_hits += 1;
                    } else {
                        output.stats.files_scanned += 1;
                    }
                    output.push(result);
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping file");
                    output.stats.failed.push(path.clone());
                }
            }
        }
        output
    }

    /// Scan one file, reusing the cached result when its content is
    /// unchanged.
    pub fn scan_file(&self, path: &Path) -> ScanResult<Arc<FileScanResult>> {
        self.scan_file_cached(path).map(|(result, _)| result)
    }

    fn scan_file_cached(&self, path: &Path) -> ScanResult<(Arc<FileScanResult>, bool)> {
        let content = self.reader.read(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let hash = ContentHash::of(&content);

        if let Some(cached) = self.cache.get_if_valid(path, hash) {
            tracing::debug!(path = %path.display(), "cache hit");
            return Ok((cached, true));
        }

        tracing::debug!(path = %path.display(), hash = %hash, "cache miss");
        let classes = extract_classes(&content, Dialect::from_path(path));
        let parsed = parse_all(&classes);
        let result = Arc::new(FileScanResult {
            path: path.to_path_buf(),
            classes,
            parsed,
            content_hash: hash,
            timestamp: SystemTime::now(),
        });
        self.cache.set(path, Arc::clone(&result), hash);
        Ok((result, false))
    }

    /// Extract and parse text without touching the file system or cache.
    ///
    /// The path hint selects the dialect; without one every extractor runs.
    pub fn scan_content(&self, content: &str, path_hint: Option<&Path>) -> Vec<ParsedUtilityClass> {
        scan_content(content, path_hint)
    }

    /// Forget one file, or everything.
    pub fn invalidate(&self, path: Option<&Path>) {
        match path {
            Some(path) => {
                self.cache.invalidate(path);
            }
            None => self.cache.clear(),
        }
    }

    /// Batch change notifications and rescan the changed files.
    ///
    /// The host feeds file-watch events into the returned batcher. For each
    /// batch the changed paths are invalidated and scanned again; the
    /// callback receives the result. Dropping the batcher stops watching.
    pub fn watch<F>(self: &Arc<Self>, callback: F) -> ScanResult<ChangeBatcher>
    where
        F: Fn(ScanOutput) + Send + Sync + 'static,
    {
        let scanner = Arc::clone(self);
        ChangeBatcher::new(self.config.debounce(), move |paths| {
            for path in &paths {
                scanner.invalidate(Some(path.as_path()));
            }
            let output = scanner.scan_paths(&paths);
            tracing::info!(
                changed = paths.len(),
                classes = output.all_classes.len(),
                "rescanned changed files"
            );
            callback(output);
        })
        .map_err(ScanError::Watcher)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScannerConfig::default())
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("config", &self.config)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Extract and parse text. The path hint selects the dialect.
pub fn scan_content(content: &str, path_hint: Option<&Path>) -> Vec<ParsedUtilityClass> {
    let dialect = path_hint.map_or(Dialect::Unknown, |path| Dialect::from_path(path));
    parse_all(&extract_classes(content, dialect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project(files: &[(&str, &str)]) -> (tempfile::TempDir, Scanner) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        let config = ScannerConfig::default().with_base_dir(dir.path());
        (dir, Scanner::new(config))
    }

    #[test]
    fn test_scan_aggregates_in_path_order() {
        let (_dir, scanner) = project(&[
            ("src/b.vue", r#"<template><div class="_gap:sm _flex"></div></template>"#),
            ("src/a.html", r#"<div class="_flex _margin:sm"></div>"#),
            ("README.md", "_ignored"),
        ]);
        let output = scanner.scan().unwrap();

        assert_eq!(output.files.len(), 2);
        let classes: Vec<_> = output.all_classes.iter().map(|c| c.as_str()).collect();
        assert_eq!(classes, vec!["_flex", "_margin:sm", "_gap:sm"]);
        assert_eq!(output.all_parsed.len(), 4);
        assert_eq!(output.stats.files_scanned, 2);
        assert_eq!(output.stats.cache_hits, 0);
    }

    #[test]
    fn test_unchanged_file_reuses_cached_result() {
        let (dir, scanner) = project(&[("index.html", r#"<div class="_margin:sm">"#)]);
        let path = dir.path().join("index.html");

        let first = scanner.scan_file(&path).unwrap();
        let second = scanner.scan_file(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        fs::write(&path, r#"<div class="_margin:lg">"#).unwrap();
        let third = scanner.scan_file(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert!(third.classes.contains("_margin:lg"));
        assert!(!third.classes.contains("_margin:sm"));
    }

    #[test]
    fn test_second_scan_hits_cache() {
        let (_dir, scanner) = project(&[("a.html", r#"<div class="_flex">"#)]);
        scanner.scan().unwrap();
        let output = scanner.scan().unwrap();
        assert_eq!(output.stats.cache_hits, 1);
        assert_eq!(output.stats.files_scanned, 0);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        struct Listed(Vec<PathBuf>);
        impl FileSource for Listed {
            fn files(&self, _: &Path, _: &[String], _: &[String]) -> ScanResult<Vec<PathBuf>> {
                Ok(self.0.clone())
            }
        }

        let (dir, scanner) = project(&[("a.html", r#"<div class="_flex">"#)]);
        let missing = dir.path().join("missing.html");
        let scanner = scanner.with_source(Listed(vec![dir.path().join("a.html"), missing.clone()]));

        let output = scanner.scan().unwrap();
        assert_eq!(output.files.len(), 1);
        assert_eq!(output.stats.failed, vec![missing]);
    }

    #[test]
    fn test_failing_source_aborts() {
        struct Broken;
        impl FileSource for Broken {
            fn files(&self, _: &Path, _: &[String], _: &[String]) -> ScanResult<Vec<PathBuf>> {
                Err(ScanError::Source("offline".into()))
            }
        }

        let scanner = Scanner::default().with_source(Broken);
        assert!(matches!(scanner.scan(), Err(ScanError::Source(_))));
    }

    #[test]
    fn test_invalidate() {
        let (dir, scanner) = project(&[("a.html", "<p class=\"_flex\">"), ("b.html", "")]);
        scanner.scan().unwrap();
        assert_eq!(scanner.cache().len(), 2);

        scanner.invalidate(Some(dir.path().join("a.html").as_path()));
        assert_eq!(scanner.cache().len(), 1);
        scanner.invalidate(None);
        assert!(scanner.cache().is_empty());
    }

    #[test]
    fn test_scan_content_uses_hint() {
        let parsed = scan_content("const a = '_flex'; <div class=\"_grid\">", Some(Path::new("x.ts")));
        let names: Vec<_> = parsed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["flex", "grid"]);

        let scanner = Scanner::default();
        let parsed = scanner.scan_content("<div class=\"_hover:padding:lg\">", None);
        assert_eq!(parsed[0].modifiers, vec!["hover"]);
    }

    #[test]
    fn test_scan_content_keeps_digit_leading_modifiers() {
        let parsed = scan_content(
            r#"<div class="_2xl:padding:md _md:padding:md">"#,
            Some(Path::new("a.html")),
        );
        let raw: Vec<_> = parsed.iter().map(|p| p.raw.as_str()).collect();
        assert_eq!(raw, vec!["_2xl:padding:md", "_md:padding:md"]);
        assert_eq!(parsed[0].modifiers, vec!["2xl"]);
    }

    #[test]
    fn test_watch_rescans_changed_files() {
        let (dir, scanner) = project(&[("a.html", r#"<div class="_flex">"#)]);
        let scanner = Arc::new(Scanner::new(
            scanner.config().clone().with_debounce(std::time::Duration::from_millis(20)),
        ));
        let path = dir.path().join("a.html");
        scanner.scan_file(&path).unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        let batcher = scanner
            .watch(move |output| {
                let _ = tx.send(output);
            })
            .unwrap();

        fs::write(&path, r#"<div class="_grid">"#).unwrap();
        batcher.on_change(&path);
        batcher.flush();

        let output = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert!(output.all_classes.contains("_grid"));
        assert_eq!(output.stats.files_scanned, 1);
    }
}
