//! Scanner configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Source files scanned when no content patterns are configured.
pub const DEFAULT_CONTENT: &[&str] = &[
    "**/*.html",
    "**/*.vue",
    "**/*.svelte",
    "**/*.jsx",
    "**/*.tsx",
    "**/*.js",
    "**/*.ts",
    "**/*.astro",
];

/// Paths never scanned unless the ignore list is overridden.
pub const DEFAULT_IGNORE: &[&str] = &["**/node_modules/**"];

pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// What to scan and how to batch changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScannerConfig {
    /// Glob patterns of files to scan, relative to `base_dir`.
    pub content: Vec<String>,
    /// Glob patterns of files to skip.
    pub ignore: Vec<String>,
    /// Directory patterns are resolved against. Defaults to the working
    /// directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    /// Debounce window for change batching.
    pub debounce_ms: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            content: DEFAULT_CONTENT.iter().map(|s| s.to_string()).collect(),
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            base_dir: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl ScannerConfig {
    pub fn with_content<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = debounce.as_millis() as u64;
        self
    }

    #[inline]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Directory patterns are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.base_dir.as_deref().unwrap_or(Path::new("."))
    }
}
