//! Configuration file loading for gesso.
//!
//! Reads `gesso.config.json` from a project directory. Also provides a JSON
//! Schema for editor autocompletion.

use std::path::{Path, PathBuf};

use gesso_sketch::ScannerConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transpiler::BuildOptions;

/// File name looked up in the project directory.
pub const CONFIG_FILE: &str = "gesso.config.json";

/// Top-level gesso configuration.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct GessoConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Which sources the scanner reads.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Options handed to the transpiler.
    #[serde(default)]
    pub build: BuildOptions,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn base_dir(dir: Option<&Path>) -> PathBuf {
    dir.map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
}

/// Resolve the scanner base directory against the config directory.
fn resolve(mut config: GessoConfig, base: &Path) -> GessoConfig {
    let scan_dir = match config.scanner.base_dir.take() {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => base.join(dir),
        None => base.to_path_buf(),
    };
    config.scanner.base_dir = Some(scan_dir);
    config
}

/// Load `gesso.config.json` from the given directory (or CWD if None).
///
/// A missing file yields the defaults.
pub fn try_load_config(dir: Option<&Path>) -> Result<GessoConfig, ConfigError> {
    let base = base_dir(dir);
    let config_path = base.join(CONFIG_FILE);

    if !config_path.exists() {
        return Ok(resolve(GessoConfig::default(), &base));
    }

    let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;
    let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: config_path,
        source,
    })?;
    Ok(resolve(config, &base))
}

/// Like [`try_load_config`], but an unreadable or malformed file is logged
/// and yields the defaults.
pub fn load_config(dir: Option<&Path>) -> GessoConfig {
    match try_load_config(dir) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{e}");
            resolve(GessoConfig::default(), &base_dir(dir))
        }
    }
}

/// JSON Schema for `gesso.config.json`.
pub const GESSO_CONFIG_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Gesso Configuration",
  "description": "Configuration file for gesso - design tokens with just-in-time utility classes",
  "type": "object",
  "properties": {
    "$schema": {
      "type": "string",
      "description": "JSON Schema reference for editor autocompletion"
    },
    "scanner": {
      "type": "object",
      "description": "Source files scanned for utility classes",
      "properties": {
        "content": {
          "type": "array",
          "description": "Glob patterns of files to scan, relative to baseDir",
          "items": { "type": "string" },
          "examples": [["src/**/*.vue", "index.html"]]
        },
        "ignore": {
          "type": "array",
          "description": "Glob patterns of files to skip",
          "items": { "type": "string" },
          "default": ["**/node_modules/**"]
        },
        "baseDir": {
          "type": "string",
          "description": "Directory patterns are resolved against, relative to this file"
        },
        "debounceMs": {
          "type": "integer",
          "minimum": 0,
          "default": 100,
          "description": "Quiet period before a batch of file changes is rescanned"
        }
      },
      "additionalProperties": false
    },
    "build": {
      "type": "object",
      "description": "Options passed to the transpiler",
      "properties": {
        "outDir": {
          "type": "string",
          "description": "Directory artifacts are written to"
        },
        "minify": {
          "type": "boolean",
          "default": false
        },
        "typeDeclarations": {
          "type": "boolean",
          "default": false,
          "description": "Emit a type declaration artifact next to the source artifact"
        }
      },
      "additionalProperties": false
    }
  },
  "additionalProperties": false
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = try_load_config(Some(dir.path())).unwrap();
        assert_eq!(config.scanner.content, ScannerConfig::default().content);
        assert_eq!(config.scanner.base_dir.as_deref(), Some(dir.path()));
        assert!(!config.build.minify);
    }

    #[test]
    fn test_reads_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{
                "$schema": "./node_modules/.gesso/schema.json",
                "scanner": { "content": ["src/**/*.vue"], "baseDir": "app" },
                "build": { "minify": true }
            }"#,
        )
        .unwrap();

        let config = try_load_config(Some(dir.path())).unwrap();
        assert_eq!(config.schema.as_deref(), Some("./node_modules/.gesso/schema.json"));
        assert_eq!(config.scanner.content, vec!["src/**/*.vue"]);
        assert_eq!(config.scanner.ignore, vec!["**/node_modules/**"]);
        assert_eq!(config.scanner.base_dir, Some(dir.path().join("app")));
        assert_eq!(config.scanner.debounce_ms, 100);
        assert!(config.build.minify);
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ scanner: ").unwrap();

        let err = try_load_config(Some(dir.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("failed to parse"));

        let config = load_config(Some(dir.path()));
        assert_eq!(config.scanner.debounce_ms, 100);
    }

    #[test]
    fn test_schema_is_valid_json() {
        let schema: serde_json::Value = serde_json::from_str(GESSO_CONFIG_SCHEMA).unwrap();
        assert_eq!(schema["title"], "Gesso Configuration");
    }
}
