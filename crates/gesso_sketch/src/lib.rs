//! Sketch - Finding the utility classes a project actually uses.
//!
//! Before paint goes on, the composition is sketched. This crate reads
//! source files, extracts the utility classes written in them and feeds the
//! ones the token graph is missing back into it, so only used combinations
//! are ever materialised.
//!
//! # Pipeline
//!
//! 1. **extract**: dialect-aware lexical extraction of candidate classes
//! 2. **class_name**: the `_[modifier:]*name[:value]` grammar
//! 3. **matcher**: resolving names and aliases against a [`gesso_canvas::Root`]
//! 4. **register**: recording missing values on their utilities
//!
//! The [`Scanner`] drives the first two over a file tree with a content-hash
//! [`ScanCache`] and an optional debounced [`ChangeBatcher`].
//!
//! # Example
//!
//! ```
//! use gesso_canvas::{declarations, Root};
//! use gesso_sketch::{match_utilities, register_matches, scan_content};
//!
//! let mut root = Root::new();
//! root.utility("margin", |value| declarations! { "margin" => value.clone() });
//!
//! let parsed = scan_content(r#"<div class="_margin:sm"></div>"#, None);
//! let matches = match_utilities(&parsed, &root);
//! let report = register_matches(&mut root, &matches);
//! assert_eq!(report.registered, 1);
//! ```

pub mod cache;
pub mod class_name;
pub mod config;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod register;
pub mod scanner;
pub mod source;
pub mod watcher;

pub use cache::{FileScanResult, ScanCache};
pub use class_name::{parse_utility_class, ParsedUtilityClass};
pub use config::{ScannerConfig, DEFAULT_CONTENT, DEFAULT_DEBOUNCE_MS, DEFAULT_IGNORE};
pub use error::{ScanError, ScanResult};
pub use extract::{extract_classes, Dialect};
pub use matcher::{match_utilities, UtilityMatch};
pub use register::{register_matches, RegistrationReport};
pub use scanner::{scan_content, ScanOutput, ScanStats, Scanner};
pub use source::{FileReader, FileSource, FsReader, GlobFileSource};
pub use watcher::ChangeBatcher;
