//! # Gesso
//!
//! Design tokens authored as a graph, with utility classes materialised just
//! in time from the classes a project's sources actually use.
//!
//! This crate re-exports the Gesso sub-crates and adds the pieces a host
//! needs around them: configuration loading, logging, the transpiler seam
//! and the scan-to-graph pass.
//!
//! ## Crates
//!
//! - [`primer`] - Shared hashing, grammar and collections
//! - [`canvas`] - The token graph
//! - [`sketch`] - Content scanner and JIT registration
//!
//! ## Example
//!
//! ```no_run
//! use gesso::canvas::{declarations, Root};
//! use gesso::sketch::Scanner;
//!
//! gesso::init_logging();
//! let config = gesso::load_config(None);
//!
//! let mut root = Root::new();
//! root.modifier(["hover"], |ctx| ctx.wrap("&:hover"));
//! root.utility("margin", |value| declarations! { "margin" => value.clone() });
//!
//! let scanner = Scanner::new(config.scanner);
//! let report = gesso::materialize(&mut root, &scanner).unwrap();
//! println!("{} new utility values", report.registered);
//! ```

pub mod config;
pub mod logging;
pub mod materialize;
pub mod transpiler;

/// Shared hashing, grammar and collections.
pub use gesso_primer as primer;

/// The token graph.
pub use gesso_canvas as canvas;

/// Content scanner and JIT registration.
pub use gesso_sketch as sketch;

pub use config::{load_config, try_load_config, ConfigError, GessoConfig, CONFIG_FILE, GESSO_CONFIG_SCHEMA};
pub use logging::init_logging;
pub use materialize::{materialize, materialize_output, MaterializeReport};
pub use transpiler::{build, Artifact, ArtifactKind, BuildOptions, Transpiler};
