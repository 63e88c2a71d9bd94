//! Primer - The foundation coat for Gesso.
//!
//! Every painting starts with a primer layer that the rest of the work
//! adheres to. This crate plays the same role for the Gesso crates: it holds
//! the small shared utilities and the collection types the token graph and the
//! content scanner agree on.
//!
//! # Modules
//!
//! - **hash**: Content hashing used by the scanner cache
//! - **grammar**: Utility class sigil, separator and the class name builder
//!
//! # Example
//!
//! ```
//! use gesso_primer::hash::ContentHash;
//!
//! let a = ContentHash::of("<div class=\"_margin:sm\"></div>");
//! let b = ContentHash::of("<div class=\"_margin:sm\"></div>");
//! assert_eq!(a, b);
//! ```

pub mod grammar;
pub mod hash;

// Re-export compact_str::CompactString for convenience
pub use compact_str::{format_compact, CompactString};

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

// Re-export indexmap for insertion-ordered maps/sets
pub use indexmap;
pub use indexmap::{IndexMap, IndexSet};

/// Insertion-ordered map using the fast Fx hasher.
pub type FxIndexMap<K, V> = IndexMap<K, V, std::hash::BuildHasherDefault<rustc_hash::FxHasher>>;

/// Insertion-ordered set using the fast Fx hasher.
pub type FxIndexSet<T> = IndexSet<T, std::hash::BuildHasherDefault<rustc_hash::FxHasher>>;
