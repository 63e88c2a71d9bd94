//! Content fingerprints using xxHash3.
//!
//! The scanner cache is keyed on these. The hash is not a security boundary;
//! the content length is folded in only to make accidental collisions
//! between different sizes impossible.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Fingerprint of a piece of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash {
    /// xxHash3 of the content bytes.
    pub hash: u64,
    /// Content length in bytes.
    pub len: usize,
}

impl ContentHash {
    #[inline]
    pub fn of(content: &str) -> Self {
        Self::of_bytes(content.as_bytes())
    }

    #[inline]
    pub fn of_bytes(content: &[u8]) -> Self {
        Self {
            hash: xxh3_64(content),
            len: content.len(),
        }
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}-{:x}", self.hash, self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_content_same_hash() {
        let content = "<div class=\"_margin:sm\"></div>";
        assert_eq!(ContentHash::of(content), ContentHash::of(content));
        assert_eq!(ContentHash::of(content), ContentHash::of_bytes(content.as_bytes()));
    }

    #[test]
    fn test_content_hash_includes_length() {
        let hash = ContentHash::of("abc");
        assert_eq!(hash.len, 3);
        assert_ne!(ContentHash::of("abc"), ContentHash::of("abcd"));
        assert_ne!(ContentHash::of("Hello").hash, ContentHash::of("World").hash);
    }

    #[test]
    fn test_content_hash_display() {
        let rendered = ContentHash::of("test").to_string();
        let (hex, len) = rendered.split_once('-').unwrap();
        assert_eq!(hex.len(), 16);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(len, "4");
    }
}
