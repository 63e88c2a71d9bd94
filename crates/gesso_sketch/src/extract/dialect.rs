//! Source dialects.

use std::path::Path;

use phf::phf_map;

/// How utility classes are embedded in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Html,
    Vue,
    Svelte,
    /// JSX and TSX.
    Jsx,
    Astro,
    /// Plain script files. Only string literals are inspected.
    Script,
    /// Anything else. Every extractor runs.
    Unknown,
}

static EXTENSIONS: phf::Map<&'static str, Dialect> = phf_map! {
    "html" => Dialect::Html,
    "htm" => Dialect::Html,
    "vue" => Dialect::Vue,
    "svelte" => Dialect::Svelte,
    "jsx" => Dialect::Jsx,
    "tsx" => Dialect::Jsx,
    "astro" => Dialect::Astro,
    "js" => Dialect::Script,
    "mjs" => Dialect::Script,
    "cjs" => Dialect::Script,
    "ts" => Dialect::Script,
    "mts" => Dialect::Script,
    "cts" => Dialect::Script,
};

impl Dialect {
    /// Dialect of a file, by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    pub fn from_extension(extension: &str) -> Self {
        let lower = extension.to_ascii_lowercase();
        EXTENSIONS.get(lower.as_str()).copied().unwrap_or(Self::Unknown)
    }

    /// Whether the file contains markup with `class` attributes.
    #[inline]
    pub const fn has_markup(self) -> bool {
        !matches!(self, Self::Script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_path() {
        assert_eq!(Dialect::from_path("src/App.vue"), Dialect::Vue);
        assert_eq!(Dialect::from_path("index.HTML"), Dialect::Html);
        assert_eq!(Dialect::from_path("Button.tsx"), Dialect::Jsx);
        assert_eq!(Dialect::from_path("store.ts"), Dialect::Script);
        assert_eq!(Dialect::from_path("notes.md"), Dialect::Unknown);
        assert_eq!(Dialect::from_path("Makefile"), Dialect::Unknown);
    }
}
