//! Utility class candidates in free text.

use gesso_primer::grammar::{CLASS_SIGIL, SEGMENT_SEPARATOR};
use gesso_primer::{CompactString, FxIndexSet};

use crate::class_name::parse_utility_class;

/// Whether a byte ends a candidate outside of brackets.
#[inline]
fn is_boundary(byte: u8) -> bool {
    byte.is_ascii_whitespace()
        || matches!(
            byte,
            b'"' | b'\'' | b'`' | b',' | b';' | b'{' | b'}' | b'(' | b')' | b'<' | b'>' | b'='
        )
}

#[inline]
fn is_quote(byte: u8) -> bool {
    matches!(byte, b'"' | b'\'' | b'`')
}

/// Split text into candidate pieces.
///
/// Outside brackets any boundary byte ends a piece; inside brackets only a
/// quote does, so arbitrary values may contain spaces and parentheses.
pub fn candidates(text: &str) -> impl Iterator<Item = &str> {
    split(text, false)
}

/// Like [`candidates`], for the value of a static attribute. The value is
/// already delimited, so quotes inside brackets belong to the piece.
pub fn attribute_candidates(text: &str) -> impl Iterator<Item = &str> {
    split(text, true)
}

fn split(text: &str, quotes_in_brackets: bool) -> impl Iterator<Item = &str> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    std::iter::from_fn(move || {
        while pos < bytes.len() && is_boundary(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            return None;
        }

        let start = pos;
        let mut depth = 0usize;
        while pos < bytes.len() {
            let byte = bytes[pos];
            match byte {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                _ if is_quote(byte) && (depth == 0 || !quotes_in_brackets) => break,
                _ if depth == 0 && is_boundary(byte) => break,
                _ => {}
            }
            pos += 1;
        }
        Some(&text[start..pos])
    })
}

/// Whether a piece looks like a utility class: the sigil followed by a
/// letter or digit. The parser decides the rest.
#[inline]
pub fn looks_like_utility(piece: &str) -> bool {
    let mut chars = piece.chars();
    chars.next() == Some(CLASS_SIGIL) && chars.next().is_some_and(char::is_alphanumeric)
}

fn collect_pieces<'t>(pieces: impl Iterator<Item = &'t str>, out: &mut FxIndexSet<CompactString>) {
    for piece in pieces {
        let piece = piece.strip_suffix(SEGMENT_SEPARATOR).unwrap_or(piece);
        if looks_like_utility(piece) && parse_utility_class(piece).is_some() {
            out.insert(CompactString::from(piece));
        }
    }
}

/// Collect every well-formed utility class found in `text`.
///
/// A single trailing separator is dropped so that bare object keys
/// (`{ _hidden: cond }`) are found too.
pub fn collect_utilities(text: &str, out: &mut FxIndexSet<CompactString>) {
    collect_pieces(candidates(text), out);
}

/// Collect utilities from a static attribute value.
pub fn collect_attribute_utilities(value: &str, out: &mut FxIndexSet<CompactString>) {
    collect_pieces(attribute_candidates(value), out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str) -> Vec<String> {
        let mut out = FxIndexSet::default();
        collect_utilities(text, &mut out);
        out.into_iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_mixed_content() {
        assert_eq!(
            collect("btn _margin:sm primary _hover:padding:lg foo_bar"),
            vec!["_margin:sm", "_hover:padding:lg"]
        );
    }

    #[test]
    fn test_arbitrary_value_with_spaces() {
        assert_eq!(
            collect("{ '_grid:[1fr 2fr]': wide, _hidden: !open }"),
            vec!["_grid:[1fr 2fr]", "_hidden"]
        );
    }

    #[test]
    fn test_rejects_non_utilities() {
        assert!(collect("__proto__ _:x _.map _margin:[4px _ _a::b").is_empty());
    }

    #[test]
    fn test_digit_leading_segments() {
        assert_eq!(
            collect("_2xl:padding:md _md:padding:md _1col"),
            vec!["_2xl:padding:md", "_md:padding:md", "_1col"]
        );
    }

    #[test]
    fn test_attribute_quotes_inside_brackets() {
        let mut out = FxIndexSet::default();
        collect_attribute_utilities(r#"_content:["x"] _flex"#, &mut out);
        assert_eq!(out.into_iter().collect::<Vec<_>>(), vec![r#"_content:["x"]"#, "_flex"]);
        assert!(collect(r#"_content:["x"]"#).is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(collect("_flex _flex\n_flex"), vec!["_flex"]);
    }
}
