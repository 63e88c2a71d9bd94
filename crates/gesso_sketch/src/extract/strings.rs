//! String literals in script code.
//!
//! The catch-all extractor: every single-quoted, double-quoted and template
//! literal body is searched for utilities. Template literals may span lines;
//! their `${...}` interpolations are searched along with the literal text.
//! Line and block comments are skipped so that an apostrophe in a comment
//! does not open a string.

use gesso_primer::{CompactString, FxIndexSet};
use memchr::{memchr, memmem};

use super::tokens::collect_utilities;

/// End of a quoted literal opened at `open`, or the end of the input.
fn literal_end(bytes: &[u8], open: usize) -> usize {
    let quote = bytes[open];
    let mut pos = open + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 1,
            b'\n' if quote != b'`' => return pos,
            b if b == quote => return pos,
            _ => {}
        }
        pos += 1;
    }
    bytes.len()
}

/// Collect utilities from every string literal in `content`.
pub fn extract_string_literals(content: &str, out: &mut FxIndexSet<CompactString>) {
    let bytes = content.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                pos = match memchr(b'\n', &bytes[pos..]) {
                    Some(offset) => pos + offset,
                    None => bytes.len(),
                };
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                pos = match memmem::find(&bytes[pos + 2..], b"*/") {
                    Some(offset) => pos + 2 + offset + 2,
                    None => bytes.len(),
                };
            }
            b'"' | b'\'' | b'`' => {
                let end = literal_end(bytes, pos);
                collect_utilities(&content[pos + 1..end], out);
                pos = end + 1;
            }
            _ => pos += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(content: &str) -> Vec<String> {
        let mut out = FxIndexSet::default();
        extract_string_literals(content, &mut out);
        out.into_iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_quote_styles() {
        let source = r#"
            const a = "_flex _gap:sm";
            const b = '_hover:color:primary';
            const c = `_grid
                _margin:[4px]`;
        "#;
        assert_eq!(
            extract(source),
            vec!["_flex", "_gap:sm", "_hover:color:primary", "_grid", "_margin:[4px]"]
        );
    }

    #[test]
    fn test_template_interpolation() {
        assert_eq!(
            extract("const cls = `_flex ${open ? '_block' : '_hidden'}`;"),
            vec!["_flex", "_block", "_hidden"]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = "// don't use '_old'\n/* it's '_gone' */\nconst x = '_kept';";
        assert_eq!(extract(source), vec!["_kept"]);
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(extract(r#"const s = "say \"hi\" _flex";"#), vec!["_flex"]);
    }

    #[test]
    fn test_identifiers_outside_strings_are_ignored() {
        assert!(extract("const _private = _helper(1);").is_empty());
    }
}
