//! Single-class conditional bindings.
//!
//! - Svelte: `class:_hidden={!open}`
//! - Angular: `[class._hidden]="!open"`

use gesso_primer::{CompactString, FxIndexSet};
use memchr::memmem;

use super::tokens::{collect_utilities, looks_like_utility};

/// Read a class name starting at `start` up to the first byte in `stops`
/// outside of brackets.
fn take_class(bytes: &[u8], start: usize, stops: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = start;
    while pos < bytes.len() {
        match bytes[pos] {
            b'[' => depth += 1,
            b']' if depth > 0 => depth -= 1,
            b if depth == 0 && (stops.contains(&b) || b.is_ascii_whitespace()) => break,
            _ => {}
        }
        pos += 1;
    }
    (pos > start).then_some(pos)
}

fn collect_directive(
    content: &str,
    prefix: &[u8],
    stops: &[u8],
    word_start: bool,
    out: &mut FxIndexSet<CompactString>,
) {
    let bytes = content.as_bytes();
    let finder = memmem::Finder::new(prefix);
    for found in finder.find_iter(bytes) {
        if word_start && found > 0 && !bytes[found - 1].is_ascii_whitespace() {
            continue;
        }
        let start = found + prefix.len();
        let Some(end) = take_class(bytes, start, stops) else {
            continue;
        };
        let class = &content[start..end];
        if looks_like_utility(class) {
            collect_utilities(class, out);
        }
    }
}

/// Collect utilities from Svelte `class:` directives.
pub fn extract_svelte_directives(content: &str, out: &mut FxIndexSet<CompactString>) {
    collect_directive(content, b"class:", b"=>/", true, out);
}

/// Collect utilities from Angular `[class.]` bindings.
pub fn extract_angular_bindings(content: &str, out: &mut FxIndexSet<CompactString>) {
    collect_directive(content, b"[class.", b"]", false, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(f: fn(&str, &mut FxIndexSet<CompactString>), content: &str) -> Vec<String> {
        let mut out = FxIndexSet::default();
        f(content, &mut out);
        out.into_iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_svelte_directive() {
        assert_eq!(
            run(
                extract_svelte_directives,
                "<div class:_hidden={!open} class:_margin:[4px]={tight} class:active>"
            ),
            vec!["_hidden", "_margin:[4px]"]
        );
    }

    #[test]
    fn test_svelte_shorthand() {
        assert_eq!(
            run(extract_svelte_directives, "<div class:_flex />"),
            vec!["_flex"]
        );
    }

    #[test]
    fn test_angular_binding() {
        assert_eq!(
            run(
                extract_angular_bindings,
                r#"<div [class._hover:color:primary]="active" [class.open]="x">"#
            ),
            vec!["_hover:color:primary"]
        );
    }
}
