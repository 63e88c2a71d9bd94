//! Bound class expressions.
//!
//! Component templates bind classes to script expressions, either inside a
//! quoted attribute (`:class="{ '_flex': open }"`) or inside braces
//! (`className={clsx('_flex', open && '_gap:sm')}`). The braced form may
//! nest, so the closing brace is found by tracking depth.

use gesso_primer::{CompactString, FxIndexSet};
use once_cell::sync::Lazy;
use regex::Regex;

use super::tokens::collect_utilities;

/// `:class="..."` and `v-bind:class="..."`.
static BOUND_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|\s)(?:v-bind:class|:class)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .unwrap_or_else(|err| panic!("invalid bound attribute pattern: {err}"))
});

/// `className={`, `class={` and `class:list={`, up to the opening brace.
static BRACED_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|\s)(?:className|class|class:list)\s*=\s*\{"#)
        .unwrap_or_else(|err| panic!("invalid braced attribute pattern: {err}"))
});

/// Collect utilities from quoted bound attributes.
pub fn extract_bound_attributes(content: &str, out: &mut FxIndexSet<CompactString>) {
    for captures in BOUND_ATTRIBUTE.captures_iter(content) {
        if let Some(expression) = captures.get(1).or_else(|| captures.get(2)) {
            collect_utilities(expression.as_str(), out);
        }
    }
}

/// Collect utilities from braced attribute expressions.
pub fn extract_braced_expressions(content: &str, out: &mut FxIndexSet<CompactString>) {
    for found in BRACED_ATTRIBUTE.find_iter(content) {
        let open = found.end() - 1;
        match matching_brace(content.as_bytes(), open) {
            Some(close) => collect_utilities(&content[open + 1..close], out),
            None => tracing::debug!(offset = open, "unterminated class expression"),
        }
    }
}

/// Index of the brace closing the one at `open`.
///
/// Braces inside string literals do not count.
pub fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut pos = open;

    while pos < bytes.len() {
        let byte = bytes[pos];
        match quote {
            Some(q) => {
                if byte == b'\\' {
                    pos += 1;
                } else if byte == q {
                    quote = None;
                }
            }
            None => match byte {
                b'"' | b'\'' | b'`' => quote = Some(byte),
                b'{' => depth += 1,
                b'}' => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(pos);
                    }
                }
                _ => {}
            },
        }
        pos += 1;
    }
    None
}
