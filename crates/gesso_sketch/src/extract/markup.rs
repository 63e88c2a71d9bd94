//! Static `class` attributes.

use gesso_primer::{CompactString, FxIndexSet};
use once_cell::sync::Lazy;
use regex::Regex;

use super::tokens::collect_attribute_utilities;

/// `class="..."` and `className="..."`, either quote style. The attribute
/// must start a word so that `data-class` and `:class` do not match.
static CLASS_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|[\s<])(?:class|className)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .unwrap_or_else(|err| panic!("invalid class attribute pattern: {err}"))
});

/// Collect utilities from static class attributes. Character references
/// (`&amp;`, `&#95;`) are decoded first.
pub fn extract_markup(content: &str, out: &mut FxIndexSet<CompactString>) {
    for captures in CLASS_ATTRIBUTE.captures_iter(content) {
        let Some(value) = captures.get(1).or_else(|| captures.get(2)) else {
            continue;
        };
        let value = value.as_str();
        if value.contains('&') {
            collect_attribute_utilities(&htmlize::unescape(value), out);
        } else {
            collect_attribute_utilities(value, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(content: &str) -> Vec<String> {
        let mut out = FxIndexSet::default();
        extract_markup(content, &mut out);
        out.into_iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_class_attribute() {
        assert_eq!(
            extract(r#"<div class="_margin:sm _hover:padding:lg">"#),
            vec!["_margin:sm", "_hover:padding:lg"]
        );
    }

    #[test]
    fn test_class_name_and_single_quotes() {
        assert_eq!(
            extract(r#"<p className='card _gap:md'></p><a class = "_flex">"#),
            vec!["_gap:md", "_flex"]
        );
    }

    #[test]
    fn test_bound_and_prefixed_attributes_are_ignored() {
        assert!(extract(r#"<div data-class="_margin:sm" :class="'_flex'">"#).is_empty());
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(
            extract(r#"<div class="&#95;margin:sm _content:[&quot;x&quot;]">"#),
            vec!["_margin:sm", r#"_content:["x"]"#]
        );
    }

    #[test]
    fn test_digit_leading_modifier() {
        assert_eq!(
            extract(r#"<div class="_2xl:padding:md _md:padding:md">"#),
            vec!["_2xl:padding:md", "_md:padding:md"]
        );
    }
}
