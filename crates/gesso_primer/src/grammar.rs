//! Textual grammar of utility classes.
//!
//! A utility class is written `_[modifier:]*name[:value]`. The value segment
//! may be omitted, in which case it is the literal `default`. Arbitrary values
//! are written in brackets (`_content:[url(http://x)]`).

/// Sigil every utility class starts with.
pub const CLASS_SIGIL: char = '_';

/// Separator between modifiers, name and value.
pub const SEGMENT_SEPARATOR: char = ':';

/// Value implied when a class has a single segment.
pub const DEFAULT_VALUE: &str = "default";

/// Build the class name for a utility value.
///
/// The `default` value is omitted so that the output is the shortest
/// spelling the parser accepts.
pub fn build_class_name<S: AsRef<str>>(name: &str, value: &str, modifiers: &[S]) -> String {
    let mut out = String::with_capacity(
        1 + name.len()
            + value.len()
            + modifiers.iter().map(|m| m.as_ref().len() + 1).sum::<usize>()
            + 1,
    );
    out.push(CLASS_SIGIL);
    for modifier in modifiers {
        out.push_str(modifier.as_ref());
        out.push(SEGMENT_SEPARATOR);
    }
    out.push_str(name);
    if value != DEFAULT_VALUE {
        out.push(SEGMENT_SEPARATOR);
        out.push_str(value);
    }
    out
}

/// Wrap a literal in the arbitrary value brackets.
#[inline]
pub fn arbitrary_key(literal: &str) -> String {
    format!("[{}]", literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_modifiers() {
        assert_eq!(
            build_class_name("background", "primary", &["dark", "hover"]),
            "_dark:hover:background:primary"
        );
    }

    #[test]
    fn test_build_omits_default_value() {
        assert_eq!(build_class_name::<&str>("hidden", "default", &[]), "_hidden");
    }

    #[test]
    fn test_arbitrary_key() {
        assert_eq!(arbitrary_key("16px"), "[16px]");
        assert_eq!(
            build_class_name::<&str>("margin", &arbitrary_key("16px"), &[]),
            "_margin:[16px]"
        );
    }
}
