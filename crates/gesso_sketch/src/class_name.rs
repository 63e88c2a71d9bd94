//! Utility class parser.
//!
//! Turns `_dark:hover:background:primary` into its modifiers, name and
//! value. Brackets protect the separator, so `_content:[url(http://x)]` has
//! the single value `[url(http://x)]`.

use gesso_primer::grammar::{build_class_name, CLASS_SIGIL, DEFAULT_VALUE, SEGMENT_SEPARATOR};
use gesso_primer::{CompactString, SmallVec};
use serde::Serialize;

/// A parsed utility class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedUtilityClass {
    /// The class as written.
    pub raw: CompactString,
    pub name: CompactString,
    pub value: CompactString,
    /// In the order written.
    pub modifiers: Vec<CompactString>,
    pub is_arbitrary: bool,
    /// Text between the brackets of an arbitrary value.
    pub arbitrary_value: Option<CompactString>,
}

impl ParsedUtilityClass {
    /// Rebuild the shortest class name for this descriptor.
    pub fn class_name(&self) -> String {
        build_class_name(&self.name, &self.value, &self.modifiers)
    }
}

/// Parse a utility class.
///
/// Returns `None` for text that is not a well-formed utility class: missing
/// sigil, nothing after it, an empty segment or unbalanced brackets.
pub fn parse_utility_class(input: &str) -> Option<ParsedUtilityClass> {
    let body = input.strip_prefix(CLASS_SIGIL)?;
    if body.is_empty() {
        return None;
    }

    let segments = split_segments(body)?;
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }

    let (modifiers, name, value) = match segments.as_slice() {
        [name] => (&[][..], *name, DEFAULT_VALUE),
        [modifiers @ .., name, value] => (modifiers, *name, *value),
        [] => return None,
    };

    let arbitrary_value = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .filter(|inner| !inner.is_empty())
        .map(CompactString::from);

    Some(ParsedUtilityClass {
        raw: CompactString::from(input),
        name: CompactString::from(name),
        value: CompactString::from(value),
        modifiers: modifiers.iter().map(|m| CompactString::from(*m)).collect(),
        is_arbitrary: arbitrary_value.is_some(),
        arbitrary_value,
    })
}

/// Split on the separator outside of brackets.
fn split_segments(body: &str) -> Option<SmallVec<[&str; 4]>> {
    let mut segments = SmallVec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, byte) in body.bytes().enumerate() {
        match byte {
            b'[' => depth += 1,
            b']' => depth = depth.checked_sub(1)?,
            b if b == SEGMENT_SEPARATOR as u8 && depth == 0 => {
                segments.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return None;
    }
    segments.push(&body[start..]);
    Some(segments)
}
