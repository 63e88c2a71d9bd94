//! Declaration blocks.
//!
//! A declaration block is an insertion-ordered map from property to either a
//! literal token value or a nested block. Whether a nested block becomes a
//! child selector, a child at-rule or stays in place is decided by
//! [`classify`], a pure function over the key and the value shape.

use gesso_primer::{CompactString, FxIndexMap};
use serde::Serialize;

use crate::value::TokenValue;

/// Sigil that starts an at-rule key (`@media ...`).
pub const AT_RULE_SIGIL: char = '@';

/// Right-hand side of a declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeclarationValue {
    Literal(TokenValue),
    Block(DeclarationBlock),
}

/// Insertion-ordered property map.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct DeclarationBlock {
    entries: FxIndexMap<CompactString, DeclarationValue>,
}

/// What a declaration entry turns into when a block is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationKind<'a> {
    /// `@identifier rule { ... }`
    AtRule { identifier: &'a str, rule: &'a str },
    /// `&:hover { ... }`, `.child { ... }`, `:root { ... }`
    NestedSelector { query: &'a str },
    /// Stays a plain declaration.
    Literal,
}

/// Classify a declaration entry.
///
/// Only block values are ever hoisted; a token value under an at-rule or
/// selector-looking key is still a literal declaration.
pub fn classify<'a>(key: &'a str, value: &DeclarationValue) -> DeclarationKind<'a> {
    if !matches!(value, DeclarationValue::Block(_)) {
        return DeclarationKind::Literal;
    }

    if let Some(rest) = key.strip_prefix(AT_RULE_SIGIL) {
        let rest = rest.trim_start();
        let (identifier, rule) = match rest.find(|c: char| c.is_whitespace() || c == '(') {
            Some(pos) => (&rest[..pos], rest[pos..].trim()),
            None => (rest, ""),
        };
        if identifier.is_empty() {
            return DeclarationKind::Literal;
        }
        return DeclarationKind::AtRule { identifier, rule };
    }

    if key.starts_with(['.', '&', ':']) {
        return DeclarationKind::NestedSelector { query: key };
    }

    DeclarationKind::Literal
}

impl DeclarationBlock {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a declaration. Overwritten keys keep their position.
    pub fn insert(&mut self, key: impl Into<CompactString>, value: impl Into<DeclarationValue>) {
        self.entries.insert(key.into(), value.into());
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&DeclarationValue> {
        self.entries.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut DeclarationValue> {
        self.entries.get_mut(key)
    }

    /// Remove a declaration, preserving the order of the remaining ones.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<DeclarationValue> {
        self.entries.shift_remove(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeclarationValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Shallow merge: entries from `other` win per key.
    pub fn merge(&mut self, other: DeclarationBlock) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
    }

    /// Convert a JSON object into a declaration block.
    ///
    /// Nested objects that are not token values (see
    /// [`TokenValue::from_json`]) become nested blocks.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let map = value.as_object()?;
        let mut block = Self::new();
        for (key, value) in map {
            block.insert(key.as_str(), DeclarationValue::from_json(value)?);
        }
        Some(block)
    }
}

impl DeclarationValue {
    #[inline]
    pub fn as_literal(&self) -> Option<&TokenValue> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Block(_) => None,
        }
    }

    #[inline]
    pub fn as_block(&self) -> Option<&DeclarationBlock> {
        match self {
            Self::Block(block) => Some(block),
            Self::Literal(_) => None,
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        if let Some(token) = TokenValue::from_json(value) {
            return Some(Self::Literal(token));
        }
        DeclarationBlock::from_json(value).map(Self::Block)
    }
}

impl<T: Into<TokenValue>> From<T> for DeclarationValue {
    fn from(value: T) -> Self {
        Self::Literal(value.into())
    }
}

impl From<DeclarationBlock> for DeclarationValue {
    fn from(value: DeclarationBlock) -> Self {
        Self::Block(value)
    }
}

impl IntoIterator for DeclarationBlock {
    type Item = (CompactString, DeclarationValue);
    type IntoIter = gesso_primer::indexmap::map::IntoIter<CompactString, DeclarationValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<CompactString>, V: Into<DeclarationValue>> FromIterator<(K, V)> for DeclarationBlock {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut block = Self::new();
        for (key, value) in iter {
            block.insert(key, value);
        }
        block
    }
}

/// Build a [`DeclarationBlock`].
///
/// ```
/// use gesso_canvas::{declarations, reference};
///
/// let block = declarations! {
///     "color" => reference("color.primary"),
///     "&:hover" => {
///         "color" => "red",
///     },
/// };
/// assert_eq!(block.len(), 2);
/// ```
#[macro_export]
macro_rules! declarations {
    (@acc $block:ident;) => {};
    (@acc $block:ident; $key:expr => { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $block.insert($key, $crate::DeclarationValue::Block($crate::declarations!($($inner)*)));
        $crate::declarations!(@acc $block; $($($rest)*)?);
    };
    (@acc $block:ident; $key:expr => $value:expr $(, $($rest:tt)*)?) => {
        $block.insert($key, $crate::DeclarationValue::from($value));
        $crate::declarations!(@acc $block; $($($rest)*)?);
    };
    ($($body:tt)*) => {{
        #[allow(unused_mut)]
        let mut block = $crate::DeclarationBlock::new();
        $crate::declarations!(@acc block; $($body)*);
        block
    }};
}
