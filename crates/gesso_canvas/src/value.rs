//! Token values.
//!
//! A [`TokenValue`] is anything that may appear on the right-hand side of a
//! declaration or in a variable: primitives, a [`Reference`] to a named
//! variable, a pre-built [`Css`] sequence, or an array of those.
//! Equality is structural all the way down, which is what deduplication of
//! utility values relies on.

use std::fmt;

use gesso_primer::CompactString;
use serde::Serialize;

/// A design token value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    Null,
    Bool(bool),
    Number(f64),
    String(CompactString),
    Reference(Reference),
    Css(Css),
    Array(Vec<TokenValue>),
}

/// Symbolic pointer to a named variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub name: CompactString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Box<TokenValue>>,
}

/// Ordered literal/interpolation sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Css {
    #[serde(rename = "$css")]
    pub value: Vec<TokenValue>,
}

impl Reference {
    #[inline]
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            fallback: None,
        }
    }

    #[inline]
    pub fn with_fallback(name: impl Into<CompactString>, fallback: impl Into<TokenValue>) -> Self {
        Self {
            name: name.into(),
            fallback: Some(Box::new(fallback.into())),
        }
    }

    /// Name of the custom property this reference points at.
    ///
    /// Dots in token paths become double dashes: `color.primary` is
    /// `--color--primary`.
    pub fn custom_property(&self) -> String {
        custom_property_name(&self.name)
    }
}

/// Convert a variable name into its custom property spelling.
pub fn custom_property_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    out.push_str("--");
    for ch in name.chars() {
        if ch == '.' {
            out.push_str("--");
        } else {
            out.push(ch);
        }
    }
    out
}

/// Reference a variable by name.
#[inline]
pub fn reference(name: impl Into<CompactString>) -> TokenValue {
    TokenValue::Reference(Reference::new(name))
}

/// Reference a variable by name, with a fallback used when it is unset.
#[inline]
pub fn reference_or(name: impl Into<CompactString>, fallback: impl Into<TokenValue>) -> TokenValue {
    TokenValue::Reference(Reference::with_fallback(name, fallback))
}

/// Build a CSS token from literal and interpolated parts.
pub fn css<I, V>(parts: I) -> TokenValue
where
    I: IntoIterator<Item = V>,
    V: Into<TokenValue>,
{
    TokenValue::Css(Css {
        value: parts.into_iter().map(Into::into).collect(),
    })
}

impl TokenValue {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Convert a JSON value into a token value.
    ///
    /// Objects carrying a `"$ref"` key become references and objects carrying
    /// a `"$css"` array become CSS tokens. Any other object is not a token
    /// value and yields `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        Some(match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n.as_f64()?),
            Value::String(s) => Self::String(CompactString::from(s.as_str())),
            Value::Array(items) => Self::Array(
                items
                    .iter()
                    .map(Self::from_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Value::Object(map) => {
                if let Some(Value::String(name)) = map.get("$ref") {
                    let fallback = match map.get("fallback") {
                        Some(fallback) => Some(Box::new(Self::from_json(fallback)?)),
                        None => None,
                    };
                    Self::Reference(Reference {
                        name: CompactString::from(name.as_str()),
                        fallback,
                    })
                } else if let Some(Value::Array(parts)) = map.get("$css") {
                    Self::Css(Css {
                        value: parts
                            .iter()
                            .map(Self::from_json)
                            .collect::<Option<Vec<_>>>()?,
                    })
                } else {
                    return None;
                }
            }
        })
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Self::String(s) => f.write_str(s),
            Self::Reference(r) => write!(f, "{}", r),
            Self::Css(c) => write!(f, "{}", c),
            Self::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fallback {
            Some(fallback) => write!(f, "var({}, {})", self.custom_property(), fallback),
            None => write!(f, "var({})", self.custom_property()),
        }
    }
}

impl fmt::Display for Css {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.value {
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        Self::String(CompactString::from(value))
    }
}

impl From<String> for TokenValue {
    fn from(value: String) -> Self {
        Self::String(CompactString::from(value))
    }
}

impl From<CompactString> for TokenValue {
    fn from(value: CompactString) -> Self {
        Self::String(value)
    }
}

impl From<f64> for TokenValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for TokenValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<u32> for TokenValue {
    fn from(value: u32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for TokenValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Reference> for TokenValue {
    fn from(value: Reference) -> Self {
        Self::Reference(value)
    }
}

impl From<Css> for TokenValue {
    fn from(value: Css) -> Self {
        Self::Css(value)
    }
}

impl<T: Into<TokenValue>> From<Vec<T>> for TokenValue {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<TokenValue>> From<Option<T>> for TokenValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_equality_is_recursive() {
        let a = reference_or("color.primary", reference_or("color.base", "#000"));
        let b = reference_or("color.primary", reference_or("color.base", "#000"));
        let c = reference_or("color.primary", reference_or("color.base", "#fff"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(reference("color.primary"), reference_or("color.primary", "red"));
    }

    #[test]
    fn test_css_equality_is_elementwise() {
        let a = css(vec![TokenValue::from("calc("), reference("spacing"), "* 2)".into()]);
        let b = css(vec![TokenValue::from("calc("), reference("spacing"), "* 2)".into()]);
        let c = css(vec![TokenValue::from("calc("), reference("spacing"), "* 3)".into()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display() {
        assert_eq!(reference("color.primary").to_string(), "var(--color--primary)");
        assert_eq!(
            reference_or("spacing", "1rem").to_string(),
            "var(--spacing, 1rem)"
        );
        assert_eq!(TokenValue::from(16).to_string(), "16");
        assert_eq!(TokenValue::from(1.5).to_string(), "1.5");
        assert_eq!(
            css(vec![TokenValue::from("calc("), reference("spacing"), " * 2)".into()]).to_string(),
            "calc(var(--spacing) * 2)"
        );
        assert_eq!(TokenValue::from(vec!["1px", "solid"]).to_string(), "1px solid");
    }

    #[test]
    fn test_from_json() {
        let value = serde_json::json!({ "$ref": "color.primary", "fallback": "red" });
        assert_eq!(
            TokenValue::from_json(&value),
            Some(reference_or("color.primary", "red"))
        );
        assert_eq!(
            TokenValue::from_json(&serde_json::json!([1, "a", null])),
            Some(TokenValue::Array(vec![
                TokenValue::Number(1.0),
                TokenValue::from("a"),
                TokenValue::Null
            ]))
        );
        assert_eq!(TokenValue::from_json(&serde_json::json!({ "color": "red" })), None);
    }

    #[test]
    fn test_serialize_reference() {
        let json = serde_json::to_value(reference("spacing.md")).unwrap();
        assert_eq!(json, serde_json::json!({ "$ref": "spacing.md" }));
        assert_eq!(TokenValue::from_json(&json), Some(reference("spacing.md")));
    }
}
