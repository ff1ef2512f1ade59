//! Per-node property storage.
//!
//! Values live under `{kind}_{attr}` keys (plus `linked_{input}` flags) so the
//! bag serializes with the node exactly as the host persists it. Reads never
//! fail: a missing or unusable value resolves to the caller's default.

use crate::color;
use crate::node_types::DecoratorKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Primitive property value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Default for PropValue {
    fn default() -> Self {
        PropValue::Text(String::new())
    }
}

impl PropValue {
    /// Numeric coercion: booleans become 0/1, numeric text is parsed.
    /// Returns `None` when the value has no finite numeric reading.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            PropValue::Number(n) => *n,
            PropValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            PropValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse().ok()?
                }
            }
        };
        n.is_finite().then_some(n)
    }

    pub fn truthy(&self) -> bool {
        match self {
            PropValue::Bool(b) => *b,
            PropValue::Number(n) => *n != 0.0 && !n.is_nan(),
            PropValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(b) => write!(f, "{}", b),
            PropValue::Number(n) => write!(f, "{}", n),
            PropValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Number(v)
    }
}

impl From<f32> for PropValue {
    fn from(v: f32) -> Self {
        PropValue::Number(v as f64)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Text(v.to_string())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Text(v)
    }
}

/// Styling attribute inside a decorator namespace.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Attr {
    Text,
    FontSize,
    Bold,
    Color,
    BgColor,
    Height,
}

impl Attr {
    pub fn as_str(self) -> &'static str {
        match self {
            Attr::Text => "text",
            Attr::FontSize => "font_size",
            Attr::Bold => "bold",
            Attr::Color => "color",
            Attr::BgColor => "bg_color",
            Attr::Height => "height",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropKey {
    Style(DecoratorKind, Attr),
    Linked(String),
}

impl PropKey {
    pub fn style(kind: DecoratorKind, attr: Attr) -> Self {
        PropKey::Style(kind, attr)
    }

    pub fn linked(input: &str) -> Self {
        PropKey::Linked(input.to_string())
    }

    pub fn storage_key(&self) -> String {
        match self {
            PropKey::Style(kind, attr) => format!("{}_{}", kind.prefix(), attr.as_str()),
            PropKey::Linked(input) => format!("linked_{}", input),
        }
    }
}

/// Key/value map attached to a single node.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PropertyBag {
    map: BTreeMap<String, PropValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PropKey) -> Option<&PropValue> {
        self.map.get(&key.storage_key())
    }

    pub fn set(&mut self, key: &PropKey, value: impl Into<PropValue>) {
        self.map.insert(key.storage_key(), value.into());
    }

    pub fn contains(&self, key: &PropKey) -> bool {
        self.map.contains_key(&key.storage_key())
    }

    pub fn remove(&mut self, key: &PropKey) -> Option<PropValue> {
        self.map.remove(&key.storage_key())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn number(&self, key: &PropKey, default: f64) -> f64 {
        self.get(key)
            .and_then(PropValue::as_number)
            .unwrap_or(default)
    }

    pub fn flag(&self, key: &PropKey, default: bool) -> bool {
        self.get(key).map(PropValue::truthy).unwrap_or(default)
    }

    pub fn text(&self, key: &PropKey, default: &str) -> String {
        self.get(key)
            .map(PropValue::as_text)
            .unwrap_or_else(|| default.to_string())
    }

    /// Stored color normalized to `#rrggbb`; malformed values yield `default`.
    pub fn hex(&self, key: &PropKey, default: &str) -> String {
        match self.get(key) {
            Some(value) => color::normalize_hex(&value.as_text(), default),
            None => default.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(kind: DecoratorKind, attr: Attr) -> PropKey {
        PropKey::style(kind, attr)
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(
            key(DecoratorKind::Title, Attr::FontSize).storage_key(),
            "title_font_size"
        );
        assert_eq!(
            key(DecoratorKind::Note, Attr::BgColor).storage_key(),
            "note_bg_color"
        );
        assert_eq!(PropKey::linked("divider_in").storage_key(), "linked_divider_in");
    }

    #[test]
    fn test_missing_keys_resolve_to_defaults() {
        let bag = PropertyBag::new();
        let k = key(DecoratorKind::Spacer, Attr::Height);
        assert_eq!(bag.number(&k, 20.0), 20.0);
        assert!(!bag.flag(&k, false));
        assert_eq!(bag.text(&k, "x"), "x");
        assert_eq!(bag.hex(&k, "#666666"), "#666666");
        assert!(bag.is_empty());
    }

    #[test]
    fn test_number_coercion() {
        let mut bag = PropertyBag::new();
        let k = key(DecoratorKind::Title, Attr::FontSize);
        bag.set(&k, "18");
        assert_eq!(bag.number(&k, 14.0), 18.0);
        bag.set(&k, true);
        assert_eq!(bag.number(&k, 14.0), 1.0);
        bag.set(&k, "large");
        assert_eq!(bag.number(&k, 14.0), 14.0);
        bag.set(&k, f64::NAN);
        assert_eq!(bag.number(&k, 14.0), 14.0);
    }

    #[test]
    fn test_hex_normalizes_or_falls_back() {
        let mut bag = PropertyBag::new();
        let k = key(DecoratorKind::Divider, Attr::Color);
        bag.set(&k, "F0A");
        assert_eq!(bag.hex(&k, "#666666"), "#ff00aa");
        bag.set(&k, "purple");
        assert_eq!(bag.hex(&k, "#666666"), "#666666");
    }

    #[test]
    fn test_serialized_shape() {
        let mut bag = PropertyBag::new();
        bag.set(&key(DecoratorKind::Title, Attr::Bold), true);
        bag.set(&key(DecoratorKind::Title, Attr::FontSize), 16.0);
        bag.set(&key(DecoratorKind::Title, Attr::Color), "#ff0000");
        let json = serde_json::to_value(&bag).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title_bold": true,
                "title_color": "#ff0000",
                "title_font_size": 16.0,
            })
        );
        let back: PropertyBag = serde_json::from_value(json).unwrap();
        assert_eq!(back, bag);
    }
}
