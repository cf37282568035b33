//! Decoded value model.
//!
//! A [`Value`] is the shape a decoded config file takes once it is handed to a
//! JavaScript module: scalars, ordered sequences and mappings whose keys are
//! strings. Mapping order is insertion order so rendering stays deterministic.

use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;

/// A decoded structured-config value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Value {
    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key if this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

/// A numeric scalar.
///
/// Integers keep their exact decimal form for rendering. Equality is numeric
/// equality over `f64`, which is what a JavaScript engine observes, except
/// that `NaN` equals `NaN`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::PosInt(n) => n as f64,
            Number::NegInt(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    /// The string a JavaScript object would use if this number were a
    /// property key (`String(n)`).
    pub fn to_property_key(self) -> String {
        let value = self.as_f64();
        if value == 0.0 {
            // String(-0) is "0"
            return "0".to_string();
        }
        format_f64(value)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.as_f64(), other.as_f64());
        a == b || (a.is_nan() && b.is_nan())
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::PosInt(n)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        if n < 0 {
            Number::NegInt(n)
        } else {
            Number::PosInt(n as u64)
        }
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

/// Renders the number as JavaScript source text.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::PosInt(n) => write!(f, "{n}"),
            Number::NegInt(n) => write!(f, "{n}"),
            Number::Float(x) => f.write_str(&format_f64(x)),
        }
    }
}

/// Format a double the way `Number.prototype.toString` does, keeping the
/// sign of negative zero.
fn format_f64(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let abs = value.abs();
    if abs != 0.0 && !(1e-6..1e21).contains(&abs) {
        let text = format!("{value:e}");
        // Rust writes `1e21`, JavaScript writes `1e+21`
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        }
    } else {
        format!("{value}")
    }
}

/// An insertion-ordered mapping with unique string keys.
///
/// Two mappings are equal only when they hold the same entries in the same
/// order, since order is observable in the rendered module.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: IndexMap<String, Value>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry unless the key is already present.
    ///
    /// Returns `false` (and leaves the mapping untouched) on a duplicate key.
    pub fn insert_new(&mut self, key: String, value: Value) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_floats_like_javascript() {
        assert_eq!(Number::Float(1.0).to_string(), "1");
        assert_eq!(Number::Float(0.1).to_string(), "0.1");
        assert_eq!(Number::Float(1e20).to_string(), "100000000000000000000");
        assert_eq!(Number::Float(1e21).to_string(), "1e+21");
        assert_eq!(Number::Float(1.5e-7).to_string(), "1.5e-7");
        assert_eq!(Number::Float(0.000001).to_string(), "0.000001");
        assert_eq!(Number::Float(-2.5).to_string(), "-2.5");
    }

    #[test]
    fn formats_special_floats() {
        assert_eq!(Number::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(Number::Float(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Number::Float(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Number::Float(-0.0).to_string(), "-0");
    }

    #[test]
    fn integers_keep_exact_digits() {
        assert_eq!(Number::PosInt(u64::MAX).to_string(), "18446744073709551615");
        assert_eq!(Number::NegInt(-42).to_string(), "-42");
    }

    #[test]
    fn property_keys_follow_string_conversion() {
        assert_eq!(Number::PosInt(1).to_property_key(), "1");
        assert_eq!(Number::Float(1.5).to_property_key(), "1.5");
        assert_eq!(Number::Float(-0.0).to_property_key(), "0");
        assert_eq!(Number::Float(f64::INFINITY).to_property_key(), "Infinity");
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(Number::PosInt(3), Number::Float(3.0));
        assert_eq!(Number::from(-7i64), Number::Float(-7.0));
        assert_eq!(Number::Float(f64::NAN), Number::Float(f64::NAN));
        assert_ne!(Number::PosInt(1), Number::PosInt(2));
    }

    #[test]
    fn mapping_rejects_duplicate_keys() {
        let mut map = Mapping::new();

        assert!(map.insert_new("a".to_string(), Value::Null));
        assert!(map.insert_new("b".to_string(), Value::Bool(true)));
        assert!(!map.insert_new("a".to_string(), Value::Bool(false)));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&Value::Null));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn mapping_equality_respects_order() {
        let mut ab = Mapping::new();
        ab.insert_new("a".to_string(), Value::Null);
        ab.insert_new("b".to_string(), Value::Null);

        let mut ba = Mapping::new();
        ba.insert_new("b".to_string(), Value::Null);
        ba.insert_new("a".to_string(), Value::Null);

        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn large_mappings_keep_order_and_lookups() {
        let mut map = Mapping::new();
        for i in 0..50_000 {
            assert!(map.insert_new(format!("key{i}"), Value::from(Number::from(i as u64))));
        }

        assert!(!map.insert_new("key49999".to_string(), Value::Null));
        assert_eq!(map.len(), 50_000);
        assert_eq!(map.keys().next(), Some("key0"));
        assert_eq!(
            map.get("key12345"),
            Some(&Value::Number(Number::PosInt(12345)))
        );
    }
}
