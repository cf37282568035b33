//! JavaScript literal emitter.
//!
//! Renders a [`Value`] as a single-line JavaScript expression. Output is a
//! pure function of the value: mapping keys come out in insertion order.

use std::sync::LazyLock;

use quire_yaml::{Mapping, Value};
use regex::Regex;

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("Invalid identifier regex"));

/// Render a value as a JavaScript literal expression.
pub fn to_literal(value: &Value) -> String {
    let mut writer = LiteralWriter::default();
    writer.write_value(value);
    writer.finish()
}

/// Build a module body whose default export is `value`.
pub fn module_body(value: &Value) -> String {
    format!("export default {};", to_literal(value))
}

/// Recursive literal writer.
#[derive(Debug, Default)]
pub struct LiteralWriter {
    out: String,
}

impl LiteralWriter {
    pub fn write_value(&mut self, value: &Value) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.out.push_str(&n.to_string()),
            Value::String(s) => self.write_string(s),
            Value::Sequence(items) => self.write_sequence(items),
            Value::Mapping(map) => self.write_mapping(map),
        }
    }

    fn write_sequence(&mut self, items: &[Value]) {
        if items.is_empty() {
            self.out.push_str("[]");
            return;
        }

        self.out.push_str("[ ");
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.write_value(item);
        }
        self.out.push_str(" ]");
    }

    fn write_mapping(&mut self, map: &Mapping) {
        if map.is_empty() {
            self.out.push_str("{}");
            return;
        }

        self.out.push_str("{ ");
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.write_key(key);
            self.out.push_str(": ");
            self.write_value(value);
        }
        self.out.push_str(" }");
    }

    fn write_key(&mut self, key: &str) {
        if key == "__proto__" {
            // A literal `__proto__:` entry sets the prototype instead of
            // defining a property; the computed form defines the property.
            self.out.push('[');
            self.write_string(key);
            self.out.push(']');
        } else if IDENTIFIER_RE.is_match(key) {
            self.out.push_str(key);
        } else {
            self.write_string(key);
        }
    }

    fn write_string(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                '\u{8}' => self.out.push_str("\\b"),
                '\u{c}' => self.out.push_str("\\f"),
                '\u{2028}' => self.out.push_str("\\u2028"),
                '\u{2029}' => self.out.push_str("\\u2029"),
                c if c.is_control() => {
                    self.out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    pub fn finish(self) -> String {
        self.out
    }
}
