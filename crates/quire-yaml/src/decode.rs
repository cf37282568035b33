//! YAML decoding into [`Value`].

use std::fmt;

use serde::Deserialize;
use serde_yaml::Value as Yaml;

use crate::value::{Mapping, Number, Value};

/// How a stream holding more than one YAML document is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiDocument {
    /// More than one document is an error
    #[default]
    Reject,
    /// Every document becomes one element of a sequence
    Array,
}

/// Options controlling how a YAML stream is decoded.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Multi-document policy
    pub multi_document: MultiDocument,

    /// Resolve `<<` merge keys
    pub merge_keys: bool,
}

/// Position of a fault in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Errors that can occur when decoding YAML.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("{message}")]
    Syntax {
        message: String,
        location: Option<Location>,
    },

    #[error("stream contains {0} documents, expected at most one")]
    MultipleDocuments(usize),

    #[error("{kind} used as a mapping key at {path}")]
    UnsupportedKey { path: String, kind: &'static str },

    #[error("duplicate key {key:?} at {path}")]
    DuplicateKey { path: String, key: String },
}

impl DecodeError {
    /// Where in the source the fault was found, if the parser reported it.
    pub fn location(&self) -> Option<Location> {
        match self {
            DecodeError::Syntax { location, .. } => *location,
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for DecodeError {
    fn from(err: serde_yaml::Error) -> Self {
        DecodeError::Syntax {
            location: err.location().map(|l| Location {
                line: l.line(),
                column: l.column(),
            }),
            message: err.to_string(),
        }
    }
}

/// Decode a YAML stream with default options.
pub fn decode(source: &str) -> Result<Value, DecodeError> {
    decode_with(source, &DecodeOptions::default())
}

/// Decode a YAML stream.
///
/// A stream without any document (empty, or only comments) decodes to
/// [`Value::Null`], or to an empty sequence under [`MultiDocument::Array`].
pub fn decode_with(source: &str, options: &DecodeOptions) -> Result<Value, DecodeError> {
    let mut documents = Vec::new();
    // The parser reports a single null document for a stream with no content
    let stream = has_content(source).then(|| serde_yaml::Deserializer::from_str(source));
    for document in stream.into_iter().flatten() {
        let mut yaml = Yaml::deserialize(document)?;
        if options.merge_keys {
            yaml.apply_merge()?;
        }
        documents.push(yaml);
    }

    tracing::trace!(documents = documents.len(), "decoded YAML stream");

    match options.multi_document {
        MultiDocument::Array => documents
            .into_iter()
            .enumerate()
            .map(|(i, doc)| convert(doc, &format!("$[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        MultiDocument::Reject => {
            if documents.len() > 1 {
                return Err(DecodeError::MultipleDocuments(documents.len()));
            }
            match documents.pop() {
                Some(doc) => convert(doc, "$"),
                None => Ok(Value::Null),
            }
        }
    }
}

/// Whether the stream holds anything besides blank lines and comments.
///
/// A bare `---` counts as content: it opens an explicit (null) document.
fn has_content(source: &str) -> bool {
    source
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim_start)
        .any(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Convert a serde_yaml tree, `path` naming the node for diagnostics.
fn convert(yaml: Yaml, path: &str) -> Result<Value, DecodeError> {
    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => Value::Number(number(&n)),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| convert(item, &format!("{path}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(entries) => {
            let mut map = Mapping::new();
            for (key, value) in entries {
                let key = property_key(key, path)?;
                let value = convert(value, &format!("{path}.{key}"))?;
                if !map.insert_new(key.clone(), value) {
                    return Err(DecodeError::DuplicateKey {
                        path: path.to_string(),
                        key,
                    });
                }
            }
            Value::Mapping(map)
        }
        Yaml::Tagged(tagged) => {
            tracing::trace!(tag = %tagged.tag, path, "dropping YAML tag");
            convert(tagged.value, path)?
        }
    })
}

fn number(n: &serde_yaml::Number) -> Number {
    if let Some(u) = n.as_u64() {
        Number::PosInt(u)
    } else if let Some(i) = n.as_i64() {
        Number::NegInt(i)
    } else {
        Number::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Turn a YAML key into the property name a JavaScript object would use.
fn property_key(key: Yaml, path: &str) -> Result<String, DecodeError> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Null => Ok(String::new()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(number(&n).to_property_key()),
        Yaml::Tagged(tagged) => property_key(tagged.value, path),
        Yaml::Sequence(_) => Err(DecodeError::UnsupportedKey {
            path: path.to_string(),
            kind: "sequence",
        }),
        Yaml::Mapping(_) => Err(DecodeError::UnsupportedKey {
            path: path.to_string(),
            kind: "mapping",
        }),
    }
}
