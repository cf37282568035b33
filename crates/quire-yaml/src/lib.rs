//! YAML decoding for structured config modules.
//!
//! This crate parses YAML (a superset of JSON with comments, anchors and
//! multi-document streams) into a [`Value`] tree shaped the way a JavaScript
//! module would see it: string keys, insertion order, doubles for numbers.

pub mod decode;
pub mod value;

pub use decode::{decode, decode_with, DecodeError, DecodeOptions, Location, MultiDocument};
pub use value::{Mapping, Number, Value};
