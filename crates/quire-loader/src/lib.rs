//! Build-pipeline loader for structured config files.
//!
//! This crate implements the `load` hook of a build pipeline for YAML files:
//! claim identifiers by suffix, decode the file, and synthesize a module whose
//! default export is the decoded value rendered as a JavaScript literal.

pub mod chain;
pub mod evaluate;
pub mod literal;
pub mod traits;
pub mod yaml;

pub use chain::{Claimed, LoaderChain};
pub use evaluate::{evaluate_module, EvalError};
pub use literal::{module_body, to_literal, LiteralWriter};
pub use traits::{LoadError, LoadResult, Loader, SourceMap};
pub use yaml::{LoaderOptions, YamlLoader};
