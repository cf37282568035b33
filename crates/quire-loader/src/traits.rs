//! Trait definitions for module loaders.

use serde::Serialize;

use quire_yaml::DecodeError;

/// Position-mapping descriptor returned alongside synthesized code.
///
/// Generated modules collapse the whole file into one line, so the only
/// descriptor ever produced is the empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceMap {
    /// Encoded mapping segments (empty: no meaningful line mapping)
    pub mappings: String,
}

impl SourceMap {
    /// The empty/identity mapping.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Result of loading a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadResult {
    /// Synthesized module source
    pub code: String,

    /// Position mapping for `code`
    pub map: SourceMap,
}

/// Errors that can occur while loading a claimed module.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {id}: {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: DecodeError,
    },
}

impl LoadError {
    /// The module identifier the failed load was for.
    pub fn id(&self) -> &str {
        match self {
            LoadError::Io { id, .. } | LoadError::Decode { id, .. } => id,
        }
    }
}

/// A build-pipeline loader hook.
///
/// Hosts keep an ordered list of loaders and offer each module identifier to
/// them in turn. A loader that does not recognize an identifier returns
/// `Ok(None)` without touching the filesystem.
pub trait Loader: Send + Sync {
    /// Loader name, used in diagnostics
    fn name(&self) -> &str;

    /// Load the module named by `id`, or decline it.
    fn try_load(&self, id: &str) -> Result<Option<LoadResult>, LoadError>;
}
