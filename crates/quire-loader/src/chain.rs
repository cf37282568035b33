//! Ordered loader chain.
//!
//! The host side of the loader contract: each identifier is offered to the
//! registered loaders in order and the first one to claim it wins.

use crate::traits::{LoadError, LoadResult, Loader};

/// A module claimed by a loader in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claimed {
    /// Name of the loader that produced the module
    pub loader: String,

    /// The loaded module
    pub result: LoadResult,
}

/// An ordered list of loaders.
#[derive(Default)]
pub struct LoaderChain {
    loaders: Vec<Box<dyn Loader>>,
}

impl LoaderChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a loader; earlier loaders take precedence.
    pub fn register(&mut self, loader: impl Loader + 'static) -> &mut Self {
        self.loaders.push(Box::new(loader));
        self
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Registered loader names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.loaders.iter().map(|l| l.name()).collect()
    }

    /// Offer `id` to each loader in turn.
    ///
    /// Returns `Ok(None)` when no loader claims it. An error from the
    /// claiming loader ends the search.
    pub fn load(&self, id: &str) -> Result<Option<Claimed>, LoadError> {
        for loader in &self.loaders {
            if let Some(result) = loader.try_load(id)? {
                return Ok(Some(Claimed {
                    loader: loader.name().to_string(),
                    result,
                }));
            }
        }

        tracing::trace!(id, "no loader claimed module");
        Ok(None)
    }
}

impl std::fmt::Debug for LoaderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderChain")
            .field("loaders", &self.names())
            .finish()
    }
}
