//! Configuration file (quire.toml).

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use quire_loader::{LoaderChain, LoaderOptions, YamlLoader};
use quire_yaml::{DecodeOptions, MultiDocument};
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub loader: LoaderSettings,
    #[serde(default)]
    pub check: CheckSettings,
}

#[derive(Debug, Deserialize)]
pub struct LoaderSettings {
    /// One YAML loader is registered per suffix, in this order
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,
    #[serde(default)]
    pub multi_document: MultiDocument,
    #[serde(default)]
    pub merge_keys: bool,
}

#[derive(Debug, Deserialize)]
pub struct CheckSettings {
    #[serde(default = "default_check_dir")]
    pub dir: String,
}

fn default_suffixes() -> Vec<String> {
    vec![".yaml".to_string()]
}
fn default_check_dir() -> String {
    "docs".to_string()
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            suffixes: default_suffixes(),
            multi_document: MultiDocument::default(),
            merge_keys: false,
        }
    }
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            dir: default_check_dir(),
        }
    }
}

impl ConfigFile {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Decode options shared by every configured loader.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            multi_document: self.loader.multi_document,
            merge_keys: self.loader.merge_keys,
        }
    }

    /// Build the loader chain described by `[loader]`.
    pub fn loader_chain(&self) -> Result<LoaderChain> {
        if self.loader.suffixes.is_empty() {
            bail!("[loader] suffixes must name at least one suffix");
        }

        let mut chain = LoaderChain::new();
        for suffix in &self.loader.suffixes {
            if suffix.is_empty() {
                bail!("[loader] suffixes must not contain an empty suffix");
            }
            chain.register(YamlLoader::with_options(LoaderOptions {
                suffix: suffix.clone(),
                multi_document: self.loader.multi_document,
                merge_keys: self.loader.merge_keys,
            }));
        }
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let config = ConfigFile::load(&temp.path().join("quire.toml")).unwrap();

        assert_eq!(config.loader.suffixes, vec![".yaml"]);
        assert_eq!(config.loader.multi_document, MultiDocument::Reject);
        assert!(!config.loader.merge_keys);
        assert_eq!(config.check.dir, "docs");
    }

    #[test]
    fn reads_loader_section() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("quire.toml");
        fs::write(
            &path,
            "[loader]\nsuffixes = [\".yaml\", \".yml\"]\nmulti_document = \"array\"\nmerge_keys = true\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        let chain = config.loader_chain().unwrap();

        assert_eq!(chain.len(), 2);
        assert_eq!(config.loader.multi_document, MultiDocument::Array);
        assert!(config.decode_options().merge_keys);
        assert_eq!(config.check.dir, "docs");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("quire.toml");
        fs::write(&path, "[loader\nsuffixes = 3").unwrap();

        assert!(ConfigFile::load(&path).is_err());
    }

    #[test]
    fn rejects_empty_suffix() {
        let config = ConfigFile {
            loader: LoaderSettings {
                suffixes: vec![String::new()],
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(config.loader_chain().is_err());
    }
}
