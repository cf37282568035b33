//! YAML module loader.
//!
//! Claims identifiers ending in a configured suffix, decodes the file and
//! re-emits it as a module exporting the decoded value.

use std::fs;

use quire_yaml::{decode_with, DecodeOptions, MultiDocument};

use crate::literal::module_body;
use crate::traits::{LoadError, LoadResult, Loader, SourceMap};

/// Options for [`YamlLoader`].
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Identifier tail this loader claims (case-sensitive)
    pub suffix: String,

    /// Multi-document policy
    pub multi_document: MultiDocument,

    /// Resolve `<<` merge keys
    pub merge_keys: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            suffix: ".yaml".to_string(),
            multi_document: MultiDocument::Reject,
            merge_keys: false,
        }
    }
}

/// Loads YAML files as JavaScript modules.
#[derive(Debug, Default)]
pub struct YamlLoader {
    options: LoaderOptions,
}

impl YamlLoader {
    /// Create a loader claiming `.yaml` identifiers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Whether this loader claims `id`.
    pub fn matches(&self, id: &str) -> bool {
        id.ends_with(self.options.suffix.as_str())
    }

    fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            multi_document: self.options.multi_document,
            merge_keys: self.options.merge_keys,
        }
    }
}

impl Loader for YamlLoader {
    fn name(&self) -> &str {
        "yaml"
    }

    fn try_load(&self, id: &str) -> Result<Option<LoadResult>, LoadError> {
        if !self.matches(id) {
            tracing::trace!(id, suffix = %self.options.suffix, "not a YAML module");
            return Ok(None);
        }

        let source = fs::read_to_string(id).map_err(|e| LoadError::Io {
            id: id.to_string(),
            source: e,
        })?;

        let value = decode_with(&source, &self.decode_options()).map_err(|e| LoadError::Decode {
            id: id.to_string(),
            source: e,
        })?;

        let code = module_body(&value);
        tracing::debug!(id, kind = value.kind(), bytes = code.len(), "loaded YAML module");

        Ok(Some(LoadResult {
            code,
            map: SourceMap::empty(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn loads_navigation_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nav.yaml");
        fs::write(&path, "items:\n  - text: Home\n    link: /\n").unwrap();

        let result = YamlLoader::new()
            .try_load(path.to_str().unwrap())
            .unwrap()
            .unwrap();

        assert_eq!(
            result.code,
            r#"export default { items: [ { text: "Home", link: "/" } ] };"#
        );
        assert!(result.map.is_empty());
    }

    #[test]
    fn comments_only_file_exports_null() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("empty.yaml");
        fs::write(&path, "# placeholder\n# nothing yet\n").unwrap();

        let result = YamlLoader::new()
            .try_load(path.to_str().unwrap())
            .unwrap()
            .unwrap();

        assert_eq!(result.code, "export default null;");
    }

    #[test]
    fn declines_other_suffixes_even_with_yaml_content() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "items: [1, 2]\n").unwrap();

        let result = YamlLoader::new().try_load(path.to_str().unwrap()).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn declines_without_touching_the_filesystem() {
        let loader = YamlLoader::new();

        // None of these exist; a read attempt would surface as an Io error.
        for id in [
            "/does/not/exist/config.json",
            "/does/not/exist/nav.yml",
            "/does/not/exist/nav.YAML",
            "/does/not/exist/nav.yaml?raw",
        ] {
            assert!(loader.try_load(id).unwrap().is_none(), "{id} should be declined");
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("missing.yaml");
        let id = path.to_str().unwrap();

        let err = YamlLoader::new().try_load(id).unwrap_err();

        assert!(matches!(err, LoadError::Io { .. }));
        assert_eq!(err.id(), id);
    }

    #[test]
    fn invalid_utf8_is_an_io_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("latin1.yaml");
        fs::write(&path, b"a: \xff\xfe\n").unwrap();
        let id = path.to_str().unwrap();

        let err = YamlLoader::new().try_load(id).unwrap_err();

        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("latin1.yaml"));
    }

    #[test]
    fn malformed_file_is_a_decode_error_naming_the_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("broken.yaml");
        fs::write(&path, "title: \"never closed\n").unwrap();
        let id = path.to_str().unwrap();

        let err = YamlLoader::new().try_load(id).unwrap_err();

        assert!(matches!(err, LoadError::Decode { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn repeated_loads_are_identical() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site.yaml");
        fs::write(
            &path,
            "title: Docs\nsidebar:\n  - text: Package\n    items: [{text: Go, link: /go}]\n",
        )
        .unwrap();
        let loader = YamlLoader::new();

        let first = loader.try_load(path.to_str().unwrap()).unwrap();
        let second = loader.try_load(path.to_str().unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn custom_suffix_and_document_policy() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("pages.yml");
        fs::write(&path, "a: 1\n---\nb: 2\n").unwrap();
        let id = path.to_str().unwrap();

        let strict = YamlLoader::with_options(LoaderOptions {
            suffix: ".yml".to_string(),
            ..Default::default()
        });
        assert!(matches!(strict.try_load(id), Err(LoadError::Decode { .. })));

        let lenient = YamlLoader::with_options(LoaderOptions {
            suffix: ".yml".to_string(),
            multi_document: MultiDocument::Array,
            merge_keys: false,
        });
        let result = lenient.try_load(id).unwrap().unwrap();
        assert_eq!(result.code, "export default [ { a: 1 }, { b: 2 } ];");
    }
}
