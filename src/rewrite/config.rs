//! Rewrite configuration, usually read from a `macaroni.toml`.
//!
//! ```toml
//! importStyle = "lazy"     # or "eager" (default)
//! skipImport = false
//! runtimeBinding = "Operator"
//! runtimeModule = "macaroni"
//! ```
//!
//! `importType = "import" | "require"` is accepted as an older spelling of
//! `importStyle`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Form of the inserted runtime import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStyle {
    /// `import { Operator } from 'macaroni';`
    #[default]
    #[serde(alias = "import")]
    Eager,
    /// `const { Operator } = require('macaroni');`
    #[serde(alias = "require")]
    Lazy,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RewriteConfig {
    #[serde(alias = "importType")]
    pub import_style: ImportStyle,
    /// Never insert the import; the host provides the runtime binding
    pub skip_import: bool,
    /// Identifier generated calls are made against
    pub runtime_binding: String,
    /// Module specifier the runtime is imported from
    pub runtime_module: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        RewriteConfig {
            import_style: ImportStyle::Eager,
            skip_import: false,
            runtime_binding: "Operator".to_string(),
            runtime_module: "macaroni".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl RewriteConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_import_style(mut self, style: ImportStyle) -> Self {
        self.import_style = style;
        self
    }

    pub fn with_skip_import(mut self, skip: bool) -> Self {
        self.skip_import = skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(RewriteConfig::from_toml_str("").unwrap(), RewriteConfig::default());
    }

    #[test]
    fn test_camel_case_keys() {
        let config = RewriteConfig::from_toml_str(
            "importStyle = \"lazy\"\nskipImport = true\nruntimeBinding = \"Ops\"",
        )
        .unwrap();
        assert_eq!(config.import_style, ImportStyle::Lazy);
        assert!(config.skip_import);
        assert_eq!(config.runtime_binding, "Ops");
        assert_eq!(config.runtime_module, "macaroni");
    }

    #[test]
    fn test_import_type_alias() {
        let config = RewriteConfig::from_toml_str("importType = \"require\"").unwrap();
        assert_eq!(config.import_style, ImportStyle::Lazy);
        let config = RewriteConfig::from_toml_str("importType = \"import\"").unwrap();
        assert_eq!(config.import_style, ImportStyle::Eager);
    }

    #[test]
    fn test_rejects_unknown_keys_and_values() {
        assert!(matches!(
            RewriteConfig::from_toml_str("importStyle = \"dynamic\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(RewriteConfig::from_toml_str("skip_import = true").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = RewriteConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
