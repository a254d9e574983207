//! Generator configuration for crd-typegen
//!
//! Lets a project pin the version to generate, wrap the output in a package,
//! and override synthesized type names via a TOML file that sits alongside
//! the schema input.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name looked up next to the input when no config path is given
pub const CONFIG_FILE_NAME: &str = "crd-typegen.toml";

/// Configuration loaded from crd-typegen.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TypegenConfig {
    /// Schema version to generate; empty or absent means the first declared
    #[serde(default)]
    pub version: Option<String>,

    /// Package name; when set, output is wrapped in a complete source file
    #[serde(default)]
    pub package: Option<String>,

    /// Explicit type name overrides, `synthesized name = "Replacement"`
    #[serde(default)]
    pub renames: BTreeMap<String, String>,
}

impl TypegenConfig {
    /// Overlay command-line values on top of the file's values
    pub fn merged(mut self, version: Option<&str>, package: Option<&str>) -> Self {
        if let Some(v) = version {
            self.version = Some(v.to_string());
        }
        if let Some(p) = package {
            self.package = Some(p.to_string());
        }
        self
    }

    /// Version to request from the schema selector
    pub fn version_or_default(&self) -> &str {
        self.version.as_deref().unwrap_or("")
    }
}

/// Load the generator configuration from a TOML file
///
/// Returns `Ok(None)` if the file does not exist, `Err` if it exists but
/// cannot be read or parsed.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<TypegenConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    let config: TypegenConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    Ok(Some(config))
}

/// Resolve the config path
///
/// Priority:
/// 1. Explicitly provided path (via CLI), which must exist
/// 2. `crd-typegen.toml` alongside the input
/// 3. None (no config)
pub fn resolve_config_path(
    explicit_path: Option<&Path>,
    input_path: &Path,
) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = explicit_path {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }
    let detected = input_path
        .parent()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|p| p.exists());
    Ok(detected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_sections() {
        let config: TypegenConfig = toml::from_str(
            r#"
version = "v1"
package = "v1"

[renames]
Spec = "DeploymentSpec"
"#,
        )
        .unwrap();
        assert_eq!(config.version_or_default(), "v1");
        assert_eq!(config.package.as_deref(), Some("v1"));
        assert_eq!(config.renames["Spec"], "DeploymentSpec");
    }

    #[test]
    fn empty_file_is_default() {
        let config: TypegenConfig = toml::from_str("").unwrap();
        assert_eq!(config, TypegenConfig::default());
        assert_eq!(config.version_or_default(), "");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<TypegenConfig>("versoin = \"v1\"").is_err());
    }

    #[test]
    fn cli_values_win() {
        let config = TypegenConfig {
            version: Some("v1".into()),
            package: None,
            renames: BTreeMap::new(),
        }
        .merged(Some("v2"), Some("api"));
        assert_eq!(config.version_or_default(), "v2");
        assert_eq!(config.package.as_deref(), Some("api"));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join(CONFIG_FILE_NAME))
            .unwrap()
            .is_none());
    }

    #[test]
    fn config_is_detected_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("crd.yaml");
        assert!(resolve_config_path(None, &input).unwrap().is_none());
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "package = \"v1\"\n").unwrap();
        let found = resolve_config_path(None, &input).unwrap().unwrap();
        let config = load_config(&found).unwrap().unwrap();
        assert_eq!(config.package.as_deref(), Some("v1"));
        assert!(resolve_config_path(Some(&dir.path().join("nope.toml")), &input).is_err());
    }
}
