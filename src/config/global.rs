//! User configuration file (`~/.hscript/config.toml`).

use crate::core::HscriptError;
use crate::hscript::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

fn default_document_name() -> String {
    "hscript.yml".to_string()
}

fn default_script_name() -> String {
    "wscript".to_string()
}

fn default_backup_suffix() -> String {
    ".hscript-orig".to_string()
}

/// Driver settings.
///
/// # Examples
///
/// ```rust
/// use hscript_cli::config::GenConfig;
/// use std::path::Path;
///
/// let config = GenConfig::default();
/// assert_eq!(config.script_path(Path::new("pkg")), Path::new("pkg/wscript"));
/// assert_eq!(config.backup_path(Path::new("pkg/wscript")), Path::new("pkg/wscript.hscript-orig"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenConfig {
    /// File name of the hscript document inside a package directory.
    #[serde(default = "default_document_name")]
    pub document_name: String,

    /// File name of the generated script, written next to the document.
    #[serde(default = "default_script_name")]
    pub script_name: String,

    /// Output format used when `--format` is not given.
    #[serde(default)]
    pub format: OutputFormat,

    /// Appended to a hand-written script's name when it is moved aside.
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            document_name: default_document_name(),
            script_name: default_script_name(),
            format: OutputFormat::default(),
            backup_suffix: default_backup_suffix(),
        }
    }
}

impl GenConfig {
    /// Load from `path`, or from [`GenConfig::default_path`] when `None`.
    ///
    /// A file that does not exist yields the defaults.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match Self::default_path() {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!("no default config location: {e}");
                    return Ok(Self::default());
                }
            },
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load and validate the file at `path`.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(HscriptError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate()?;

        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Default location of the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("hscript")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".hscript")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Reject names that would escape the package directory.
    pub fn validate(&self) -> crate::core::Result<()> {
        for (key, value) in [
            ("document_name", &self.document_name),
            ("script_name", &self.script_name),
        ] {
            if value.is_empty() || value.contains(['/', '\\']) || value == "." || value == ".." {
                return Err(HscriptError::ConfigError {
                    message: format!("'{key}' must be a plain file name, got '{value}'"),
                });
            }
        }
        if self.document_name == self.script_name {
            return Err(HscriptError::ConfigError {
                message: format!(
                    "'document_name' and 'script_name' are both '{}'",
                    self.script_name
                ),
            });
        }
        if self.backup_suffix.is_empty() || self.backup_suffix.contains(['/', '\\']) {
            return Err(HscriptError::ConfigError {
                message: format!("invalid 'backup_suffix' '{}'", self.backup_suffix),
            });
        }
        Ok(())
    }

    /// Generated script location for the package in `package_dir`.
    #[must_use]
    pub fn script_path(&self, package_dir: &Path) -> PathBuf {
        package_dir.join(&self.script_name)
    }

    /// Backup location for a hand-written `script`.
    #[must_use]
    pub fn backup_path(&self, script: &Path) -> PathBuf {
        let mut name = script.as_os_str().to_os_string();
        name.push(&self.backup_suffix);
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = GenConfig::load_with_optional(Some(temp.path().join("none.toml")))
            .await
            .unwrap();
        assert_eq!(config, GenConfig::default());
        assert_eq!(config.document_name, "hscript.yml");
        assert_eq!(config.format, OutputFormat::Wscript);
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "format = \"hscript\"\nscript_name = \"wscript.gen\"\n").unwrap();

        let config = GenConfig::load_from(&path).await.unwrap();
        assert_eq!(config.format, OutputFormat::Hscript);
        assert_eq!(config.script_name, "wscript.gen");
        assert_eq!(config.backup_suffix, ".hscript-orig");
    }

    #[tokio::test]
    async fn test_unknown_key_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "script = \"x\"\n").unwrap();

        let err = GenConfig::load_from(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        assert!(err.chain().any(|e| e.downcast_ref::<HscriptError>().is_some()));
    }

    #[tokio::test]
    async fn test_invalid_names_are_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "script_name = \"../wscript\"\n").unwrap();
        assert!(GenConfig::load_from(&path).await.is_err());

        let config = GenConfig {
            script_name: "hscript.yml".to_string(),
            ..GenConfig::default()
        };
        assert!(matches!(config.validate(), Err(HscriptError::ConfigError { .. })));
    }

    #[test]
    fn test_paths() {
        let config = GenConfig::default();
        assert_eq!(config.script_path(Path::new("/w/pkg")), PathBuf::from("/w/pkg/wscript"));
        assert_eq!(
            config.backup_path(Path::new("/w/pkg/wscript")),
            PathBuf::from("/w/pkg/wscript.hscript-orig")
        );
    }
}
