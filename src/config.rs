//! Configuration handling for the form engine binary

use crate::forms::FormKind;
use crate::state::{ErrorDisplay, IndexRekey, StoreOptions};
use anyhow::{anyhow, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured form
pub const FORM_ENV: &str = "FORM_ENGINE_FORM";

/// User configuration for form sessions
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Form preset to open when none is given on the command line
    pub default_form: Option<String>,
    /// Error display policy override
    pub error_display: Option<ErrorDisplay>,
    /// List re-key policy override
    pub index_rekey: Option<IndexRekey>,
}

impl EngineConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "form-engine", "form-engine")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| anyhow!("Invalid config {}: {}", path.display(), e))
    }

    /// Save configuration to file, returning where it went
    pub fn save(&self) -> Result<Option<PathBuf>> {
        let Some(path) = Self::config_path() else {
            return Ok(None);
        };
        self.save_to(&path)?;
        Ok(Some(path))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Pick the form: command line, then environment, then config, then default
    pub fn resolve_form(&self, arg: Option<&str>) -> Result<FormKind> {
        let env = std::env::var(FORM_ENV).ok();
        let chosen = arg.or(env.as_deref()).or(self.default_form.as_deref());
        match chosen {
            Some(name) => name.parse().map_err(|e: String| anyhow!(e)),
            None => Ok(FormKind::default()),
        }
    }

    /// Apply configured overrides on top of a preset's options
    pub fn apply(&self, mut options: StoreOptions) -> StoreOptions {
        if let Some(display) = self.error_display {
            options.error_display = display;
        }
        if let Some(rekey) = self.index_rekey {
            options.index_rekey = rekey;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.default_form.is_none());
        assert!(config.error_display.is_none());
        assert!(config.index_rekey.is_none());
    }

    #[test]
    fn test_serialization() {
        let config = EngineConfig {
            default_form: Some("profile".to_string()),
            error_display: Some(ErrorDisplay::Always),
            index_rekey: Some(IndexRekey::Clear),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.default_form, Some("profile".to_string()));
        assert_eq!(parsed.error_display, Some(ErrorDisplay::Always));
        assert_eq!(parsed.index_rekey, Some(IndexRekey::Clear));
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: EngineConfig = serde_json::from_str("{}").unwrap();
        assert!(parsed.default_form.is_none());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"error_display": "always", "unknown_field": "value"}"#;
        let parsed: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error_display, Some(ErrorDisplay::Always));
    }

    #[test]
    fn test_config_path_ends_in_json() {
        if let Some(path) = EngineConfig::config_path() {
            assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("config.json"));
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = EngineConfig {
            default_form: Some("basic".to_string()),
            error_display: None,
            index_rekey: Some(IndexRekey::Clear),
        };

        config.save_to(&path).unwrap();
        let loaded = EngineConfig::load_from(&path).unwrap();

        assert_eq!(loaded.default_form, Some("basic".to_string()));
        assert_eq!(loaded.error_display, None);
        assert_eq!(loaded.index_rekey, Some(IndexRekey::Clear));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = EngineConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert!(loaded.default_form.is_none());
    }

    #[test]
    fn test_load_invalid_file_names_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        let err = EngineConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_argument_wins() {
        let config = EngineConfig {
            default_form: Some("basic".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_form(Some("profile")).unwrap(), FormKind::Profile);
    }

    #[test]
    fn test_unknown_form_is_an_error() {
        let config = EngineConfig::default();
        assert!(config.resolve_form(Some("wizard")).is_err());
    }

    #[test]
    fn test_apply_overrides_only_set_fields() {
        let config = EngineConfig {
            index_rekey: Some(IndexRekey::Clear),
            ..Default::default()
        };
        let options = config.apply(StoreOptions {
            error_display: ErrorDisplay::Always,
            index_rekey: IndexRekey::Rekey,
        });
        assert_eq!(options.error_display, ErrorDisplay::Always);
        assert_eq!(options.index_rekey, IndexRekey::Clear);
    }
}
