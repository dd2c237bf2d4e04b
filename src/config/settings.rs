//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::llm::ProviderKind;

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Notebook cleaning settings
    #[serde(default)]
    pub clean: CleanSettings,

    /// LLM provider settings
    #[serde(default)]
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanSettings {
    /// Directory scanned when no root is given on the command line
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Keep walking after a notebook fails to clean
    #[serde(default)]
    pub keep_going: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (gemini, bedrock)
    #[serde(default)]
    pub provider: ProviderKind,

    /// API key (Gemini key or Bedrock bearer token)
    #[serde(default)]
    pub api_key: String,

    /// Model name (empty = provider default)
    #[serde(default)]
    pub model: String,

    /// API endpoint override (empty = provider default)
    #[serde(default)]
    pub endpoint: String,

    /// AWS region for Bedrock
    #[serde(default = "default_region")]
    pub region: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_timeout_secs() -> u64 {
    45
}

impl Default for CleanSettings {
    fn default() -> Self {
        Self {
            root: default_root(),
            keep_going: false,
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: String::new(),
            model: String::new(),
            endpoint: String::new(),
            region: default_region(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::debug!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let mut settings = Self::load_from(&config_path)?;
        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Parse a specific config file without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(region) = std::env::var("AWS_REGION") {
            if !region.trim().is_empty() {
                self.llm.region = region.trim().to_string();
            }
        }

        if !self.llm.api_key.trim().is_empty() {
            return;
        }

        let candidates: &[&str] = match self.llm.provider {
            ProviderKind::Gemini => &["NBTIDY_GEMINI_API_KEY", "GEMINI_API_KEY"],
            ProviderKind::Bedrock => &["AWS_BEARER_TOKEN_BEDROCK"],
        };

        if let Some(key) = candidates
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|key| !key.trim().is_empty())
        {
            self.llm.api_key = key;
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "nbtidy", "nbtidy")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &Path) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_scan_current_directory_with_gemini() {
        let settings = Settings::default();
        assert_eq!(settings.clean.root, PathBuf::from("."));
        assert!(!settings.clean.keep_going);
        assert_eq!(settings.llm.provider, ProviderKind::Gemini);
        assert!(settings.llm.model.is_empty());
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "[clean]\nroot = \"../../\"\n\n[llm]\nprovider = \"bedrock\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.clean.root, PathBuf::from("../../"));
        assert!(!settings.clean.keep_going);
        assert_eq!(settings.llm.provider, ProviderKind::Bedrock);
        assert_eq!(settings.llm.region, "us-east-1");
        assert_eq!(settings.llm.timeout_secs, 45);
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        Settings::write_default(&path).unwrap();
        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.clean.root, PathBuf::from("."));
        assert_eq!(settings.llm.provider, ProviderKind::Gemini);
    }

    #[test]
    fn unknown_provider_fails_to_parse() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[llm]\nprovider = \"openai\"\n").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }
}
