//! Configuration file management for promptforge.
//!
//! Provides a TOML-based config file at `~/.config/promptforge/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use promptforge_core::llm::{GeminiClient, LlmError, TextGenerator};
use promptforge_store::StoreConfig;

/// Env var holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Env var overriding the model name.
pub const MODEL_ENV: &str = "PROMPTFORGE_MODEL";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LlmSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Base URL of the generative-language API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    /// Snippet file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the promptforge config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/promptforge` or
/// `~/.config/promptforge`, never `~/Library/Application Support`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("promptforge");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("promptforge")
}

/// Return the path to the promptforge config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since the file may hold an API key.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(config, &config_path())
}

pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub snippets: Option<PathBuf>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct ForgeConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub store: StoreConfig,
}

impl ForgeConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `GEMINI_API_KEY` env > `llm.api_key` > none
    /// - Model: `--model` > `PROMPTFORGE_MODEL` env > `llm.model` > `GeminiClient::DEFAULT_MODEL`
    /// - Endpoint: `llm.endpoint` > `GeminiClient::DEFAULT_ENDPOINT`
    /// - Snippets: `--snippets` > `PROMPTFORGE_SNIPPETS` env > `store.path` > data dir default
    pub fn resolve(overrides: &Overrides) -> Self {
        Self::resolve_with(overrides, load_config().ok())
    }

    fn resolve_with(overrides: &Overrides, file_config: Option<ConfigFile>) -> Self {
        let file_config = file_config.unwrap_or_default();

        let api_key = non_empty_env(API_KEY_ENV).or(file_config.llm.api_key);

        let model = overrides
            .model
            .clone()
            .or_else(|| non_empty_env(MODEL_ENV))
            .or(file_config.llm.model)
            .unwrap_or_else(|| GeminiClient::DEFAULT_MODEL.to_string());

        let endpoint = file_config
            .llm
            .endpoint
            .unwrap_or_else(|| GeminiClient::DEFAULT_ENDPOINT.to_string());

        let store = if let Some(path) = &overrides.snippets {
            StoreConfig::new(path)
        } else if let Some(path) = non_empty_env(StoreConfig::ENV_VAR) {
            StoreConfig::new(path)
        } else if let Some(path) = file_config.store.path {
            StoreConfig::new(path)
        } else {
            StoreConfig::new(StoreConfig::default_path())
        };

        Self {
            api_key,
            model,
            endpoint,
            store,
        }
    }

    /// Build the text generator used by `/forge`.
    pub fn generator(&self) -> Result<Arc<dyn TextGenerator>, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let client = GeminiClient::new(api_key, &self.model, &self.endpoint)?;
        Ok(Arc::new(client))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
