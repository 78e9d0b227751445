//! Configuration file management for carbomatic.
//!
//! Provides a TOML-based config file at `~/.config/carbomatic/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use carbomatic_core::llm::AnthropicConfig;
use carbomatic_core::llm::anthropic::API_KEY_ENV;
use carbomatic_core::meal_plan::DEFAULT_MAX_TOKENS;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub llm: LlmSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LlmSection {
    /// Anthropic API key. `ANTHROPIC_API_KEY` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the carbomatic config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/carbomatic` or
/// `~/.config/carbomatic`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("carbomatic");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("carbomatic")
}

/// Return the path to the carbomatic config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Load the config file from its default location.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

/// Serialize and write `config` to `path`, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since the file may hold an API key.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
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

/// Values supplied on the command line. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct CarbomaticConfig {
    pub bind: String,
    pub port: u16,
    /// `None` when no credential was found anywhere.
    pub anthropic: Option<AnthropicConfig>,
    pub max_tokens: u32,
}

impl CarbomaticConfig {
    pub const DEFAULT_BIND: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8000;

    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// A missing or unreadable config file is treated as empty.
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        Self::resolve_with(cli, load_config().ok())
    }

    /// Resolve against an explicit (possibly absent) config file.
    ///
    /// - bind: `--bind` > `CARBOMATIC_BIND` > `server.bind` > `0.0.0.0`
    /// - port: `--port` > `CARBOMATIC_PORT` > `server.port` > `8000`
    /// - API key: `ANTHROPIC_API_KEY` > `llm.api_key` > none
    /// - model: `--model` > `CARBOMATIC_MODEL` > `llm.model` > default model
    /// - base URL: `ANTHROPIC_BASE_URL` > `llm.base_url` > default URL
    /// - max tokens: `--max-tokens` > `llm.max_tokens` > 2000
    pub fn resolve_with(cli: &CliOverrides, file_config: Option<ConfigFile>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let bind = cli
            .bind
            .clone()
            .or_else(|| env_nonempty("CARBOMATIC_BIND"))
            .or(file.server.bind)
            .unwrap_or_else(|| Self::DEFAULT_BIND.to_string());

        let port = match (cli.port, env_nonempty("CARBOMATIC_PORT")) {
            (Some(port), _) => port,
            (None, Some(raw)) => raw
                .parse()
                .with_context(|| format!("CARBOMATIC_PORT is not a valid port: {raw:?}"))?,
            (None, None) => file.server.port.unwrap_or(Self::DEFAULT_PORT),
        };

        let model = cli
            .model
            .clone()
            .or_else(|| env_nonempty("CARBOMATIC_MODEL"))
            .or(file.llm.model)
            .unwrap_or_else(|| AnthropicConfig::DEFAULT_MODEL.to_string());

        let base_url = env_nonempty("ANTHROPIC_BASE_URL")
            .or(file.llm.base_url)
            .unwrap_or_else(|| AnthropicConfig::DEFAULT_BASE_URL.to_string());

        let anthropic = env_nonempty(API_KEY_ENV)
            .or(file.llm.api_key.filter(|k| !k.is_empty()))
            .map(|key| {
                AnthropicConfig::new(key)
                    .with_model(model)
                    .with_base_url(base_url)
            });

        let max_tokens = cli
            .max_tokens
            .or(file.llm.max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS);

        Ok(Self {
            bind,
            port,
            anthropic,
            max_tokens,
        })
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
