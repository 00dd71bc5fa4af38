use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_VERSION: u32 = 1;
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct JjdeckConfig {
    pub version: u32,
    pub general: GeneralConfig,
    pub github: GithubConfig,
    pub tickets: TicketsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_interval_secs: u64,
    pub revset: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GithubConfig {
    pub token: String,
    pub base_branch: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TicketsConfig {
    pub provider: TicketProviderKind,
    pub jira_url: String,
    pub jira_email: String,
    pub jira_token: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketProviderKind {
    #[default]
    None,
    Jira,
    Github,
}

impl TicketProviderKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Some(Self::None),
            "jira" => Some(Self::Jira),
            "github" => Some(Self::Github),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Jira => "jira",
            Self::Github => "github",
        }
    }
}

impl fmt::Display for TicketProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for JjdeckConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            general: GeneralConfig::default(),
            github: GithubConfig::default(),
            tickets: TicketsConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 10,
            revset: String::new(),
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_branch: "main".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

pub fn resolve_config_dir() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs.home_dir().join(".config").join("jjdeck"))
}

pub fn resolve_config_path() -> Result<PathBuf, ConfigError> {
    Ok(resolve_config_dir()?.join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<JjdeckConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: JjdeckConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

pub fn load_or_default(path: &Path) -> Result<JjdeckConfig, ConfigError> {
    if !path.exists() {
        return Ok(JjdeckConfig::default());
    }
    load_config(path)
}

/// Writes to a sibling temp file and renames it over `path`.
pub fn save_config(path: &Path, config: &JjdeckConfig) -> Result<(), ConfigError> {
    validate_config(config)?;
    let raw = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let staging = path.with_extension("toml.tmp");
    fs::write(&staging, raw).map_err(|source| ConfigError::Write {
        path: staging.clone(),
        source,
    })?;
    fs::rename(&staging, path).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn validate_config(config: &JjdeckConfig) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(validation(format!("version must be {CONFIG_VERSION}")));
    }

    if config.general.refresh_interval_secs > MAX_REFRESH_INTERVAL_SECS {
        return Err(validation(format!(
            "general.refresh_interval_secs must be at most {MAX_REFRESH_INTERVAL_SECS}"
        )));
    }

    if config.github.base_branch.trim().is_empty() {
        return Err(validation("github.base_branch must be non-empty"));
    }

    if config.tickets.provider == TicketProviderKind::Jira {
        for (field, value) in [
            ("jira_url", &config.tickets.jira_url),
            ("jira_email", &config.tickets.jira_email),
            ("jira_token", &config.tickets.jira_token),
        ] {
            if value.trim().is_empty() {
                return Err(validation(format!(
                    "tickets.{field} is required when provider is jira"
                )));
            }
        }

        let url = config.tickets.jira_url.trim();
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(validation("tickets.jira_url must start with http:// or https://"));
        }
    }

    Ok(())
}

fn validation(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}
