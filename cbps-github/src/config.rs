use std::path::{Path, PathBuf};

use crate::error::GitHubError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const TOKEN_VAR: &str = "GITHUB_TOKEN";
const API_URL_VAR: &str = "GITHUB_API_URL";

/// Settings for talking to the repository host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    pub token: Option<String>,
    pub api_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Where a setting's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Passed on the command line.
    Flag,
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Hard-coded default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each setting.
#[derive(Debug)]
pub struct ConfigSources {
    pub token: ConfigSource,
    pub api_url: ConfigSource,
    pub timeout_secs: ConfigSource,
    pub user_agent: ConfigSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    github: Option<GitHubSection>,
}

#[derive(Debug, Default, Clone, serde::Deserialize, serde::Serialize)]
struct GitHubSection {
    token: Option<String>,
    api_url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

impl GitHubConfig {
    /// Load settings from the environment and the user's config file.
    ///
    /// Priority: env vars > config file > defaults. A malformed config file
    /// is an error; a missing one is not.
    pub fn load() -> Result<Self, GitHubError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::resolve(GitHubSection::default(), |var| {
                std::env::var(var).ok()
            })),
        }
    }

    /// Load settings using an explicit config file path.
    pub fn load_from(path: &Path) -> Result<Self, GitHubError> {
        let file = read_config_file(path)?.unwrap_or_default();
        Ok(Self::resolve(file, |var| std::env::var(var).ok()))
    }

    fn resolve(file: GitHubSection, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            token: env(TOKEN_VAR)
                .filter(|t| !t.is_empty())
                .or(file.token),
            api_url: env(API_URL_VAR)
                .filter(|u| !u.is_empty())
                .or(file.api_url)
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
            user_agent: file.user_agent.unwrap_or(defaults.user_agent),
        }
    }

    /// Apply a token given on the command line.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token {
            self.token = Some(token);
        }
        self
    }
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cbpsdb").join("config.toml"))
}

/// Determine where each setting is coming from.
pub fn config_sources(token_flag: bool) -> ConfigSources {
    let file = config_path()
        .and_then(|p| read_config_file(&p).ok().flatten())
        .unwrap_or_default();
    sources_for(&file, token_flag, |var| std::env::var(var).ok())
}

fn sources_for(
    file: &GitHubSection,
    token_flag: bool,
    env: impl Fn(&str) -> Option<String>,
) -> ConfigSources {
    let set = |var: &str| env(var).is_some_and(|v| !v.is_empty());

    let token = if token_flag {
        ConfigSource::Flag
    } else if set(TOKEN_VAR) {
        ConfigSource::EnvVar(TOKEN_VAR)
    } else if file.token.is_some() {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Missing
    };

    let api_url = if set(API_URL_VAR) {
        ConfigSource::EnvVar(API_URL_VAR)
    } else if file.api_url.is_some() {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Default
    };

    let from_file = |present: bool| {
        if present {
            ConfigSource::ConfigFile
        } else {
            ConfigSource::Default
        }
    };

    ConfigSources {
        token,
        api_url,
        timeout_secs: from_file(file.timeout_secs.is_some()),
        user_agent: from_file(file.user_agent.is_some()),
    }
}

fn read_config_file(path: &Path) -> Result<Option<GitHubSection>, GitHubError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let config: ConfigFile = toml::from_str(&content).map_err(|e| {
        GitHubError::Config(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config.github)
}
