// Roster configuration
// YAML file (default ~/.roster/config.yaml) with environment overrides

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

pub const DEFAULT_API_ROOT: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the roster client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Root of the REST API; users live under `{api_root}/users`
    pub api_root: String,

    /// Users shown per page
    pub page_size: usize,

    /// Per-request timeout for gateway calls
    pub request_timeout_secs: u64,

    pub log: LogConfig,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 30,
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter level, overridden by RUST_LOG
    pub level: String,

    /// Log file (default: ~/.roster/roster.log)
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogConfig {
    pub fn file_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| RosterConfig::default_dir().join("roster.log"))
    }
}

impl RosterConfig {
    /// ~/.roster
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".roster")
    }

    pub fn default_path() -> PathBuf {
        Self::default_dir().join("config.yaml")
    }

    /// Load from `path`, or from the default location when it exists, then
    /// apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `ROSTER_API_ROOT` and `ROSTER_PAGE_SIZE` from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_root) = lookup("ROSTER_API_ROOT") {
            self.api_root = api_root;
        }
        if let Some(page_size) = lookup("ROSTER_PAGE_SIZE") {
            self.page_size = page_size.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("ROSTER_PAGE_SIZE is not a number: {}", page_size))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be greater than 0".into()));
        }
        let api_root = self.api_root.trim();
        if api_root.is_empty() {
            return Err(ConfigError::Invalid("api_root must not be empty".into()));
        }
        if !(api_root.starts_with("http://") || api_root.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_root must be an http(s) URL: {}",
                api_root
            )));
        }
        Ok(())
    }

    pub fn page_size(&self) -> ConfigResult<NonZeroUsize> {
        NonZeroUsize::new(self.page_size)
            .ok_or_else(|| ConfigError::Invalid("page_size must be greater than 0".into()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
