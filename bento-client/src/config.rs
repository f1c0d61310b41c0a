//! Configuration loading for the Bento client.
//!
//! Every field has a default, so a missing config file yields a client that
//! talks to a backend on `localhost:3000` and keeps its state under the
//! user's home directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "BENTO_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// Per-request timeout. `None` leaves the HTTP client's own default.
    pub request_timeout_ms: Option<u64>,
    /// JSON file holding the cache. `None` means `~/.bento/state.json`.
    pub storage_path: Option<PathBuf>,
    pub cache_namespace: String,
    pub default_ttl_ms: u64,
    pub languages_ttl_ms: u64,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            request_timeout_ms: None,
            storage_path: None,
            cache_namespace: bento_storage::DEFAULT_NAMESPACE.to_string(),
            default_ttl_ms: 3_600_000,
            languages_ttl_ms: 86_400_000,
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("Home directory not found; set storage_path in the config file")]
    HomeDirNotFound,
}

impl ClientConfig {
    /// Load from an explicit path, then `BENTO_CONFIG`, then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(config_path_from_env);
        let config = match path {
            Some(path) => Self::from_path(&path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self
            .storage_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "storage_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.cache_namespace.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cache_namespace",
                reason: "must not be empty".to_string(),
            });
        }
        if self.default_ttl_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_ttl_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.languages_ttl_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "languages_ttl_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log.level",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Where the cache file lives, resolving the default against the home
    /// directory.
    pub fn state_file(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage_path {
            Some(path) => Ok(path.clone()),
            None => default_state_file(dirs::home_dir()),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn languages_ttl(&self) -> Duration {
        Duration::from_millis(self.languages_ttl_ms)
    }

    pub fn cache_config(&self) -> bento_storage::CacheConfig {
        bento_storage::CacheConfig::new()
            .with_namespace(self.cache_namespace.clone())
            .with_default_ttl(self.default_ttl())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn default_state_file(home: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    let home = home.ok_or(ConfigError::HomeDirNotFound)?;
    Ok(home.join(".bento").join("state.json"))
}
