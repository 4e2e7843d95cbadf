use nostr_richtext_engine::{EngineOptions, ParseCache};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Overrides the default config location. Tilde and `$VARS` are expanded.
pub const CONFIG_PATH_ENV: &str = "NOSTR_RICHTEXT_CONFIG";

// Defaults come from the engine so a missing file behaves like no config.
pub const DEFAULT_CACHE_CAPACITY: usize = ParseCache::DEFAULT_CAPACITY.get();
pub const DEFAULT_MAX_SECRET_DEPTH: usize = EngineOptions::DEFAULT_MAX_SECRET_DEPTH;
pub const DEFAULT_MAX_CONTENT_LEN: usize = EngineOptions::DEFAULT_MAX_CONTENT_LEN;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {field} in config file at {config_path}: {reason}")]
    InvalidValue {
        config_path: PathBuf,
        field: &'static str,
        reason: String,
    },
}

/// Engine tuning read from `config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of parsed documents kept in the result cache.
    pub cache_capacity: usize,
    /// How many secret blocks deep a reveal may go before falling back to text.
    pub max_secret_depth: usize,
    /// Bytes of content scanned for tokens; the rest is kept as plain text.
    pub max_content_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_secret_depth: DEFAULT_MAX_SECRET_DEPTH,
            max_content_len: DEFAULT_MAX_CONTENT_LEN,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            log::debug!("no config file at {}", config_path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.validate(config_path)?;
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Like [`Config::load`], with defaults when no file exists.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        if let Ok(custom) = std::env::var(CONFIG_PATH_ENV) {
            let custom = PathBuf::from(custom);
            return Self::expand_path(&custom).unwrap_or(custom);
        }
        let config_dir = shellexpand::tilde("~/.config/nostr-richtext");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }

    fn validate(&self, config_path: &Path) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                config_path: config_path.to_path_buf(),
                field: "cache_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_content_len == 0 {
            return Err(ConfigError::InvalidValue {
                config_path: config_path.to_path_buf(),
                field: "max_content_len",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
