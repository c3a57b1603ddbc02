use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_CURRENCY_SYMBOL: &str = "TRIPDASH_CURRENCY_SYMBOL";
pub const ENV_TOP_N: &str = "TRIPDASH_TOP_N";
pub const ENV_CACHE_CAPACITY: &str = "TRIPDASH_CACHE_CAPACITY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{key} has invalid value '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} must be at least 1")]
    NotPositive { key: &'static str },
}

/// Dashboard settings. Layered as defaults, then an optional TOML file, then
/// `TRIPDASH_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub currency_symbol: String,
    /// Row limit for the ranked views.
    pub top_n: usize,
    /// Number of distinct uploads a session keeps parsed.
    pub cache_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            top_n: 10,
            cache_capacity: 4,
        }
    }
}

impl DashboardConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()
    }

    /// Applies overrides from `lookup`, which is `std::env::var` outside tests.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(symbol) = lookup(ENV_CURRENCY_SYMBOL) {
            self.currency_symbol = symbol;
        }
        if let Some(raw) = lookup(ENV_TOP_N) {
            self.top_n = parse_count(ENV_TOP_N, &raw)?;
        }
        if let Some(raw) = lookup(ENV_CACHE_CAPACITY) {
            self.cache_capacity = parse_count(ENV_CACHE_CAPACITY, &raw)?;
        }
        self.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::NotPositive { key: "top_n" });
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::NotPositive {
                key: "cache_capacity",
            });
        }
        Ok(self)
    }
}

fn parse_count(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        })
}
