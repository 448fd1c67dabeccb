//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use vdao_types::amount::decimal;
use vdao_types::{GovernanceParams, TokenAmount, TypesError};
use vdao_utils::{LogFormat, UnknownLogFormat};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Params(#[from] TypesError),

    #[error(transparent)]
    LogFormat(#[from] UnknownLogFormat),
}

/// Configuration for one engine deployment.
///
/// Loaded from a TOML file via [`DaoConfig::from_toml_file`] or built in code.
/// Every field has a default, so an empty file is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaoConfig {
    /// Native asset credited to the treasury before the first call.
    #[serde(default, with = "decimal")]
    pub treasury_seed: TokenAmount,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Governance parameters, the `[params]` table.
    #[serde(default)]
    pub params: GovernanceParams,
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaoConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check everything that can only be checked after all overrides are applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        self.log_format()?;
        Ok(())
    }

    pub fn log_format(&self) -> Result<LogFormat, ConfigError> {
        Ok(self.log_format.parse()?)
    }
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            treasury_seed: TokenAmount::ZERO,
            log_format: default_log_format(),
            log_level: default_log_level(),
            params: GovernanceParams::default(),
        }
    }
}
