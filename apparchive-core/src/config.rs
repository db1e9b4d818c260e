use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

pub const MAX_ASSET_SIZE_ENV: &str = "APPARCHIVE_MAX_ASSET_SIZE_MEGS";

const BYTES_PER_MEG: f64 = 1024.0 * 1024.0;

/// Configuration knobs for the importer. Defaults match the historical
/// 9 MiB asset ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Maximum size of a single uploaded asset, in megabytes.
    pub max_asset_size_megs: f32,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            max_asset_size_megs: 9.0,
        }
    }
}

impl ImporterConfig {
    /// Defaults overridden by `APPARCHIVE_MAX_ASSET_SIZE_MEGS` when it is set.
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(MAX_ASSET_SIZE_ENV) {
            config.max_asset_size_megs =
                raw.trim()
                    .parse::<f32>()
                    .map_err(|e| ConfigError::InvalidValue {
                        field: MAX_ASSET_SIZE_ENV.to_string(),
                        message: e.to_string(),
                    })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.max_asset_size_megs.is_finite() || self.max_asset_size_megs <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "max_asset_size_megs".to_string(),
                message: format!(
                    "expected a positive size, got {}",
                    self.max_asset_size_megs
                ),
            });
        }
        Ok(())
    }

    pub fn max_asset_size_bytes(&self) -> u64 {
        (f64::from(self.max_asset_size_megs) * BYTES_PER_MEG) as u64
    }
}
