use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::constants::{CONFIG_PATH_ENV, DEFAULT_BASE_URL, DEFAULT_CONFIG_PATH, DEFAULT_CURRENCY_SYMBOL, DEFAULT_TIMEOUT_SECONDS};
use crate::error::{PriceIndexError, Result};
use crate::parser::HeaderRules;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub rules: HeaderRules,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Scheme and host the bulletin path is appended to.
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub currency_symbol: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl Config {
    /// Loads `config.toml` (or `$PRICE_INDEX_CONFIG`) when present, then applies
    /// environment overrides. A missing default file is not an error.
    pub fn load() -> Result<Self> {
        let (path, explicit) = match env::var(CONFIG_PATH_ENV) {
            Ok(p) => (p, true),
            Err(_) => (DEFAULT_CONFIG_PATH.to_string(), false),
        };

        let mut config = if explicit || Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            debug!("No config file at {}, using defaults", path);
            Self::default()
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PriceIndexError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(base_url) = env::var("PRICE_INDEX_BASE_URL") {
            self.source.base_url = base_url;
        }
        if let Ok(secs) = env::var("PRICE_INDEX_TIMEOUT_SECS") {
            self.source.timeout_seconds = secs
                .parse()
                .map_err(|_| PriceIndexError::Config(format!("PRICE_INDEX_TIMEOUT_SECS is not a number: {secs}")))?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if !self.source.base_url.starts_with("http://") && !self.source.base_url.starts_with("https://") {
            return Err(PriceIndexError::Config(format!(
                "source.base_url must start with http:// or https://, got '{}'",
                self.source.base_url
            )));
        }
        if self.source.timeout_seconds == 0 {
            return Err(PriceIndexError::Config("source.timeout_seconds must be positive".into()));
        }
        Ok(())
    }
}
