//! Engine settings loaded from TOML.
//!
//! ```toml
//! snapshot_depth = 10
//!
//! [[markets]]
//! name = "BTC-USDT"
//! base_asset = "BTC"
//! quote_asset = "USDT"
//! ```
//!
//! Only the binary reads files; the library takes a ready `Vec<Market>`.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::types::Market;

pub const DEFAULT_SNAPSHOT_DEPTH: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config defines no markets")]
    NoMarkets,

    #[error("market {0} is defined more than once")]
    DuplicateMarket(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Levels per side in printed snapshots
    #[serde(default = "default_snapshot_depth")]
    pub snapshot_depth: usize,

    #[serde(default)]
    pub markets: Vec<Market>,
}

fn default_snapshot_depth() -> usize {
    DEFAULT_SNAPSHOT_DEPTH
}

impl EngineConfig {
    pub fn new(markets: Vec<Market>) -> Self {
        Self {
            snapshot_depth: DEFAULT_SNAPSHOT_DEPTH,
            markets,
        }
    }

    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = contents.parse()?;

        info!(
            "loaded {} markets from {}",
            config.markets.len(),
            path.display()
        );
        Ok(config)
    }

    /// Reject an empty market list and repeated market names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.markets.is_empty() {
            return Err(ConfigError::NoMarkets);
        }

        let mut seen = HashSet::new();
        for market in &self.markets {
            if !seen.insert(market.name.as_str()) {
                return Err(ConfigError::DuplicateMarket(market.name.clone()));
            }
        }
        Ok(())
    }
}

impl FromStr for EngineConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
