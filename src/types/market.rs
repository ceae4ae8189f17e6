//! Market definition supplied by the settings collaborator.

use serde::{Deserialize, Serialize};

/// A spot market: one order book trading `base_asset` against `quote_asset`.
///
/// The name is the routing key used by [`crate::engine::MatchingEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Market {
    pub name: String,
    pub base_asset: String,
    pub quote_asset: String,
}

impl Market {
    pub fn new(
        name: impl Into<String>,
        base_asset: impl Into<String>,
        quote_asset: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_asset: base_asset.into(),
            quote_asset: quote_asset.into(),
        }
    }

    /// Build a market from a `BASE-QUOTE` style name.
    ///
    /// ```
    /// use spot_match::types::Market;
    ///
    /// let market = Market::from_pair("BTC-USDT").unwrap();
    /// assert_eq!(market.base_asset, "BTC");
    /// assert_eq!(market.quote_asset, "USDT");
    /// assert!(Market::from_pair("BTCUSDT").is_none());
    /// ```
    pub fn from_pair(name: &str) -> Option<Self> {
        let (base, quote) = name.split_once(['-', '/', '_'])?;
        if base.is_empty() || quote.is_empty() {
            return None;
        }
        Some(Self::new(name, base, quote))
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}/{})", self.name, self.base_asset, self.quote_asset)
    }
}
