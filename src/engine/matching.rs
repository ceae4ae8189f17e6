//! Market routing.

use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use parking_lot::RwLock;

use crate::engine::MarketBook;
use crate::error::EngineError;
use crate::orderbook::PlaceResult;
use crate::types::{BookSnapshot, Market, Order, OrderKind};

/// Routes requests to the book of the named market.
///
/// Holds no matching state. The market map is read on every call and
/// written only when a market is added.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    markets: RwLock<HashMap<String, Arc<MarketBook>>>,
}

impl MatchingEngine {
    /// Build an engine with one empty book per market.
    ///
    /// A repeated market name is an error.
    pub fn new(markets: impl IntoIterator<Item = Market>) -> Result<Self, EngineError> {
        let engine = Self::default();
        for market in markets {
            engine.add_market(market)?;
        }
        Ok(engine)
    }

    pub fn add_market(&self, market: Market) -> Result<Arc<MarketBook>, EngineError> {
        let mut markets = self.markets.write();
        if markets.contains_key(&market.name) {
            return Err(EngineError::MarketExists(market.name));
        }

        info!("registered market {}", market);
        let book = Arc::new(MarketBook::new(market));
        markets.insert(book.name().to_string(), Arc::clone(&book));
        Ok(book)
    }

    /// Shared handle to a market's book.
    ///
    /// The map lock is released before returning, so callers working on
    /// the book never block market lookups for other markets.
    pub fn get_order_book(&self, market: &str) -> Result<Arc<MarketBook>, EngineError> {
        self.markets
            .read()
            .get(market)
            .cloned()
            .ok_or_else(|| EngineError::MarketNotFound(market.to_string()))
    }

    pub fn place_order(
        &self,
        market: &str,
        kind: OrderKind,
        order: Order,
    ) -> Result<PlaceResult, EngineError> {
        Ok(self.get_order_book(market)?.place(kind, order)?)
    }

    pub fn cancel_order(&self, market: &str, order_id: u64) -> Result<Order, EngineError> {
        Ok(self.get_order_book(market)?.cancel(order_id)?)
    }

    pub fn snapshot(&self, market: &str, depth: usize) -> Result<BookSnapshot, EngineError> {
        Ok(self.get_order_book(market)?.snapshot(depth)?)
    }

    /// Registered market names, sorted
    pub fn markets(&self) -> Vec<String> {
        let mut names: Vec<String> = self.markets.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn market_count(&self) -> usize {
        self.markets.read().len()
    }
}
