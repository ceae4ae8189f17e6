//! One side (bids or asks) of an order book.
//!
//! ## Architecture
//!
//! - **Slab**: arena owning every resting node on this side
//! - **BTreeMap**: price -> `PriceLevel`, sorted ascending
//! - **total_volume**: sum of `remaining` over every resting order
//!
//! The side is fixed at construction and decides what "best" means:
//! bids read the map from the top (highest price), asks from the bottom
//! (lowest price). Levels are created on the first order at a price and
//! dropped the moment they become empty, so no empty level ever persists.

use std::collections::BTreeMap;

use slab::Slab;

use crate::error::BookError;
use crate::orderbook::node::{NodeKey, OrderNode};
use crate::orderbook::PriceLevel;
use crate::types::{DepthLevel, Order, Side};

#[derive(Debug)]
pub struct BookSide {
    side: Side,
    nodes: Slab<OrderNode>,
    levels: BTreeMap<u64, PriceLevel>,
    total_volume: u64,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self::with_capacity(side, 0)
    }

    /// Pre-allocate `capacity` arena slots
    pub fn with_capacity(side: Side, capacity: usize) -> Self {
        Self {
            side,
            nodes: Slab::with_capacity(capacity),
            levels: BTreeMap::new(),
            total_volume: 0,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Sum of all resting `remaining` on this side
    #[inline]
    pub fn total_volume(&self) -> u64 {
        self.total_volume
    }

    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn order_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn has_level(&self, price: u64) -> bool {
        self.levels.contains_key(&price)
    }

    pub fn level(&self, price: u64) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Resting order behind a handle
    pub fn get(&self, key: NodeKey) -> Option<&Order> {
        self.nodes.get(key).map(|node| &node.order)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append an order at the back of its price level.
    ///
    /// The level is created if this is the first order at that price.
    /// Returns the arena handle of the new node.
    pub fn add_order(&mut self, order: Order) -> Result<NodeKey, BookError> {
        let price = order.price;
        let quantity = order.remaining;
        let key = self.nodes.insert(OrderNode::new(order));

        let level = self
            .levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price));
        if let Err(err) = level.push_back(key, &mut self.nodes) {
            self.nodes.remove(key);
            self.drop_level_if_empty(price);
            return Err(err);
        }

        self.total_volume += quantity;
        Ok(key)
    }

    /// Put a partially filled order back at the front of its level, ahead of
    /// later arrivals at the same price.
    ///
    /// Returns the new arena handle, which may differ from the one the order
    /// had before it was popped.
    pub fn put_to_head(&mut self, order: Order) -> Result<NodeKey, BookError> {
        let price = order.price;
        let quantity = order.remaining;
        let key = self.nodes.insert(OrderNode::new(order));

        let level = self
            .levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price));
        if let Err(err) = level.push_front(key, &mut self.nodes) {
            self.nodes.remove(key);
            self.drop_level_if_empty(price);
            return Err(err);
        }

        self.total_volume += quantity;
        Ok(key)
    }

    /// Remove a specific resting order, dropping its level if it empties.
    pub fn remove_order(&mut self, price: u64, key: NodeKey) -> Result<Order, BookError> {
        let level = self
            .levels
            .get_mut(&price)
            .ok_or(BookError::PriceLevelNotFound(price))?;
        let quantity = level.remove(key, &mut self.nodes)?;

        self.drop_level_if_empty(price);
        self.total_volume -= quantity;
        self.nodes
            .try_remove(key)
            .map(OrderNode::into_order)
            .ok_or(BookError::NodeNotFound(key))
    }

    // ========================================================================
    // Best price
    // ========================================================================

    fn best_level(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Buy => self.levels.values().next_back(),
            Side::Sell => self.levels.values().next(),
        }
    }

    /// Highest bid or lowest ask
    pub fn best_price(&self) -> Result<u64, BookError> {
        self.best_level()
            .map(|level| level.price)
            .ok_or(BookError::NoLiquidity)
    }

    /// Oldest order at the best price
    pub fn peek_best(&self) -> Result<&Order, BookError> {
        let level = self.best_level().ok_or(BookError::NoLiquidity)?;
        let key = level.peek_front()?;
        self.get(key).ok_or(BookError::NodeNotFound(key))
    }

    /// Take the oldest order at the best price out of the book.
    ///
    /// Drops the level if it is now empty.
    pub fn pop_best(&mut self) -> Result<Order, BookError> {
        // Field-level borrow: the level and the arena are used together
        let level = match self.side {
            Side::Buy => self.levels.values_mut().next_back(),
            Side::Sell => self.levels.values_mut().next(),
        }
        .ok_or(BookError::NoLiquidity)?;
        let price = level.price;
        let key = level.pop_front(&mut self.nodes)?;

        self.drop_level_if_empty(price);
        let order = self.nodes.try_remove(key).ok_or(BookError::NodeNotFound(key))?.into_order();
        self.total_volume -= order.remaining;
        Ok(order)
    }

    fn drop_level_if_empty(&mut self, price: u64) {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Price levels, best first
    pub fn levels(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.values().rev()),
            Side::Sell => Box::new(self.levels.values()),
        }
    }

    /// Aggregated top `depth` levels, best first
    pub fn depth(&self, depth: usize) -> Vec<DepthLevel> {
        self.levels()
            .take(depth)
            .map(|level| DepthLevel {
                price: level.price,
                quantity: level.volume(),
                orders: level.len(),
            })
            .collect()
    }

    /// Every resting order in priority order: best level first, FIFO within
    pub fn orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.levels()
            .flat_map(move |level| level.iter(&self.nodes).map(|(_, order)| order))
    }

    /// Handle and order for every resting order at `price`, front to back
    pub fn level_orders(&self, price: u64) -> Vec<(NodeKey, &Order)> {
        self.levels
            .get(&price)
            .map(|level| level.iter(&self.nodes).collect())
            .unwrap_or_default()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: u64, side: Side, price: u64, quantity: u64) -> Order {
        Order::new(id, 100, side, price, quantity, 0)
    }

    #[test]
    fn test_bid_best_is_highest() {
        let mut bids = BookSide::new(Side::Buy);
        bids.add_order(order(1, Side::Buy, 99, 10)).unwrap();
        bids.add_order(order(2, Side::Buy, 101, 10)).unwrap();
        bids.add_order(order(3, Side::Buy, 100, 10)).unwrap();

        assert_eq!(bids.best_price(), Ok(101));
        assert_eq!(bids.peek_best().unwrap().id, 2);
        let prices: Vec<u64> = bids.depth(10).iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![101, 100, 99]);
    }

    #[test]
    fn test_ask_best_is_lowest() {
        let mut asks = BookSide::new(Side::Sell);
        asks.add_order(order(1, Side::Sell, 101, 10)).unwrap();
        asks.add_order(order(2, Side::Sell, 99, 10)).unwrap();

        assert_eq!(asks.best_price(), Ok(99));
        let prices: Vec<u64> = asks.depth(1).iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![99]);
    }

    #[test]
    fn test_empty_side_reports_no_liquidity() {
        let mut side = BookSide::new(Side::Sell);

        assert_eq!(side.best_price(), Err(BookError::NoLiquidity));
        assert_eq!(side.peek_best().err(), Some(BookError::NoLiquidity));
        assert_eq!(side.pop_best(), Err(BookError::NoLiquidity));
    }

    #[test]
    fn test_same_price_level_volume() {
        let mut bids = BookSide::new(Side::Buy);
        bids.add_order(order(1, Side::Buy, 100, 10)).unwrap();
        bids.add_order(order(2, Side::Buy, 100, 5)).unwrap();

        let level = bids.level(100).unwrap();
        assert_eq!(level.volume(), 15);
        assert_eq!(level.len(), 2);
        assert_eq!(bids.peek_best().unwrap().id, 1);
        assert_eq!(bids.total_volume(), 15);
    }

    #[test]
    fn test_pop_best_drops_empty_level() {
        let mut asks = BookSide::new(Side::Sell);
        asks.add_order(order(1, Side::Sell, 100, 10)).unwrap();
        asks.add_order(order(2, Side::Sell, 101, 7)).unwrap();

        let popped = asks.pop_best().unwrap();
        assert_eq!(popped.id, 1);
        assert!(!asks.has_level(100));
        assert_eq!(asks.level_count(), 1);
        assert_eq!(asks.total_volume(), 7);
    }

    #[test]
    fn test_put_to_head_keeps_priority() {
        let mut asks = BookSide::new(Side::Sell);
        asks.add_order(order(1, Side::Sell, 100, 10)).unwrap();
        asks.add_order(order(2, Side::Sell, 100, 5)).unwrap();

        let mut first = asks.pop_best().unwrap();
        first.fill(4);
        asks.put_to_head(first).unwrap();

        let ids: Vec<u64> = asks.level_orders(100).iter().map(|(_, o)| o.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(asks.level(100).unwrap().volume(), 11);
        assert_eq!(asks.total_volume(), 11);
    }

    #[test]
    fn test_put_to_head_recreates_level() {
        let mut asks = BookSide::new(Side::Sell);
        asks.add_order(order(1, Side::Sell, 100, 10)).unwrap();

        let mut only = asks.pop_best().unwrap();
        assert!(!asks.has_level(100));

        only.fill(3);
        let key = asks.put_to_head(only).unwrap();
        assert!(asks.has_level(100));
        assert_eq!(asks.get(key).unwrap().remaining, 7);
    }

    #[test]
    fn test_remove_order() {
        let mut bids = BookSide::new(Side::Buy);
        let key1 = bids.add_order(order(1, Side::Buy, 100, 10)).unwrap();
        let key2 = bids.add_order(order(2, Side::Buy, 100, 5)).unwrap();

        let removed = bids.remove_order(100, key2).unwrap();
        assert_eq!(removed.id, 2);
        assert_eq!(bids.total_volume(), 10);

        bids.remove_order(100, key1).unwrap();
        assert!(!bids.has_level(100));
        assert!(bids.is_empty());
        assert_eq!(bids.total_volume(), 0);
    }

    #[test]
    fn test_remove_order_missing_level() {
        let mut bids = BookSide::new(Side::Buy);
        let key = bids.add_order(order(1, Side::Buy, 100, 10)).unwrap();

        assert_eq!(bids.remove_order(101, key), Err(BookError::PriceLevelNotFound(101)));
        assert_eq!(bids.order_count(), 1);
    }

    #[test]
    fn test_orders_in_priority_order() {
        let mut bids = BookSide::new(Side::Buy);
        bids.add_order(order(1, Side::Buy, 100, 10)).unwrap();
        bids.add_order(order(2, Side::Buy, 101, 10)).unwrap();
        bids.add_order(order(3, Side::Buy, 100, 10)).unwrap();

        let ids: Vec<u64> = bids.orders().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }
}
