//! Order id -> location index for O(1) cancel.
//!
//! Pure bookkeeping: an id is present here exactly when the order rests in
//! one of the book's price levels. The owning `OrderBook` keeps the two in
//! step; the index has no ordering semantics of its own.

use std::collections::HashMap;

use crate::error::BookError;
use crate::orderbook::node::NodeKey;
use crate::types::{Order, Side};

/// Where a resting order lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub side: Side,
    pub price: u64,
    /// Handle into the side's arena
    pub key: NodeKey,
}

#[derive(Debug, Default)]
pub struct OrderIndex {
    entries: HashMap<u64, IndexEntry>,
}

impl OrderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Register a resting order under its id
    pub fn add(&mut self, order: &Order, key: NodeKey) -> Result<(), BookError> {
        if self.entries.contains_key(&order.id) {
            return Err(BookError::DuplicateOrder(order.id));
        }
        self.entries.insert(
            order.id,
            IndexEntry {
                side: order.side(),
                price: order.price,
                key,
            },
        );
        Ok(())
    }

    /// Drop an id, returning where it was
    pub fn remove(&mut self, order_id: u64) -> Result<IndexEntry, BookError> {
        self.entries
            .remove(&order_id)
            .ok_or(BookError::OrderNotFound(order_id))
    }

    pub fn lookup(&self, order_id: u64) -> Result<IndexEntry, BookError> {
        self.entries
            .get(&order_id)
            .copied()
            .ok_or(BookError::OrderNotFound(order_id))
    }

    #[inline]
    pub fn exists(&self, order_id: u64) -> bool {
        self.entries.contains_key(&order_id)
    }

    /// Point an id at a new arena handle after its node was re-inserted
    pub fn relink(&mut self, order_id: u64, key: NodeKey) -> Result<(), BookError> {
        let entry = self
            .entries
            .get_mut(&order_id)
            .ok_or(BookError::OrderNotFound(order_id))?;
        entry.key = key;
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, IndexEntry)> + '_ {
        self.entries.iter().map(|(id, entry)| (*id, *entry))
    }
}
