//! FIFO queue of orders resting at one exact price.
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Matching consumes orders from the head
//! - A partially filled order goes back in at the head
//! - Any order can be removed in O(1) using its slab key
//!
//! The node data lives in the side's slab; `PriceLevel` only holds the queue
//! metadata. The running `volume` is adjusted by the node's `remaining`
//! at push/pop time, so a resting order's quantity must never change while
//! it is linked: callers pop or remove it, change it, and push it back.

use slab::Slab;

use crate::error::BookError;
use crate::orderbook::node::{NodeKey, OrderNode};
use crate::types::Order;

/// A price level containing orders at a single price.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (fixed-point)
    pub price: u64,

    /// Sum of `remaining` over all linked orders
    volume: u64,

    /// Oldest order, matched first
    head: Option<NodeKey>,

    /// Newest order
    tail: Option<NodeKey>,

    len: usize,
}

impl PriceLevel {
    pub fn new(price: u64) -> Self {
        Self {
            price,
            volume: 0,
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of orders in the queue
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Total remaining quantity resting at this price
    #[inline]
    pub fn volume(&self) -> u64 {
        self.volume
    }

    #[inline]
    pub fn tail(&self) -> Option<NodeKey> {
        self.tail
    }

    /// Key of the oldest order
    pub fn peek_front(&self) -> Result<NodeKey, BookError> {
        self.head.ok_or(BookError::EmptyLevel)
    }

    /// Append at the tail (newest arrival)
    pub fn push_back(&mut self, key: NodeKey, slab: &mut Slab<OrderNode>) -> Result<(), BookError> {
        let node = slab.get_mut(key).ok_or(BookError::NodeNotFound(key))?;
        let quantity = node.remaining();
        node.prev = self.tail;
        node.next = None;

        match self.tail {
            Some(tail_key) => {
                slab.get_mut(tail_key).ok_or(BookError::NodeNotFound(tail_key))?.next = Some(key);
            }
            None => self.head = Some(key),
        }

        self.tail = Some(key);
        self.len += 1;
        self.volume += quantity;
        Ok(())
    }

    /// Insert at the head, ahead of every other order at this price
    pub fn push_front(&mut self, key: NodeKey, slab: &mut Slab<OrderNode>) -> Result<(), BookError> {
        let node = slab.get_mut(key).ok_or(BookError::NodeNotFound(key))?;
        let quantity = node.remaining();
        node.prev = None;
        node.next = self.head;

        match self.head {
            Some(head_key) => {
                slab.get_mut(head_key).ok_or(BookError::NodeNotFound(head_key))?.prev = Some(key);
            }
            None => self.tail = Some(key),
        }

        self.head = Some(key);
        self.len += 1;
        self.volume += quantity;
        Ok(())
    }

    /// Unlink the oldest order and return its key.
    ///
    /// The node stays in the slab; the caller decides whether to free it.
    pub fn pop_front(&mut self, slab: &mut Slab<OrderNode>) -> Result<NodeKey, BookError> {
        let key = self.head.ok_or(BookError::EmptyLevel)?;
        let node = slab.get_mut(key).ok_or(BookError::NodeNotFound(key))?;
        let quantity = node.remaining();
        let next_key = node.next.take();
        node.prev = None;

        match next_key {
            Some(next) => {
                slab.get_mut(next).ok_or(BookError::NodeNotFound(next))?.prev = None;
            }
            None => self.tail = None,
        }

        self.head = next_key;
        self.len -= 1;
        self.volume -= quantity;
        Ok(key)
    }

    /// Unlink an arbitrary order by key.
    ///
    /// Removing the head goes through [`PriceLevel::pop_front`]; anything
    /// else splices its neighbours together. Returns the removed order's
    /// remaining quantity.
    pub fn remove(&mut self, key: NodeKey, slab: &mut Slab<OrderNode>) -> Result<u64, BookError> {
        let node = slab.get(key).ok_or(BookError::NodeNotFound(key))?;
        if node.price() != self.price {
            return Err(BookError::NodeNotFound(key));
        }
        let quantity = node.remaining();
        let (prev_key, next_key) = (node.prev, node.next);

        if self.head == Some(key) {
            self.pop_front(slab)?;
            return Ok(quantity);
        }

        // Not the head, so a linked member must have an older neighbour
        let prev_key = prev_key.ok_or(BookError::NodeNotFound(key))?;

        slab.get_mut(prev_key).ok_or(BookError::NodeNotFound(prev_key))?.next = next_key;
        match next_key {
            Some(next) => {
                slab.get_mut(next).ok_or(BookError::NodeNotFound(next))?.prev = Some(prev_key);
            }
            None => self.tail = Some(prev_key),
        }

        if let Some(node) = slab.get_mut(key) {
            node.prev = None;
            node.next = None;
        }

        self.len -= 1;
        self.volume -= quantity;
        Ok(quantity)
    }

    /// Walk the queue from head to tail
    pub fn iter<'a>(&self, slab: &'a Slab<OrderNode>) -> LevelIter<'a> {
        LevelIter {
            slab,
            cursor: self.head,
        }
    }
}

/// Head-to-tail iterator over a level's orders
pub struct LevelIter<'a> {
    slab: &'a Slab<OrderNode>,
    cursor: Option<NodeKey>,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = (NodeKey, &'a Order);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let node = self.slab.get(key)?;
        self.cursor = node.next;
        Some((key, &node.order))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    const PRICE: u64 = 5_000_000_000_000;

    fn create_test_node(slab: &mut Slab<OrderNode>, id: u64, quantity: u64) -> NodeKey {
        let order = Order::new(id, 100, Side::Buy, PRICE, quantity, 0);
        slab.insert(OrderNode::new(order))
    }

    fn ids(level: &PriceLevel, slab: &Slab<OrderNode>) -> Vec<u64> {
        level.iter(slab).map(|(_, order)| order.id).collect()
    }

    #[test]
    fn test_price_level_new() {
        let level = PriceLevel::new(PRICE);

        assert!(level.is_empty());
        assert_eq!(level.volume(), 0);
        assert_eq!(level.peek_front(), Err(BookError::EmptyLevel));
    }

    #[test]
    fn test_push_back_preserves_arrival_order() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE);

        let key1 = create_test_node(&mut slab, 1, 10);
        let key2 = create_test_node(&mut slab, 2, 5);
        level.push_back(key1, &mut slab).unwrap();
        level.push_back(key2, &mut slab).unwrap();

        assert_eq!(level.len(), 2);
        assert_eq!(level.volume(), 15);
        assert_eq!(level.peek_front(), Ok(key1));
        assert_eq!(level.tail(), Some(key2));
        assert_eq!(ids(&level, &slab), vec![1, 2]);
    }

    #[test]
    fn test_push_front_jumps_queue() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE);

        let key1 = create_test_node(&mut slab, 1, 10);
        let key2 = create_test_node(&mut slab, 2, 5);
        level.push_back(key1, &mut slab).unwrap();
        level.push_front(key2, &mut slab).unwrap();

        assert_eq!(ids(&level, &slab), vec![2, 1]);
        assert_eq!(level.tail(), Some(key1));
        assert_eq!(slab[key1].prev, Some(key2));
        assert!(slab[key2].prev.is_none());
    }

    #[test]
    fn test_push_front_on_empty() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE);

        let key = create_test_node(&mut slab, 1, 10);
        level.push_front(key, &mut slab).unwrap();

        assert_eq!(level.peek_front(), Ok(key));
        assert_eq!(level.tail(), Some(key));
        assert_eq!(level.volume(), 10);
    }

    #[test]
    fn test_pop_front() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE);

        let key1 = create_test_node(&mut slab, 1, 10);
        let key2 = create_test_node(&mut slab, 2, 5);
        level.push_back(key1, &mut slab).unwrap();
        level.push_back(key2, &mut slab).unwrap();

        assert_eq!(level.pop_front(&mut slab), Ok(key1));
        assert!(slab[key1].is_unlinked());
        assert!(slab[key2].prev.is_none());
        assert_eq!(level.volume(), 5);

        assert_eq!(level.pop_front(&mut slab), Ok(key2));
        assert!(level.is_empty());
        assert!(level.tail().is_none());
        assert_eq!(level.pop_front(&mut slab), Err(BookError::EmptyLevel));
    }

    #[test]
    fn test_remove_middle() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE);

        let key1 = create_test_node(&mut slab, 1, 100);
        let key2 = create_test_node(&mut slab, 2, 200);
        let key3 = create_test_node(&mut slab, 3, 300);
        for key in [key1, key2, key3] {
            level.push_back(key, &mut slab).unwrap();
        }

        assert_eq!(level.remove(key2, &mut slab), Ok(200));
        assert_eq!(level.volume(), 400);
        assert_eq!(slab[key1].next, Some(key3));
        assert_eq!(slab[key3].prev, Some(key1));
        assert!(slab[key2].is_unlinked());
        assert_eq!(ids(&level, &slab), vec![1, 3]);
    }

    #[test]
    fn test_remove_head_and_tail() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE);

        let key1 = create_test_node(&mut slab, 1, 100);
        let key2 = create_test_node(&mut slab, 2, 200);
        let key3 = create_test_node(&mut slab, 3, 300);
        for key in [key1, key2, key3] {
            level.push_back(key, &mut slab).unwrap();
        }

        level.remove(key1, &mut slab).unwrap();
        assert_eq!(level.peek_front(), Ok(key2));

        level.remove(key3, &mut slab).unwrap();
        assert_eq!(level.tail(), Some(key2));
        assert_eq!(level.len(), 1);
        assert_eq!(level.volume(), 200);
    }

    #[test]
    fn test_remove_unknown_key() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE);

        assert_eq!(level.remove(99, &mut slab), Err(BookError::NodeNotFound(99)));

        // Present in the slab but never linked into this level
        let key = create_test_node(&mut slab, 1, 100);
        let other = create_test_node(&mut slab, 2, 100);
        level.push_back(other, &mut slab).unwrap();
        assert_eq!(level.remove(key, &mut slab), Err(BookError::NodeNotFound(key)));
        assert_eq!(level.volume(), 100);
    }

    #[test]
    fn test_remove_wrong_price() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE + 1);

        let key = create_test_node(&mut slab, 1, 100);
        assert_eq!(level.remove(key, &mut slab), Err(BookError::NodeNotFound(key)));
    }
}
