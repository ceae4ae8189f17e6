//! Arena node for price-level queues.
//!
//! `OrderNode` wraps an `Order` with doubly-linked list pointers. The
//! pointers are slab keys into the arena owned by the node's `BookSide`, so
//! a node can be spliced out of its queue in O(1) given only its key.
//!
//! Per slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are `usize` values returned by `slab.insert()`
//! - Keys may be reused after `slab.remove()`
//!
//! Because keys are reused, a key is only meaningful while the node it was
//! issued for is still resting; the `OrderIndex` is updated whenever a node
//! is re-inserted.

use crate::types::Order;

/// Stable handle of a queue node inside its side's arena
pub type NodeKey = usize;

/// Order node stored in the slab.
///
/// - `next`: the newer neighbour (towards the tail)
/// - `prev`: the older neighbour (towards the head)
#[derive(Debug, Clone)]
pub struct OrderNode {
    pub order: Order,
    pub next: Option<NodeKey>,
    pub prev: Option<NodeKey>,
}

impl OrderNode {
    /// Create an unlinked node
    ///
    /// ```
    /// use spot_match::orderbook::OrderNode;
    /// use spot_match::types::{Order, Side};
    ///
    /// let node = OrderNode::new(Order::new(1, 100, Side::Buy, 100, 10, 0));
    /// assert!(node.is_unlinked());
    /// ```
    #[inline]
    pub fn new(order: Order) -> Self {
        Self {
            order,
            next: None,
            prev: None,
        }
    }

    /// Not linked to any neighbour. A single-order level's node is also
    /// unlinked, so this alone does not prove the node is detached.
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    #[inline]
    pub fn order_id(&self) -> u64 {
        self.order.id
    }

    #[inline]
    pub fn price(&self) -> u64 {
        self.order.price
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.order.remaining
    }

    /// Take the order out of a node that has already been spliced out.
    #[inline]
    pub fn into_order(self) -> Order {
        self.order
    }
}
