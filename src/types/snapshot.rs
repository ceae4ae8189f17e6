//! Read-only projections of an order book.
//!
//! A [`BookSnapshot`] is taken under the book's exclusive region, so every
//! field describes the same instant. It is the engine's only checkpoint:
//! there is no log or durable state inside the core.
//!
//! ## State Root
//!
//! The 32-byte state root is a SHA-256 hash over the SSZ encoding of every
//! resting order, bids then asks, each side best price first and FIFO within
//! a level. Two books holding the same orders in the same priority order
//! produce the same root.

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::BookError;
use crate::types::Order;

/// Aggregated view of one price level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DepthLevel {
    pub price: u64,
    /// Sum of remaining quantity at this price
    pub quantity: u64,
    /// Number of resting orders at this price
    pub orders: usize,
}

/// Best price and the size available there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub price: u64,
    pub quantity: u64,
}

impl From<DepthLevel> for Quote {
    fn from(level: DepthLevel) -> Self {
        Self {
            price: level.price,
            quantity: level.quantity,
        }
    }
}

/// Consistent view of a single market's book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSnapshot {
    pub market: String,
    pub best_bid: Option<Quote>,
    pub best_ask: Option<Quote>,
    /// Bid levels, highest price first
    pub bids: Vec<DepthLevel>,
    /// Ask levels, lowest price first
    pub asks: Vec<DepthLevel>,
    pub bid_volume: u64,
    pub ask_volume: u64,
    pub order_count: usize,
    /// Id of the most recent trade, 0 if none yet
    pub last_trade_id: u64,
    #[serde(serialize_with = "serialize_root")]
    pub state_root: [u8; 32],
}

impl BookSnapshot {
    /// `best_ask - best_bid`, if both sides exist and the book is not crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid, self.best_ask) {
            (Some(bid), Some(ask)) => ask.price.checked_sub(bid.price),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }
}

fn serialize_root<S: Serializer>(root: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(root))
}

/// Hash resting orders, in the order given, into a state root.
pub fn compute_state_root<'a, I>(orders: I) -> Result<[u8; 32], BookError>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut hasher = Sha256::new();
    for order in orders {
        let bytes = ssz_rs::serialize(order)
            .map_err(|e| BookError::Encoding(format!("{:?}", e)))?;
        hasher.update(&bytes);
    }

    let mut root = [0u8; 32];
    root.copy_from_slice(&hasher.finalize());
    Ok(root)
}

// ============================================================================
// Unit Tests
// ============================================================================
