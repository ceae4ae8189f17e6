//! Order types for the spot matching engine.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so the resting book can be
//! encoded deterministically when computing a state root. Enums are stored
//! as raw `u8` fields for SSZ compatibility and exposed through accessors.
//!
//! ## Fixed-Point Representation
//!
//! Prices and quantities are stored as u64 scaled by 10^8 (see
//! [`crate::types::price::SCALE`]).

use ssz_rs::prelude::*;

use crate::types::price::{MARKET_BUY_PRICE, MARKET_SELL_PRICE};

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy (bid) or Sell (ask)
///
/// Represented as u8 for SSZ compatibility:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub enum Side {
    /// Bid side - best price is the highest
    #[default]
    Buy,
    /// Ask side - best price is the lowest
    Sell,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Whether an incoming order on this side at `limit` may trade against
    /// a resting order on the opposite side at `resting`.
    ///
    /// - Buy crosses when `limit >= resting`
    /// - Sell crosses when `limit <= resting`
    #[inline]
    pub fn crosses(self, limit: u64, resting: u64) -> bool {
        match self {
            Side::Buy => limit >= resting,
            Side::Sell => limit <= resting,
        }
    }

    /// Price that never limits an order on this side
    #[inline]
    pub fn unbounded_price(self) -> u64 {
        match self {
            Side::Buy => MARKET_BUY_PRICE,
            Side::Sell => MARKET_SELL_PRICE,
        }
    }
}

// ============================================================================
// OrderKind enum
// ============================================================================

/// How an incoming order enters the book.
///
/// The three placement paths are selected once at the book's entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub enum OrderKind {
    /// Liquidity-providing insert. Never matched on entry, even if it crosses.
    #[default]
    Maker,
    /// Aggressive limit order. Matches while it crosses, remainder rests.
    TakerLimit,
    /// No price bound. All-or-nothing against the opposite side's volume.
    Market,
}

impl OrderKind {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            OrderKind::Maker => 0,
            OrderKind::TakerLimit => 1,
            OrderKind::Market => 2,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderKind::Maker),
            1 => Some(OrderKind::TakerLimit),
            2 => Some(OrderKind::Market),
            _ => None,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// An order, either incoming or resting in a book.
///
/// ## Invariants
///
/// - `0 <= remaining <= quantity`
/// - An order with `remaining == 0` is fully filled and never rests
///
/// Arrival order is not stored here: it is encoded by queue position inside
/// the price level. `timestamp` is carried for collaborators and recovery.
///
/// ## SSZ Layout
///
/// Fixed-size container of 50 bytes
/// (8 + 8 + 1 + 8 + 8 + 8 + 8 + 1).
///
/// ## Example
///
/// ```
/// use spot_match::types::{Order, OrderKind, Side};
///
/// // Sell 1 BTC at 50,000
/// let order = Order::new(
///     1,                      // id
///     100,                    // user_id
///     Side::Sell,             // side
///     5_000_000_000_000,      // price: 50000.00000000
///     100_000_000,            // quantity: 1.00000000
///     1703577600000,          // timestamp (ms)
/// );
/// assert_eq!(order.kind(), OrderKind::Maker);
/// assert_eq!(order.remaining, order.quantity);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Order identifier, unique per market while the order lives
    pub id: u64,

    /// Owning account
    pub user_id: u64,

    /// Order side as u8 (0=Buy, 1=Sell)
    pub side_raw: u8,

    /// Limit price in fixed-point. Replaced by a sentinel for market orders.
    pub price: u64,

    /// Original quantity in fixed-point
    pub quantity: u64,

    /// Unfilled quantity. Only ever decreases.
    pub remaining: u64,

    /// Client-side creation time in milliseconds
    pub timestamp: u64,

    /// Order kind as u8 (0=Maker, 1=TakerLimit, 2=Market)
    pub kind_raw: u8,
}

impl Order {
    /// Create a new order with `remaining == quantity`.
    ///
    /// The kind defaults to [`OrderKind::Maker`]; the engine overwrites it
    /// with the kind the order is placed as.
    pub fn new(
        id: u64,
        user_id: u64,
        side: Side,
        price: u64,
        quantity: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            id,
            user_id,
            side_raw: side.to_u8(),
            price,
            quantity,
            remaining: quantity,
            timestamp,
            kind_raw: OrderKind::Maker.to_u8(),
        }
    }

    /// Builder-style kind setter
    pub fn with_kind(mut self, kind: OrderKind) -> Self {
        self.set_kind(kind);
        self
    }

    /// Builder-style remaining setter, used when restoring partially
    /// filled orders from storage.
    pub fn with_remaining(mut self, remaining: u64) -> Self {
        self.remaining = remaining;
        self
    }

    /// Get the order side
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Buy)
    }

    /// Get the order kind
    pub fn kind(&self) -> OrderKind {
        OrderKind::from_u8(self.kind_raw).unwrap_or(OrderKind::Maker)
    }

    /// Set the order kind
    pub fn set_kind(&mut self, kind: OrderKind) {
        self.kind_raw = kind.to_u8();
    }

    /// Check if the order is fully filled
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Quantity executed so far
    pub fn filled_quantity(&self) -> u64 {
        self.quantity.saturating_sub(self.remaining)
    }

    /// `0 < remaining <= quantity`; anything else cannot enter a book.
    pub fn has_valid_quantity(&self) -> bool {
        self.remaining > 0 && self.remaining <= self.quantity
    }

    /// Fill a portion of this order
    ///
    /// # Returns
    ///
    /// The actual quantity filled (never more than `remaining`)
    pub fn fill(&mut self, fill_qty: u64) -> u64 {
        let actual_fill = fill_qty.min(self.remaining);
        self.remaining -= actual_fill;
        actual_fill
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
