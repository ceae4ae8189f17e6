//! Trade type representing an executed match between two orders.
//!
//! Trades are append-only output of a single placement call. The book never
//! mutates a trade after returning it.

use ssz_rs::prelude::*;

use crate::types::price;
use crate::types::Side;

/// A single fill between a resting (maker) order and an incoming (taker)
/// order.
///
/// Order ids are assigned by role on the book: the buy-side order is always
/// `bid_order_id`, regardless of which one was resting. The trade always
/// executes at the maker's price.
///
/// ## Example
///
/// ```
/// use spot_match::types::{Side, Trade};
///
/// let trade = Trade::new(
///     1,                      // trade id
///     10,                     // bid order
///     20,                     // ask order
///     100,                    // bid user
///     200,                    // ask user
///     Side::Sell,             // the ask was the taker
///     5_000_000_000_000,      // price: 50000.00000000
///     50_000_000,             // quantity: 0.50000000
///     1703577600000,
/// );
/// assert_eq!(trade.maker_order_id(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Trade {
    /// Per-book trade sequence number, starting at 1
    pub id: u64,

    /// Buy-side order
    pub bid_order_id: u64,

    /// Sell-side order
    pub ask_order_id: u64,

    /// Buy-side account
    pub bid_user_id: u64,

    /// Sell-side account
    pub ask_user_id: u64,

    /// Side of the incoming order as u8 (0=Buy, 1=Sell)
    pub taker_side_raw: u8,

    /// Execution price (the resting order's price), fixed-point
    pub price: u64,

    /// Executed quantity, fixed-point
    pub quantity: u64,

    /// Execution time in milliseconds
    pub timestamp: u64,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        bid_order_id: u64,
        ask_order_id: u64,
        bid_user_id: u64,
        ask_user_id: u64,
        taker_side: Side,
        price: u64,
        quantity: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            id,
            bid_order_id,
            ask_order_id,
            bid_user_id,
            ask_user_id,
            taker_side_raw: taker_side.to_u8(),
            price,
            quantity,
            timestamp,
        }
    }

    /// Side of the incoming order that triggered this trade
    pub fn taker_side(&self) -> Side {
        Side::from_u8(self.taker_side_raw).unwrap_or(Side::Buy)
    }

    pub fn maker_order_id(&self) -> u64 {
        match self.taker_side() {
            Side::Buy => self.ask_order_id,
            Side::Sell => self.bid_order_id,
        }
    }

    pub fn taker_order_id(&self) -> u64 {
        match self.taker_side() {
            Side::Buy => self.bid_order_id,
            Side::Sell => self.ask_order_id,
        }
    }

    /// Quote amount exchanged (price * quantity), fixed-point.
    ///
    /// `None` if the product does not fit in u64.
    pub fn notional(&self) -> Option<u64> {
        price::checked_mul(self.price, self.quantity)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
