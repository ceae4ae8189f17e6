//! Matching engine module: per-market locking and routing.
//!
//! ## Design Principles
//!
//! 1. **One lock per market**: each [`MarketBook`] guards its `OrderBook`
//!    with its own mutex; different markets match fully in parallel
//! 2. **Read-mostly routing**: the market map sits behind an `RwLock` that
//!    is written only when a market is added
//! 3. **No I/O under a lock**: persistence and notification happen in the
//!    caller after the engine returns
//!
//! ## Matching Rules
//!
//! - **Buy orders** match against asks (lowest price first)
//! - **Sell orders** match against bids (highest price first)
//! - **Trades** execute at the resting order's price
//! - **Unfilled limit quantity** rests on the book; market orders never rest
//!
//! ## Example
//!
//! ```
//! use spot_match::engine::MatchingEngine;
//! use spot_match::types::{Market, Order, OrderKind, Side};
//!
//! let engine = MatchingEngine::new(vec![Market::new("BTC-USDT", "BTC", "USDT")]).unwrap();
//!
//! // Add resting sell order
//! let sell = Order::new(1, 100, Side::Sell, 5_000_000_000_000, 100_000_000, 0);
//! engine.place_order("BTC-USDT", OrderKind::Maker, sell).unwrap();
//!
//! // Incoming buy order should match
//! let buy = Order::new(2, 101, Side::Buy, 5_000_000_000_000, 100_000_000, 0);
//! let result = engine.place_order("BTC-USDT", OrderKind::TakerLimit, buy).unwrap();
//!
//! assert!(result.is_filled());
//! assert_eq!(result.trades.len(), 1);
//! ```

pub mod market_book;
pub mod matching;

pub use market_book::MarketBook;
pub use matching::MatchingEngine;
