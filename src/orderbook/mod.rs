//! Order book module for the spot matching engine.
//!
//! ## Architecture
//!
//! Each market owns one [`OrderBook`], a central limit order book built from:
//!
//! - **Slab-based storage**: every resting order lives in its side's arena
//! - **Price levels**: orders grouped by price in a `BTreeMap`
//! - **Price-time priority**: FIFO ordering at each price level
//! - **Order index**: id -> (side, price, handle) for direct cancel
//!
//! ## Components
//!
//! - [`OrderNode`]: `Order` plus its prev/next links inside a level
//! - [`PriceLevel`]: FIFO queue of orders at a single price
//! - [`BookSide`]: all levels of one side, with the side's notion of "best"
//! - [`OrderIndex`]: lookup table from order id to queue handle
//! - [`OrderBook`]: bids, asks and the index, plus the matching loop
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Maker insert | O(log n) |
//! | Cancel by id | O(log n) level lookup, O(1) unlink |
//! | Best bid/ask | O(log n) |
//! | Match | O(k log n) for k fills |
//!
//! ## Example
//!
//! ```
//! use spot_match::orderbook::OrderBook;
//! use spot_match::types::{Order, OrderKind, Side};
//!
//! let mut book = OrderBook::with_capacity("BTC-USDT", 10_000);
//!
//! // Rest a buy order at $50,000
//! let order = Order::new(1, 100, Side::Buy, 5_000_000_000_000, 100_000_000, 0);
//! book.place(OrderKind::Maker, order).unwrap();
//!
//! assert_eq!(book.best_bid(), Some(5_000_000_000_000));
//! ```

pub mod node;
pub mod level;
pub mod side;
pub mod index;
pub mod book;

pub use node::{NodeKey, OrderNode};
pub use level::PriceLevel;
pub use side::BookSide;
pub use index::{IndexEntry, OrderIndex};
pub use book::{OrderBook, OrderStatus, PlaceResult};
