//! Core data types for the matching engine
//!
//! All numeric values use fixed-point representation (scaled by 10^8).
//! `Order` and `Trade` implement SSZ serialization for deterministic
//! encoding.
//!
//! ## Types
//!
//! - [`Order`]: An incoming or resting order
//! - [`Side`]: Buy (bid) or Sell (ask)
//! - [`OrderKind`]: Maker insert, taker limit, or market
//! - [`Trade`]: An executed fill between two orders
//! - [`Market`]: Market definition (name, base, quote)
//! - [`BookSnapshot`]: Consistent projection of a book

mod order;
mod trade;
mod market;
pub mod price;
pub mod snapshot;

pub use order::{Order, OrderKind, Side};
pub use trade::Trade;
pub use market::Market;
pub use snapshot::{BookSnapshot, DepthLevel, Quote};
