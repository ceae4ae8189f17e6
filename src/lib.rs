//! # Spot Match
//!
//! Continuous double-auction matching engine for spot crypto markets.
//!
//! ## Architecture
//!
//! - **Types**: core data structures (Order, Trade, Market, BookSnapshot)
//! - **OrderBook**: per-market CLOB with slab-based node storage
//! - **Engine**: per-market locking and routing by market name
//!
//! Settlement, persistence and transport are the caller's job. The engine
//! returns trades and order state and performs no I/O of its own.
//!
//! ## Design Principles
//!
//! 1. **Price-time priority**: best price first, then FIFO within a level
//! 2. **No Floating Point**: all math uses fixed-point arithmetic (10^8 scaling)
//! 3. **Pre-allocated Memory**: slab allocation for O(1) queue operations
//! 4. **Synchronous Execution**: a call completes or fails, nothing suspends
//!    while a book is locked

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Trade, Market, BookSnapshot
pub mod types;

/// Order book: CLOB with slab-based storage
pub mod orderbook;

/// Matching engine: per-market locks and routing
pub mod engine;

pub mod error;

/// TOML market configuration
pub mod config;

/// Replay of open orders after a restart
pub mod recovery;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{BookSnapshot, Market, Order, OrderKind, Side, Trade};
pub use orderbook::{OrderBook, OrderStatus, PlaceResult};
pub use engine::{MarketBook, MatchingEngine};
pub use error::{BookError, EngineError};
pub use config::{ConfigError, EngineConfig};
