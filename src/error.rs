//! Error types for the book and the routing layer.
//!
//! Every error is local to one call. None is retried inside the engine.
//! `PriceLevelNotFound` and `NodeNotFound` mean a stale handle reached the
//! book, which only happens on a programming error; the call that hits one
//! is aborted.

use thiserror::Error;

/// Errors raised by an [`crate::orderbook::OrderBook`] and its parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// The order id already rests in this book. Nothing changed.
    #[error("order {0} already exists in the book")]
    DuplicateOrder(u64),

    /// Cancel or lookup of an id that is not resting.
    #[error("order {0} not found")]
    OrderNotFound(u64),

    /// The queried side has no resting orders.
    #[error("no liquidity on this side of the book")]
    NoLiquidity,

    /// Pop or peek on an empty price level queue.
    #[error("price level queue is empty")]
    EmptyLevel,

    /// A market order exceeds the opposite side's total volume.
    /// The whole order is rejected; nothing changed.
    #[error("insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: u64, available: u64 },

    #[error("price level {0} not found")]
    PriceLevelNotFound(u64),

    #[error("queue node {0} not found")]
    NodeNotFound(usize),

    /// `remaining` is zero or exceeds the original quantity.
    #[error("order {0} has an invalid quantity")]
    InvalidQuantity(u64),

    /// The side byte does not decode to Buy or Sell.
    #[error("order {0} has an invalid side")]
    InvalidSide(u64),

    /// Resting the order would overflow its side's total volume.
    #[error("order {0} would overflow the resting volume")]
    VolumeOverflow(u64),

    #[error("failed to encode book state: {0}")]
    Encoding(String),

    /// Found by [`crate::orderbook::OrderBook::audit`]
    #[error("book invariant violated: {0}")]
    InvariantViolated(String),
}

impl BookError {
    /// Stale-handle errors that indicate book corruption rather than a bad
    /// request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            BookError::PriceLevelNotFound(_)
                | BookError::NodeNotFound(_)
                | BookError::Encoding(_)
                | BookError::InvariantViolated(_)
        )
    }
}

/// Errors raised by [`crate::engine::MatchingEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("market {0} not found")]
    MarketNotFound(String),

    #[error("market {0} already exists")]
    MarketExists(String),

    #[error(transparent)]
    Book(#[from] BookError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_classification() {
        assert!(BookError::NodeNotFound(3).is_internal());
        assert!(BookError::PriceLevelNotFound(100).is_internal());
        assert!(!BookError::OrderNotFound(1).is_internal());
        assert!(!BookError::InsufficientLiquidity { requested: 2, available: 1 }.is_internal());
    }

    #[test]
    fn test_engine_error_wraps_book_error() {
        let err: EngineError = BookError::DuplicateOrder(7).into();
        assert_eq!(err.to_string(), "order 7 already exists in the book");
    }
}
