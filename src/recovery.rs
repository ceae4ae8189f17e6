//! Restart recovery: rebuild resting books from previously open orders.
//!
//! Open orders fetched from durable storage are replayed through the maker
//! insert path in ascending timestamp order, ties broken by id, so each
//! level's queue comes back in its original arrival order. This runs
//! before the engine accepts new traffic.

use log::info;

use crate::engine::MatchingEngine;
use crate::error::EngineError;
use crate::types::{Order, OrderKind};

/// Replay `orders` into `market` as maker inserts.
///
/// Stops at the first error; orders replayed before it stay in the book.
/// Returns the number of orders restored.
pub fn replay_open_orders(
    engine: &MatchingEngine,
    market: &str,
    mut orders: Vec<Order>,
) -> Result<usize, EngineError> {
    let book = engine.get_order_book(market)?;
    orders.sort_by_key(|order| (order.timestamp, order.id));

    let mut restored = 0;
    for order in orders {
        book.place(OrderKind::Maker, order)?;
        restored += 1;
    }

    info!("{}: restored {} open orders", market, restored);
    Ok(restored)
}
