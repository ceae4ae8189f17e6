//! Exclusive-access wrapper around one market's order book.

use parking_lot::{Mutex, MutexGuard};

use crate::error::BookError;
use crate::orderbook::{OrderBook, PlaceResult};
use crate::types::{BookSnapshot, Market, Order, OrderKind};

/// One market and its book behind a single lock.
///
/// Every call takes the lock for its whole duration, so a placement's
/// matching loop never interleaves with another placement, cancel or
/// snapshot on the same market.
#[derive(Debug)]
pub struct MarketBook {
    market: Market,
    book: Mutex<OrderBook>,
}

impl MarketBook {
    pub fn new(market: Market) -> Self {
        let book = OrderBook::new(market.name.clone());
        Self {
            market,
            book: Mutex::new(book),
        }
    }

    #[inline]
    pub fn market(&self) -> &Market {
        &self.market
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.market.name
    }

    pub fn place(&self, kind: OrderKind, order: Order) -> Result<PlaceResult, BookError> {
        self.book.lock().place(kind, order)
    }

    pub fn cancel(&self, order_id: u64) -> Result<Order, BookError> {
        self.book.lock().cancel(order_id)
    }

    pub fn snapshot(&self, depth: usize) -> Result<BookSnapshot, BookError> {
        self.book.lock().snapshot(depth)
    }

    /// Hold the book for several consistent reads.
    ///
    /// Other callers on this market block until the guard is dropped.
    pub fn lock(&self) -> MutexGuard<'_, OrderBook> {
        self.book.lock()
    }
}
