//! Per-market order book: the matching core.
//!
//! ## Architecture
//!
//! - **BookSide** x2: bids and asks, each an arena plus ordered price levels
//! - **OrderIndex**: order id -> (side, price, handle) for O(1) cancel
//!
//! `OrderBook` is plain data with `&mut self` methods. Exclusive access is
//! provided by the owner (see [`crate::engine::MarketBook`]), so a whole
//! placement call, including every step of the matching loop, runs without
//! interleaving. Side and index agree at every method boundary.
//!
//! ## Placement paths
//!
//! | Kind | Crossing check | Remainder |
//! |------|----------------|-----------|
//! | `Maker` | none, inserted as-is | rests |
//! | `TakerLimit` | while limit crosses best opposite price | rests |
//! | `Market` | unbounded, gated on opposite total volume | never |
//!
//! ## Example
//!
//! ```
//! use spot_match::orderbook::OrderBook;
//! use spot_match::types::{Order, OrderKind, Side};
//!
//! let mut book = OrderBook::new("BTC-USDT");
//!
//! book.place(OrderKind::Maker, Order::new(1, 100, Side::Sell, 5_000_000_000_000, 100_000_000, 0)).unwrap();
//!
//! let buy = Order::new(2, 101, Side::Buy, 5_000_000_000_000, 40_000_000, 0);
//! let result = book.place(OrderKind::TakerLimit, buy).unwrap();
//!
//! assert!(result.is_filled());
//! assert_eq!(result.trades[0].quantity, 40_000_000);
//! assert_eq!(book.asks().total_volume(), 60_000_000);
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, error, warn};

use crate::error::BookError;
use crate::orderbook::{BookSide, OrderIndex};
use crate::types::snapshot::compute_state_root;
use crate::types::{BookSnapshot, Order, OrderKind, Quote, Side, Trade};

/// Outcome of a successful placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceResult {
    /// The incoming order's state after the call
    pub order: Order,
    /// Fills produced by this call, in execution order
    pub trades: Vec<Trade>,
    /// Whether a remainder is now resting in the book
    pub rested: bool,
}

/// Where an incoming order ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// Rested without trading
    Resting,
    /// Traded, remainder rests
    PartiallyFilled,
    Filled,
}

impl PlaceResult {
    pub fn is_filled(&self) -> bool {
        self.order.is_filled()
    }

    pub fn filled_quantity(&self) -> u64 {
        self.trades.iter().map(|trade| trade.quantity).sum()
    }

    pub fn status(&self) -> OrderStatus {
        if self.order.is_filled() {
            OrderStatus::Filled
        } else if self.trades.is_empty() {
            OrderStatus::Resting
        } else {
            OrderStatus::PartiallyFilled
        }
    }
}

/// Order book for a single market
#[derive(Debug)]
pub struct OrderBook {
    market: String,
    bids: BookSide,
    asks: BookSide,
    index: OrderIndex,
    /// Id given to the next trade
    next_trade_id: u64,
}

impl OrderBook {
    pub fn new(market: impl Into<String>) -> Self {
        Self::with_capacity(market, 0)
    }

    /// Pre-allocate room for `order_capacity` resting orders per side
    pub fn with_capacity(market: impl Into<String>, order_capacity: usize) -> Self {
        Self {
            market: market.into(),
            bids: BookSide::with_capacity(Side::Buy, order_capacity),
            asks: BookSide::with_capacity(Side::Sell, order_capacity),
            index: OrderIndex::with_capacity(order_capacity),
            next_trade_id: 1,
        }
    }

    // ========================================================================
    // Read access
    // ========================================================================

    #[inline]
    pub fn market(&self) -> &str {
        &self.market
    }

    #[inline]
    pub fn bids(&self) -> &BookSide {
        &self.bids
    }

    #[inline]
    pub fn asks(&self) -> &BookSide {
        &self.asks
    }

    #[inline]
    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    #[inline]
    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    #[inline]
    pub fn index(&self) -> &OrderIndex {
        &self.index
    }

    /// Number of resting orders on both sides
    #[inline]
    pub fn order_count(&self) -> usize {
        self.bids.order_count() + self.asks.order_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    pub fn best_bid(&self) -> Option<u64> {
        self.bids.best_price().ok()
    }

    pub fn best_ask(&self) -> Option<u64> {
        self.asks.best_price().ok()
    }

    /// `best_ask - best_bid`; `None` if a side is empty or the book is crossed
    pub fn spread(&self) -> Option<u64> {
        self.best_ask()?.checked_sub(self.best_bid()?)
    }

    #[inline]
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.index.exists(order_id)
    }

    /// A resting order's current state
    pub fn get_order(&self, order_id: u64) -> Option<&Order> {
        let entry = self.index.lookup(order_id).ok()?;
        self.side(entry.side).get(entry.key)
    }

    /// Id of the most recent trade, 0 before the first
    #[inline]
    pub fn last_trade_id(&self) -> u64 {
        self.next_trade_id - 1
    }

    // ========================================================================
    // Placement
    // ========================================================================

    /// Place an order along the path selected by `kind`.
    ///
    /// The order's kind field is overwritten with `kind`.
    ///
    /// Request errors (bad side byte, bad quantity, duplicate id, volume
    /// overflow, insufficient liquidity) leave the book untouched. An
    /// internal error (see [`BookError::is_internal`]) aborts mid-match:
    /// fills applied before it are not rolled back and their trades are
    /// not returned.
    pub fn place(&mut self, kind: OrderKind, order: Order) -> Result<PlaceResult, BookError> {
        match kind {
            OrderKind::Maker => self.place_maker(order),
            OrderKind::TakerLimit => self.place_taker_limit(order),
            OrderKind::Market => self.place_market(order),
        }
    }

    /// Insert without matching, even if the order crosses the other side.
    pub fn place_maker(&mut self, mut order: Order) -> Result<PlaceResult, BookError> {
        order.set_kind(OrderKind::Maker);
        self.validate(&order, true)?;
        self.rest(order.clone())?;

        Ok(PlaceResult {
            order,
            trades: Vec::new(),
            rested: true,
        })
    }

    /// Match while the limit crosses, then rest any remainder under the
    /// same id.
    pub fn place_taker_limit(&mut self, mut order: Order) -> Result<PlaceResult, BookError> {
        order.set_kind(OrderKind::TakerLimit);
        self.validate(&order, true)?;

        let trades = self.match_incoming(&mut order)?;
        let rested = order.remaining > 0;
        if rested {
            self.rest(order.clone())?;
        }

        Ok(PlaceResult {
            order,
            trades,
            rested,
        })
    }

    /// Fill completely against the opposite side or not at all.
    ///
    /// The only gate is the opposite side's aggregate volume. Once it
    /// passes, the order is matched with no price bound, so it is always
    /// fully consumed and never rests.
    pub fn place_market(&mut self, mut order: Order) -> Result<PlaceResult, BookError> {
        order.set_kind(OrderKind::Market);
        self.validate(&order, false)?;

        let side = order.side();
        let available = self.side(side.opposite()).total_volume();
        if available < order.remaining {
            warn!(
                "{}: rejecting market order {} for {}, only {} available",
                self.market, order.id, order.remaining, available
            );
            return Err(BookError::InsufficientLiquidity {
                requested: order.remaining,
                available,
            });
        }

        order.price = side.unbounded_price();
        let trades = self.match_incoming(&mut order)?;
        debug_assert!(order.is_filled(), "gated market order left a remainder");

        Ok(PlaceResult {
            order,
            trades,
            rested: false,
        })
    }

    /// Remove a resting order and return its state at cancellation.
    pub fn cancel(&mut self, order_id: u64) -> Result<Order, BookError> {
        let entry = self.index.lookup(order_id)?;
        let order = self
            .side_mut(entry.side)
            .remove_order(entry.price, entry.key)
            .map_err(|err| self.internal(err))?;
        self.index.remove(order_id)?;

        debug!(
            "{}: cancelled order {} with {} remaining",
            self.market, order_id, order.remaining
        );
        Ok(order)
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    /// Best bid/ask, `depth` levels per side, and the state root.
    pub fn snapshot(&self, depth: usize) -> Result<BookSnapshot, BookError> {
        let bids = self.bids.depth(depth);
        let asks = self.asks.depth(depth);

        Ok(BookSnapshot {
            market: self.market.clone(),
            best_bid: self.bids.depth(1).first().copied().map(Quote::from),
            best_ask: self.asks.depth(1).first().copied().map(Quote::from),
            bids,
            asks,
            bid_volume: self.bids.total_volume(),
            ask_volume: self.asks.total_volume(),
            order_count: self.order_count(),
            last_trade_id: self.last_trade_id(),
            state_root: self.state_root()?,
        })
    }

    /// SHA-256 over every resting order in priority order, bids then asks
    pub fn state_root(&self) -> Result<[u8; 32], BookError> {
        compute_state_root(self.bids.orders().chain(self.asks.orders()))
    }

    /// Walk the whole book and check that sides, levels and the index agree.
    pub fn audit(&self) -> Result<(), BookError> {
        let violation = |msg: String| Err(BookError::InvariantViolated(msg));
        let mut resting = 0usize;

        for side in [&self.bids, &self.asks] {
            let mut side_volume = 0u64;
            let mut side_orders = 0usize;

            for level in side.levels() {
                if level.is_empty() {
                    return violation(format!("empty {:?} level at {}", side.side(), level.price));
                }

                let orders = side.level_orders(level.price);
                let level_volume: u64 = orders.iter().map(|(_, order)| order.remaining).sum();
                if level_volume != level.volume() || orders.len() != level.len() {
                    return violation(format!("level {} bookkeeping drifted", level.price));
                }

                for (key, order) in orders {
                    if order.price != level.price || order.side() != side.side() || order.remaining == 0 {
                        return violation(format!("order {} misplaced", order.id));
                    }
                    match self.index.lookup(order.id) {
                        Ok(entry) if entry.side == side.side() && entry.price == level.price && entry.key == key => {}
                        _ => return violation(format!("order {} index entry is stale", order.id)),
                    }
                }

                side_volume += level_volume;
                side_orders += level.len();
            }

            if side_volume != side.total_volume() || side_orders != side.order_count() {
                return violation(format!("{:?} side totals drifted", side.side()));
            }
            resting += side_orders;
        }

        if resting != self.index.len() {
            return violation(format!("index holds {} ids for {} resting orders", self.index.len(), resting));
        }
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Reject malformed or duplicate orders before any state changes.
    ///
    /// `may_rest` orders must also fit into their own side's volume total.
    fn validate(&self, order: &Order, may_rest: bool) -> Result<(), BookError> {
        let side = Side::from_u8(order.side_raw).ok_or(BookError::InvalidSide(order.id))?;
        if !order.has_valid_quantity() {
            return Err(BookError::InvalidQuantity(order.id));
        }
        if self.index.exists(order.id) {
            warn!("{}: duplicate order id {}", self.market, order.id);
            return Err(BookError::DuplicateOrder(order.id));
        }
        if may_rest && self.side(side).total_volume().checked_add(order.remaining).is_none() {
            warn!("{}: order {} would overflow {:?} volume", self.market, order.id, side);
            return Err(BookError::VolumeOverflow(order.id));
        }
        Ok(())
    }

    /// Append to the back of the order's price level and index it.
    fn rest(&mut self, order: Order) -> Result<(), BookError> {
        let side = order.side();
        let key = self.side_mut(side).add_order(order.clone())?;
        self.index.add(&order, key)?;

        debug!(
            "{}: resting {:?} order {} {} @ {}",
            self.market, side, order.id, order.remaining, order.price
        );
        Ok(())
    }

    /// Core price-time matching loop.
    ///
    /// Pops the best opposite order while the incoming limit crosses it,
    /// trades at the resting price, and returns a partially filled resting
    /// order to the head of its level.
    ///
    /// An internal error (stale handle, missing level) aborts the call
    /// where it occurs. Fills already applied stay applied, the resting
    /// order popped in that iteration may be lost, and the trades produced
    /// so far are not returned. Such errors are logged at `error` level and
    /// mean the book must be audited or rebuilt.
    fn match_incoming(&mut self, order: &mut Order) -> Result<Vec<Trade>, BookError> {
        let taker_side = order.side();
        let maker_side = taker_side.opposite();
        let timestamp = now_millis();
        let mut trades = Vec::new();

        while order.remaining > 0 {
            let best = match self.side(maker_side).best_price() {
                Ok(price) => price,
                Err(BookError::NoLiquidity) => break,
                Err(err) => return Err(self.internal(err)),
            };
            if !taker_side.crosses(order.price, best) {
                break;
            }

            let mut resting = self
                .side_mut(maker_side)
                .pop_best()
                .map_err(|err| self.internal(err))?;
            let quantity = order.remaining.min(resting.remaining);
            order.fill(quantity);
            resting.fill(quantity);

            let trade = self.record_trade(order, &resting, quantity, timestamp);
            debug!(
                "{}: trade {} {} @ {} (maker {}, taker {})",
                self.market, trade.id, trade.quantity, trade.price, resting.id, order.id
            );
            trades.push(trade);

            if resting.is_filled() {
                self.index.remove(resting.id).map_err(|err| self.internal(err))?;
            } else {
                let resting_id = resting.id;
                let key = self
                    .side_mut(maker_side)
                    .put_to_head(resting)
                    .map_err(|err| self.internal(err))?;
                // The slab normally hands back the key freed by `pop_best`;
                // the index follows whatever key it returns.
                self.index.relink(resting_id, key).map_err(|err| self.internal(err))?;
            }
        }

        Ok(trades)
    }

    fn record_trade(&mut self, taker: &Order, maker: &Order, quantity: u64, timestamp: u64) -> Trade {
        let id = self.next_trade_id;
        self.next_trade_id += 1;

        let taker_side = taker.side();
        let (bid, ask) = match taker_side {
            Side::Buy => (taker, maker),
            Side::Sell => (maker, taker),
        };
        Trade::new(
            id,
            bid.id,
            ask.id,
            bid.user_id,
            ask.user_id,
            taker_side,
            maker.price,
            quantity,
            timestamp,
        )
    }

    /// Log an error that means the book's structures disagree.
    fn internal(&self, err: BookError) -> BookError {
        error!("{}: internal book error: {}", self.market, err);
        err
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

// ============================================================================
// Unit Tests
// ============================================================================
