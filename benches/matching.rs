//! Benchmarks for the spot matching engine.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- single_match
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use spot_match::{Market, MatchingEngine, Order, OrderBook, OrderKind, Side};

// ============================================================================
// HELPER FUNCTIONS - Deterministic order generation
// ============================================================================

fn make_buy_order(id: u64, price: u64, quantity: u64) -> Order {
    Order::new(id, 1, Side::Buy, price, quantity, 0)
}

fn make_sell_order(id: u64, price: u64, quantity: u64) -> Order {
    Order::new(id, 1, Side::Sell, price, quantity, 0)
}

/// Rest `count` asks starting at `base_price`, one per level.
/// Ids run from `first_id` upward.
fn populate_asks(book: &mut OrderBook, first_id: u64, count: usize, base_price: u64, price_step: u64, quantity: u64) {
    for i in 0..count as u64 {
        let order = make_sell_order(first_id + i, base_price + i * price_step, quantity);
        book.place_maker(order).unwrap();
    }
}

/// Rest `count` bids starting at `base_price`, one per level, descending.
fn populate_bids(book: &mut OrderBook, first_id: u64, count: usize, base_price: u64, price_step: u64, quantity: u64) {
    for i in 0..count as u64 {
        let order = make_buy_order(first_id + i, base_price - i * price_step, quantity);
        book.place_maker(order).unwrap();
    }
}

/// Deterministic taker flow with slight price variations around 50000.
fn generate_order_batch(count: usize, seed: u64) -> Vec<Order> {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let base_price: u64 = 5_000_000_000_000;

    (0..count)
        .map(|i| {
            // Price variation: ±500.00000000
            let price_offset: i64 = rng.gen_range(-50_000_000_000i64..=50_000_000_000i64);
            let price = (base_price as i64 + price_offset) as u64;
            // Quantity: 0.01 to 1.0
            let quantity: u64 = rng.gen_range(1_000_000..=100_000_000);

            if rng.gen_bool(0.5) {
                make_buy_order((i + 1) as u64, price, quantity)
            } else {
                make_sell_order((i + 1) as u64, price, quantity)
            }
        })
        .collect()
}

// ============================================================================
// BENCHMARK: Single Match Latency
// ============================================================================

fn bench_single_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_match");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("against_1k_orders", |b| {
        b.iter_batched(
            || {
                let mut book = OrderBook::with_capacity("BTC-USDT", 2_000);
                populate_asks(&mut book, 1, 1_000, 5_000_000_000_000, 100_000_000, 100_000_000);
                (book, make_buy_order(999_999, 5_000_000_000_000, 100_000_000))
            },
            |(mut book, buy)| black_box(book.place(OrderKind::TakerLimit, buy)),
            BatchSize::SmallInput,
        );
    });

    // Buy order large enough to sweep 10 levels
    group.bench_function("multi_level_sweep", |b| {
        b.iter_batched(
            || {
                let mut book = OrderBook::with_capacity("BTC-USDT", 200);
                populate_asks(&mut book, 1, 100, 5_000_000_000_000, 100_000_000, 10_000_000);
                (book, make_buy_order(999_999, 5_001_000_000_000, 100_000_000))
            },
            |(mut book, buy)| black_box(book.place(OrderKind::TakerLimit, buy)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("market_sweep", |b| {
        b.iter_batched(
            || {
                let mut book = OrderBook::with_capacity("BTC-USDT", 200);
                populate_asks(&mut book, 1, 100, 5_000_000_000_000, 100_000_000, 10_000_000);
                (book, make_buy_order(999_999, 0, 500_000_000))
            },
            |(mut book, buy)| black_box(book.place(OrderKind::Market, buy)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("no_match_rest_on_book", |b| {
        b.iter_batched(
            || {
                let mut book = OrderBook::with_capacity("BTC-USDT", 2_000);
                populate_asks(&mut book, 1, 1_000, 5_000_000_000_000, 100_000_000, 100_000_000);
                (book, make_buy_order(999_999, 4_900_000_000_000, 100_000_000))
            },
            |(mut book, buy)| black_box(book.place(OrderKind::TakerLimit, buy)),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Order Operations
// ============================================================================

fn bench_order_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_operations");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("maker_into_1k_book", |b| {
        b.iter_batched(
            || {
                let mut book = OrderBook::with_capacity("BTC-USDT", 2_000);
                populate_asks(&mut book, 1, 500, 5_000_000_000_000, 100_000_000, 100_000_000);
                populate_bids(&mut book, 501, 500, 4_999_000_000_000, 100_000_000, 100_000_000);
                book
            },
            |mut book| black_box(book.place_maker(make_buy_order(999_999, 4_500_000_000_000, 100_000_000))),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("cancel_middle_of_level", |b| {
        b.iter_batched(
            || {
                let mut book = OrderBook::with_capacity("BTC-USDT", 2_000);
                for id in 1..=1_000 {
                    book.place_maker(make_buy_order(id, 5_000_000_000_000, 100_000_000)).unwrap();
                }
                book
            },
            |mut book| black_box(book.cancel(500)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("snapshot_depth_20", |b| {
        let mut book = OrderBook::with_capacity("BTC-USDT", 2_000);
        populate_asks(&mut book, 1, 500, 5_000_000_000_000, 100_000_000, 100_000_000);
        populate_bids(&mut book, 501, 500, 4_999_000_000_000, 100_000_000, 100_000_000);
        b.iter(|| black_box(book.snapshot(20)));
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Throughput
// ============================================================================

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(15));
    group.sample_size(50);

    for batch_size in [1_000, 10_000, 50_000] {
        group.throughput(Throughput::Elements(batch_size as u64));

        group.bench_with_input(BenchmarkId::new("orders", batch_size), &batch_size, |b, &size| {
            let orders = generate_order_batch(size, 42);

            b.iter_batched(
                || (OrderBook::with_capacity("BTC-USDT", size), orders.clone()),
                |(mut book, orders)| {
                    for order in orders {
                        let _ = black_box(book.place(OrderKind::TakerLimit, order));
                    }
                    book.order_count()
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Engine routing
// ============================================================================

fn bench_engine_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("route_across_4_markets", |b| {
        let orders = generate_order_batch(1_000, 12345);
        let names = ["BTC-USDT", "ETH-USDT", "SOL-USDT", "XRP-USDT"];

        b.iter_batched(
            || {
                let markets = names.iter().filter_map(|name| Market::from_pair(name));
                (MatchingEngine::new(markets).unwrap(), orders.clone())
            },
            |(engine, orders)| {
                for (i, order) in orders.into_iter().enumerate() {
                    let _ = black_box(engine.place_order(names[i % names.len()], OrderKind::TakerLimit, order));
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

// ============================================================================
// CRITERION ENTRY POINT
// ============================================================================

criterion_group!(
    benches,
    bench_single_match,
    bench_order_operations,
    bench_throughput,
    bench_engine_routing
);

criterion_main!(benches);
