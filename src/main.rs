//! Spot Match - Binary Entry Point
//!
//! Loads market configuration, builds the engine and runs a short demo
//! session against the first market, printing trades and the resulting
//! book snapshot as JSON.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;

use spot_match::config::EngineConfig;
use spot_match::types::price::{from_fixed, from_fixed_trimmed, to_fixed};
use spot_match::types::{Market, Order, OrderKind, Side, Trade};
use spot_match::MatchingEngine;

#[derive(Parser, Debug)]
#[command(name = "spot-match", version, about = "Spot order matching engine")]
struct Args {
    /// Path to a TOML file listing markets
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Levels per side in the printed snapshot (overrides the config)
    #[arg(short, long)]
    depth: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_toml(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::new(vec![Market::new("BTC-USDT", "BTC", "USDT")]),
    };
    let depth = args.depth.unwrap_or(config.snapshot_depth);

    let engine = MatchingEngine::new(config.markets.clone())?;
    let market = config
        .markets
        .first()
        .map(|m| m.name.clone())
        .ok_or_else(|| anyhow!("no markets configured"))?;

    println!("===========================================");
    println!("  Spot Match - {}", market);
    println!("===========================================");
    println!();

    let fixed = |s: &str| to_fixed(s).ok_or_else(|| anyhow!("invalid amount {}", s));

    // Resting liquidity on both sides
    let makers = [
        (1, 100, Side::Sell, "50010", "0.5"),
        (2, 101, Side::Sell, "50020", "1.0"),
        (3, 102, Side::Sell, "50010", "0.25"),
        (4, 103, Side::Buy, "49990", "0.8"),
        (5, 104, Side::Buy, "49980", "2.0"),
    ];
    for (id, user, side, price, qty) in makers {
        let order = Order::new(id, user, side, fixed(price)?, fixed(qty)?, id);
        engine.place_order(&market, OrderKind::Maker, order)?;
    }
    info!("seeded {} maker orders", makers.len());

    // Aggressive buy crossing two levels, remainder rests
    let taker = Order::new(6, 200, Side::Buy, fixed("50020")?, fixed("2.0")?, 6);
    let result = engine.place_order(&market, OrderKind::TakerLimit, taker)?;
    println!("Taker limit buy #6: {:?}", result.status());
    print_trades(&result.trades);

    // Market sell into the bids
    let market_sell = Order::new(7, 201, Side::Sell, 0, fixed("1.0")?, 7);
    let result = engine.place_order(&market, OrderKind::Market, market_sell)?;
    println!("Market sell #7: {:?}", result.status());
    print_trades(&result.trades);

    // Market buy larger than the whole ask side is rejected outright
    let oversized = Order::new(8, 202, Side::Buy, 0, fixed("100")?, 8);
    match engine.place_order(&market, OrderKind::Market, oversized) {
        Ok(_) => println!("Market buy #8: unexpectedly filled"),
        Err(err) => println!("Market buy #8 rejected: {}", err),
    }

    let cancelled = engine.cancel_order(&market, 5)?;
    println!(
        "Cancelled #5 with {} remaining",
        from_fixed_trimmed(cancelled.remaining)
    );
    println!();

    let snapshot = engine.snapshot(&market, depth)?;
    println!("Snapshot (depth {}):", depth);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    println!("State root: 0x{}", snapshot.state_root_hex());

    Ok(())
}

fn print_trades(trades: &[Trade]) {
    if trades.is_empty() {
        println!("  no trades");
    }
    for trade in trades {
        let notional = trade
            .notional()
            .map(from_fixed)
            .unwrap_or_else(|| "overflow".to_string());
        println!(
            "  trade #{}: {} @ {} (bid #{}, ask #{}, notional {})",
            trade.id,
            from_fixed_trimmed(trade.quantity),
            from_fixed_trimmed(trade.price),
            trade.bid_order_id,
            trade.ask_order_id,
            notional
        );
    }
    println!();
}
