//! Scenario: Bollinger mean reversion, end to end through the engine.
//!
//! period=3, devfactor=1, size=20. Closes 100, 100, 90 put the close under
//! the lower band on bar 3, arming a buy stop at `bot` (~91.95). Bar 4 opens
//! at 92, above the stop, so it fills at the open. The strategy then rests a
//! sell limit at `mid` (~94.67); bar 5 opens at 95 and fills it at the open.
//! The short side mirrors it: a close over `top` arms a sell stop, and the
//! buy limit at `mid` takes the position back to flat.

use approx::assert_abs_diff_eq;
use bkt_backtest::{run_strategy, Bar, BacktestConfig};
use bkt_execution::{micros_to_price, OrderKind, OrderStatus, Side};
use bkt_strategy::{BollingerParams, BollingerStrategy, JournalEntry};

const M: f64 = 1_000_000.0;

fn bar(i: i64, o: f64, h: f64, l: f64, c: f64) -> Bar {
    let m = |p: f64| (p * M).round() as i64;
    Bar::new("SPY", 1_700_000_000 + i * 86_400, m(o), m(h), m(l), m(c), 1_000)
}

fn round_trip_bars() -> Vec<Bar> {
    vec![
        bar(0, 100.0, 101.0, 99.0, 100.0),
        bar(1, 100.0, 101.0, 99.0, 100.0),
        bar(2, 95.0, 96.0, 89.0, 90.0),
        bar(3, 92.0, 95.0, 91.0, 94.0),
        bar(4, 95.0, 96.0, 94.0, 94.5),
    ]
}

fn strategy(debug: bool) -> Box<BollingerStrategy> {
    Box::new(BollingerStrategy::new(BollingerParams::new(3, 1.0, 20, debug).unwrap()).unwrap())
}

// ---------------------------------------------------------------------------
// Entry on the lower band, exit on the mid line
// ---------------------------------------------------------------------------

#[test]
fn scenario_long_round_trip_from_lower_band() {
    let report = run_strategy(
        BacktestConfig::test_defaults(),
        strategy(false),
        &round_trip_bars(),
    )
    .unwrap();

    assert_eq!(report.orders.len(), 2);

    let entry = &report.orders[0];
    assert_eq!(entry.intent.side, Side::Buy);
    assert_eq!(entry.submitted_bar, 3);
    assert_eq!(entry.status, OrderStatus::Completed);
    match entry.intent.kind {
        OrderKind::Stop { price_micros } => {
            assert_abs_diff_eq!(micros_to_price(price_micros), 91.952621, epsilon = 1e-5)
        }
        other => panic!("expected stop entry, got {other:?}"),
    }
    assert_eq!(entry.filled_bar, Some(4));
    assert_eq!(entry.fill_price_micros, Some(92_000_000));

    let exit = &report.orders[1];
    assert_eq!(exit.intent.side, Side::Sell);
    assert_eq!(exit.intent.qty, 20);
    assert!(matches!(exit.intent.kind, OrderKind::Limit { .. }));
    assert_eq!(exit.fill_price_micros, Some(95_000_000));

    assert_eq!(report.fills.len(), 2);
    assert_eq!(report.closed_trades.len(), 1);
    let t = &report.closed_trades[0];
    assert_eq!(t.trade_ref, 1);
    assert_eq!(t.bar_index, 5);
    assert_eq!(t.pnl_micros, 60_000_000);

    assert_eq!(report.starting_value_micros, 100_000_000_000);
    assert_eq!(report.final_value_micros, 100_060_000_000);
    assert!(report.journal.is_empty(), "debug off journals nothing");
}

// ---------------------------------------------------------------------------
// Entry on the upper band, exit on the mid line
// ---------------------------------------------------------------------------

fn short_round_trip_bars() -> Vec<Bar> {
    vec![
        bar(0, 100.0, 101.0, 99.0, 100.0),
        bar(1, 100.0, 101.0, 99.0, 100.0),
        // close 110 > top (~108.05)
        bar(2, 104.0, 111.0, 103.0, 110.0),
        // opens under the stop: fills at the open
        bar(3, 108.0, 109.0, 105.5, 106.0),
        // opens under mid (~105.33): buy limit fills at the open
        bar(4, 105.0, 106.0, 104.0, 105.5),
    ]
}

#[test]
fn scenario_short_round_trip_from_upper_band() {
    let report = run_strategy(
        BacktestConfig::test_defaults(),
        strategy(true),
        &short_round_trip_bars(),
    )
    .unwrap();

    assert_eq!(report.orders.len(), 2);

    let entry = &report.orders[0];
    assert_eq!(entry.intent.side, Side::Sell);
    assert_eq!(entry.submitted_bar, 3);
    match entry.intent.kind {
        OrderKind::Stop { price_micros } => {
            assert_abs_diff_eq!(micros_to_price(price_micros), 108.047379, epsilon = 1e-5)
        }
        other => panic!("expected stop entry, got {other:?}"),
    }
    assert_eq!(entry.filled_bar, Some(4));
    assert_eq!(entry.fill_price_micros, Some(108_000_000));

    let exit = &report.orders[1];
    assert_eq!(exit.intent.side, Side::Buy);
    assert_eq!(exit.intent.qty, 20);
    match exit.intent.kind {
        OrderKind::Limit { price_micros } => {
            assert_abs_diff_eq!(micros_to_price(price_micros), 105.333333, epsilon = 1e-5)
        }
        other => panic!("expected limit exit, got {other:?}"),
    }
    assert_eq!(exit.status, OrderStatus::Completed);
    assert_eq!(exit.fill_price_micros, Some(105_000_000));

    assert_eq!(report.closed_trades.len(), 1);
    assert_eq!(report.closed_trades[0].trade_ref, 1);
    assert_eq!(report.closed_trades[0].pnl_micros, 60_000_000);
    assert_eq!(report.final_value_micros, 100_060_000_000);

    let trade_line = report
        .journal
        .iter()
        .find(|e| matches!(e, JournalEntry::TradeClosed { .. }))
        .map(|e| e.to_string())
        .unwrap();
    assert!(trade_line.contains("ref=1 pnl=60.00"), "{trade_line}");
}

// ---------------------------------------------------------------------------
// Debug journal: one snapshot per evaluated bar, one line per closed trade
// ---------------------------------------------------------------------------

#[test]
fn scenario_debug_journal_counts() {
    let report = run_strategy(
        BacktestConfig::test_defaults(),
        strategy(true),
        &round_trip_bars(),
    )
    .unwrap();

    let snapshots = report
        .journal
        .iter()
        .filter(|e| matches!(e, JournalEntry::BarSnapshot { .. }))
        .count();
    let trades = report
        .journal
        .iter()
        .filter(|e| matches!(e, JournalEntry::TradeClosed { .. }))
        .count();

    // Bars 3, 4, 5 are past warm-up.
    assert_eq!(snapshots, 3);
    assert_eq!(trades, 1);
    assert_eq!(report.journal.len(), 4);

    match &report.journal[2] {
        JournalEntry::TradeClosed {
            bar_index,
            pnl_micros,
            ..
        } => {
            assert_eq!(*bar_index, 5);
            assert_eq!(*pnl_micros, 60_000_000);
        }
        other => panic!("expected the trade line before bar 5's snapshot, got {other:?}"),
    }
    match &report.journal[3] {
        JournalEntry::BarSnapshot { position_qty, .. } => assert_eq!(*position_qty, 0),
        other => panic!("unexpected entry {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Untriggered stop is cancelled on the next evaluated bar
// ---------------------------------------------------------------------------

#[test]
fn scenario_stale_stop_is_cancelled_not_left_resting() {
    let bars = vec![
        bar(0, 100.0, 101.0, 99.0, 100.0),
        bar(1, 100.0, 101.0, 99.0, 100.0),
        bar(2, 95.0, 96.0, 89.0, 90.0),
        // High stays below the ~91.95 stop.
        bar(3, 90.5, 91.0, 90.0, 90.8),
    ];
    let report = run_strategy(BacktestConfig::test_defaults(), strategy(false), &bars).unwrap();

    assert!(report.fills.is_empty());
    assert_eq!(report.orders[0].status, OrderStatus::Canceled);
    // Whatever bar 4 armed is the only live order.
    let open = report
        .orders
        .iter()
        .filter(|o| o.status == OrderStatus::Accepted)
        .count();
    assert!(open <= 1);
}

#[test]
fn scenario_bands_are_published_as_plot_series() {
    let report = run_strategy(
        BacktestConfig::test_defaults(),
        strategy(false),
        &round_trip_bars(),
    )
    .unwrap();
    for name in ["boll_mid", "boll_top", "boll_bot"] {
        let series = &report.plots[name];
        assert_eq!(series.len(), 3, "{name}");
        assert_eq!(series[0].0, round_trip_bars()[2].ts);
    }
}
