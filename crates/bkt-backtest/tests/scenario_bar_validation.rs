//! Scenario: malformed input stops the run before anything trades.

use bkt_backtest::{BacktestConfig, BacktestEngine, BacktestError, Bar, StressProfile};
use bkt_strategy::{LogPriceParams, LogPriceStrategy};

const M: i64 = 1_000_000;

fn ok_bar(ts: i64) -> Bar {
    Bar::new("SPY", ts, 100 * M, 101 * M, 99 * M, 100 * M, 10)
}

fn engine(cfg: BacktestConfig) -> BacktestEngine {
    let mut e = BacktestEngine::new(cfg);
    e.add_strategy(Box::new(LogPriceStrategy::new(LogPriceParams::default())))
        .unwrap();
    e
}

#[test]
fn negative_timestamp_is_rejected() {
    let err = engine(BacktestConfig::test_defaults())
        .run(&[ok_bar(-1)])
        .unwrap_err();
    assert_eq!(err, BacktestError::NegativeTimestamp { ts: -1 });
}

#[test]
fn repeated_or_backwards_timestamp_is_rejected() {
    let err = engine(BacktestConfig::test_defaults())
        .run(&[ok_bar(100), ok_bar(100)])
        .unwrap_err();
    assert_eq!(
        err,
        BacktestError::OutOfOrderBar {
            prev_ts: 100,
            ts: 100
        }
    );
}

#[test]
fn inconsistent_ohlc_is_rejected() {
    let mut high_below_close = ok_bar(10);
    high_below_close.high_micros = 99 * M;
    let err = engine(BacktestConfig::test_defaults())
        .run(&[high_below_close])
        .unwrap_err();
    assert!(matches!(err, BacktestError::MalformedBar { ts: 10, .. }));

    let mut zero_low = ok_bar(10);
    zero_low.low_micros = 0;
    assert!(engine(BacktestConfig::test_defaults())
        .run(&[zero_low])
        .is_err());
}

#[test]
fn config_is_checked_before_first_bar() {
    let mut cfg = BacktestConfig::test_defaults();
    cfg.stress = StressProfile { slippage_bps: -1 };
    let err = engine(cfg).run(&[ok_bar(1)]).unwrap_err();
    assert_eq!(
        err,
        BacktestError::NegativeSlippage {
            field: "slippage_bps",
            value_bps: -1
        }
    );

    let mut cfg = BacktestConfig::test_defaults();
    cfg.initial_cash_micros = 0;
    assert!(matches!(
        engine(cfg).run(&[]).unwrap_err(),
        BacktestError::NonPositiveCash { .. }
    ));
}

#[test]
fn run_without_strategy_is_an_error() {
    let mut e = BacktestEngine::new(BacktestConfig::test_defaults());
    assert!(matches!(
        e.run(&[ok_bar(1)]).unwrap_err(),
        BacktestError::StrategyHost(_)
    ));
}

#[test]
fn empty_feed_reports_cash_as_value() {
    let report = engine(BacktestConfig::test_defaults()).run(&[]).unwrap();
    assert_eq!(report.final_value_micros, report.starting_value_micros);
    assert_eq!(report.bars_processed, 0);
}

#[test]
fn log_price_journals_every_bar() {
    let report = engine(BacktestConfig::test_defaults())
        .run(&[ok_bar(0), ok_bar(86_400), ok_bar(172_800)])
        .unwrap();
    assert_eq!(report.journal.len(), 3);
    assert_eq!(report.journal[1].to_string(), "1970-01-02, Close, 100.00");
}
