//! Scenario: same bars + same config => identical report.

use bkt_backtest::{run_strategy, Bar, BacktestConfig, StressProfile};
use bkt_strategy::{BollingerParams, SmaCrossParams, StrategyParams};

/// Deterministic zig-zag with enough swing to trigger band breaks.
fn bars(n: i64) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let base = 100_000_000 + ((i * 37) % 23 - 11) * 1_500_000;
            let open = base - 200_000;
            let close = base + if i % 3 == 0 { 700_000 } else { -400_000 };
            let high = open.max(close) + 900_000;
            let low = open.min(close) - 900_000;
            Bar::new("SPY", 1_600_000_000 + i * 86_400, open, high, low, close, 10_000 + i)
        })
        .collect()
}

fn cfg() -> BacktestConfig {
    BacktestConfig {
        initial_cash_micros: 50_000_000_000,
        commission_bps: 5,
        stress: StressProfile { slippage_bps: 3 },
    }
}

#[test]
fn scenario_bollinger_replay_is_deterministic() {
    let params = StrategyParams::Bollinger(BollingerParams::new(10, 1.5, 20, true).unwrap());
    let data = bars(200);

    let a = run_strategy(cfg(), params.build().unwrap(), &data).unwrap();
    let b = run_strategy(cfg(), params.build().unwrap(), &data).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.equity_curve.len(), 200);
    assert!(!a.fills.is_empty(), "fixture should trade");
}

#[test]
fn scenario_sma_cross_replay_is_deterministic() {
    let params = StrategyParams::SmaCross(SmaCrossParams {
        fast: 3,
        slow: 8,
        stake: 5,
    });
    let data = bars(120);

    let a = run_strategy(cfg(), params.build().unwrap(), &data).unwrap();
    let b = run_strategy(cfg(), params.build().unwrap(), &data).unwrap();
    assert_eq!(a, b);
}
