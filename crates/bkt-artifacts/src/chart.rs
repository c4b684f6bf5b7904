//! Chart render request.
//!
//! Nothing is drawn here. `chart.json` carries everything an external
//! plotter needs: price candles, indicator overlays, fill markers and the
//! equity line.

use bkt_backtest::{BacktestReport, Bar};
use bkt_config::ChartStyle;
use bkt_execution::{micros_to_price, Side};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Candle {
    pub ts: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Overlay {
    pub name: String,
    pub points: Vec<(i64, f64)>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub ts: i64,
    pub side: Side,
    pub price: f64,
    pub qty: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartRequest {
    pub title: String,
    pub style: ChartStyle,
    pub candles: Vec<Candle>,
    pub overlays: Vec<Overlay>,
    pub markers: Vec<Marker>,
    pub equity: Vec<(i64, f64)>,
}

impl ChartRequest {
    pub fn from_report(
        title: impl Into<String>,
        style: ChartStyle,
        bars: &[Bar],
        report: &BacktestReport,
    ) -> Self {
        let candles = bars
            .iter()
            .map(|b| Candle {
                ts: b.ts,
                open: micros_to_price(b.open_micros),
                high: micros_to_price(b.high_micros),
                low: micros_to_price(b.low_micros),
                close: micros_to_price(b.close_micros),
                volume: b.volume,
            })
            .collect();

        let overlays = report
            .plots
            .iter()
            .map(|(name, points)| Overlay {
                name: name.clone(),
                points: points.clone(),
            })
            .collect();

        let markers = report
            .fills
            .iter()
            .map(|f| Marker {
                ts: f.ts,
                side: f.side,
                price: micros_to_price(f.price_micros),
                qty: f.qty,
            })
            .collect();

        let equity = report
            .equity_curve
            .iter()
            .map(|(ts, eq)| (*ts, micros_to_price(*eq)))
            .collect();

        Self {
            title: title.into(),
            style,
            candles,
            overlays,
            markers,
            equity,
        }
    }
}
