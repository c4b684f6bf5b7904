//! OHLCV CSV loader.
//!
//! Header names are matched case-insensitively:
//! - one of `date`, `datetime`, `timestamp`
//! - `open`, `high`, `low`, `close`, `volume`
//!
//! Other columns (`adj close`, ...) are ignored. Timestamps may be
//! `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, RFC 3339 or integer epoch seconds,
//! all read as UTC. Rows with an empty or `null` price are skipped.
//! Output is sorted by timestamp; duplicate timestamps are an error.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use bkt_execution::price_to_micros;
use bkt_strategy::Bar;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("missing column: {0}")]
    MissingColumn(&'static str),
    #[error("line {line}: unparseable timestamp {value:?}")]
    BadTimestamp { line: u64, value: String },
    #[error("line {line}: bad {column} value {value:?}")]
    BadNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("duplicate timestamp {ts}")]
    DuplicateTimestamp { ts: i64 },
}

pub fn load_bars_csv(path: impl AsRef<Path>, symbol: &str) -> Result<Vec<Bar>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bars = parse_bars_csv(file, symbol)?;
    tracing::info!(path = %path.display(), symbol, bars = bars.len(), "bars loaded");
    Ok(bars)
}

struct Columns {
    ts: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_ascii_lowercase())
            .collect();
        let find = |want: &'static str| -> Result<usize, LoadError> {
            names
                .iter()
                .position(|n| n == want)
                .ok_or(LoadError::MissingColumn(want))
        };
        let ts = ["date", "datetime", "timestamp"]
            .iter()
            .find_map(|w| names.iter().position(|n| n == w))
            .ok_or(LoadError::MissingColumn("date"))?;
        Ok(Self {
            ts,
            open: find("open")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
            volume: find("volume")?,
        })
    }
}

fn is_missing(s: &str) -> bool {
    s.is_empty() || s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("nan")
}

fn parse_ts(s: &str) -> Option<i64> {
    if let Ok(secs) = s.parse::<i64>() {
        return Some(secs);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

/// Parse bars from CSV content. Pure apart from reading `reader`.
pub fn parse_bars_csv<R: Read>(reader: R, symbol: &str) -> Result<Vec<Bar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let cols = Columns::from_headers(rdr.headers()?)?;

    let mut out: Vec<Bar> = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);
        let field = |i: usize| rec.get(i).unwrap_or("");

        let raw_ts = field(cols.ts);
        let prices = [
            ("open", field(cols.open)),
            ("high", field(cols.high)),
            ("low", field(cols.low)),
            ("close", field(cols.close)),
        ];
        if prices.iter().any(|(_, v)| is_missing(v)) {
            tracing::warn!(line, ts = raw_ts, "row skipped: missing price");
            continue;
        }

        let ts = parse_ts(raw_ts).ok_or_else(|| LoadError::BadTimestamp {
            line,
            value: raw_ts.to_string(),
        })?;

        let mut micros = [0i64; 4];
        for (slot, (column, value)) in micros.iter_mut().zip(prices) {
            *slot = value
                .parse::<f64>()
                .ok()
                .and_then(|p| price_to_micros(p).ok())
                .ok_or_else(|| LoadError::BadNumber {
                    line,
                    column,
                    value: value.to_string(),
                })?;
        }

        let raw_vol = field(cols.volume);
        let volume = if is_missing(raw_vol) {
            0
        } else {
            raw_vol
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.round() as i64)
                .ok_or_else(|| LoadError::BadNumber {
                    line,
                    column: "volume",
                    value: raw_vol.to_string(),
                })?
        };

        let [open, high, low, close] = micros;
        out.push(Bar::new(symbol, ts, open, high, low, close, volume));
    }

    out.sort_by_key(|b| b.ts);
    if let Some(w) = out.windows(2).find(|w| w[0].ts == w[1].ts) {
        return Err(LoadError::DuplicateTimestamp { ts: w[0].ts });
    }
    Ok(out)
}
