//! Ticker table and run configuration.
//!
//! Everything a run needs is carried by [`SnapshotConfig`], so tests can point the
//! pipeline at their own tickers and output path.

use std::path::PathBuf;

use crate::stocks::RetryPolicy;

/// Display name of the index priced in the local currency.
pub const DOMESTIC_INDEX: &str = "KOSPI";
pub const LOCAL_CURRENCY: &str = "KRW";
/// Currency used for everything that is not the domestic index.
pub const REFERENCE_CURRENCY: &str = "USD";

pub const DEFAULT_OUTPUT: &str = "public/finance.json";

/// Calendar days of history to request; covers weekends and holidays.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 10;

const TICKERS: &[(&str, &str)] = &[
    ("KOSPI", "^KS11"),
    ("Gold", "GC=F"),
    ("Bitcoin", "BTC-USD"),
    ("NASDAQ", "^IXIC"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerSpec {
    /// Unique display name, also used as the record key by the dashboard.
    pub name: String,
    /// Symbol in the provider's notation.
    pub symbol: String,
}

impl TickerSpec {
    pub fn new(name: &str, symbol: &str) -> Self {
        TickerSpec {
            name: String::from(name),
            symbol: String::from(symbol),
        }
    }

    pub fn currency(&self) -> &'static str {
        if self.name == DOMESTIC_INDEX {
            LOCAL_CURRENCY
        } else {
            REFERENCE_CURRENCY
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Tickers in output order.
    pub tickers: Vec<TickerSpec>,
    pub output: PathBuf,
    pub lookback_days: i64,
    pub retry: RetryPolicy,
}

impl SnapshotConfig {
    pub fn new(tickers: Vec<TickerSpec>, output: impl Into<PathBuf>) -> Self {
        SnapshotConfig {
            tickers,
            output: output.into(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            retry: RetryPolicy::default(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        let tickers = TICKERS
            .iter()
            .map(|(name, symbol)| TickerSpec::new(name, symbol))
            .collect();
        SnapshotConfig::new(tickers, DEFAULT_OUTPUT)
    }
}
