//! Builds the `finance.json` snapshot read by the dashboard: latest close and daily
//! percent change for a short, fixed list of market symbols.

pub mod builder;
pub mod error;
pub mod snapshot;
pub mod stocks;
pub mod tickers;

#[cfg(test)]
mod fixtures;

pub use builder::{build_snapshot, run};
pub use error::{FetchError, RecordError, SnapshotError};
pub use snapshot::{QuoteResult, QuoteStatus, Snapshot, SnapshotFile, SnapshotStatus};
pub use stocks::{QuoteSource, RetryPolicy, YahooSource};
pub use tickers::{SnapshotConfig, TickerSpec};
