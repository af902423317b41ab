use std::io;

use thiserror::Error;
use yahoo_finance_api as yahoo;

use crate::snapshot::QuoteStatus;

/// Failure of a single attempt to pull history from the market-data provider.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("provider error: {0}")]
    Provider(#[from] yahoo::YahooError),

    #[error("empty history for {0}")]
    Empty(String),
}

/// Why a ticker could not be turned into a successful record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// Every fetch attempt failed.
    #[error("no data after retries")]
    Unavailable,

    /// Less than two closes, so no change can be computed.
    #[error("need two closes, got {0}")]
    InsufficientHistory(usize),

    /// The provider answered with data that makes no sense as a price.
    #[error("malformed data: {0}")]
    Malformed(String),
}

impl RecordError {
    pub fn status(&self) -> QuoteStatus {
        match self {
            RecordError::Unavailable | RecordError::InsufficientHistory(_) => QuoteStatus::Failed,
            RecordError::Malformed(_) => QuoteStatus::Error,
        }
    }
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
