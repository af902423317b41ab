use std::time::Duration;

use chrono::offset::Utc;
use chrono::{DateTime, TimeZone};
use log::{debug, warn};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

use crate::error::FetchError;

trait QuoteTime {
    fn time(&self) -> Option<DateTime<Utc>>;
}

impl QuoteTime for yahoo::Quote {
    fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp as i64, 0).single()
    }
}

/// One daily close as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotePoint {
    pub close: f64,
    pub as_of: Option<DateTime<Utc>>,
}

impl QuotePoint {
    pub fn new(close: f64) -> Self {
        QuotePoint { close, as_of: None }
    }
}

impl From<&yahoo::Quote> for QuotePoint {
    fn from(quote: &yahoo::Quote) -> Self {
        QuotePoint {
            close: quote.close,
            as_of: quote.time(),
        }
    }
}

/// Where daily closing prices come from.
///
/// Series are ordered oldest first, so the latest close is the last element.
#[allow(async_fn_in_trait)]
pub trait QuoteSource {
    /// Reported as `meta.source` in the snapshot.
    fn name(&self) -> &str;

    async fn daily_closes(
        &self,
        symbol: &str,
        lookback_days: i64,
    ) -> Result<Vec<QuotePoint>, FetchError>;
}

pub struct YahooSource {
    conn: yahoo::YahooConnector,
}

impl YahooSource {
    pub fn new() -> Result<Self, FetchError> {
        Ok(YahooSource {
            conn: yahoo::YahooConnector::new()?,
        })
    }
}

impl QuoteSource for YahooSource {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn daily_closes(
        &self,
        symbol: &str,
        lookback_days: i64,
    ) -> Result<Vec<QuotePoint>, FetchError> {
        let end = OffsetDateTime::now_utc();
        let start = end - time::Duration::days(lookback_days);
        let quote_res = self.conn.get_quote_history(symbol, start, end).await?;

        let quotes = quote_res.quotes()?;

        if quotes.is_empty() {
            return Err(FetchError::Empty(symbol.to_string()));
        }

        Ok(quotes.iter().map(QuotePoint::from).collect())
    }
}

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    /// Wait after the first failure; doubles after each further one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait after the failure of attempt `attempt` (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Fetches recent closes for `symbol`, retrying any failure.
///
/// An empty series counts as a failure. Returns `None` once every attempt has
/// failed; errors never escape this function.
pub async fn fetch_with_retry<S: QuoteSource>(
    source: &S,
    symbol: &str,
    lookback_days: i64,
    policy: &RetryPolicy,
) -> Option<Vec<QuotePoint>> {
    for attempt in 0..policy.attempts {
        let result = match source.daily_closes(symbol, lookback_days).await {
            Ok(series) if series.is_empty() => Err(FetchError::Empty(symbol.to_string())),
            other => other,
        };

        match result {
            Ok(series) => {
                if let Some(as_of) = series.last().and_then(|point| point.as_of) {
                    debug!("{} latest close as of {}", symbol, as_of.date_naive());
                }
                return Some(series);
            }
            Err(why) => {
                warn!("Attempt {} failed for {}: {}", attempt + 1, symbol, why);
                tokio::time::sleep(policy.delay(attempt)).await;
            }
        }
    }

    None
}

/// Percent change from `previous` to `latest`; 0.0 when undefined or not finite.
pub fn change_percentage(latest: f64, previous: f64) -> f64 {
    if previous == 0.0 || previous.is_nan() {
        return 0.0;
    }

    let delta = latest - previous;
    let pcntg = (delta / previous) * 100.;

    if !pcntg.is_finite() {
        0.0
    } else {
        pcntg
    }
}
