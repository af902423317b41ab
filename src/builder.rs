//! Turns the ticker table into a snapshot, one ticker at a time.

use chrono::{DateTime, FixedOffset};
use log::{error, info, warn};

use crate::error::{RecordError, SnapshotError};
use crate::snapshot::{captured_now, QuoteResult, Snapshot};
use crate::stocks::{change_percentage, fetch_with_retry, QuotePoint, QuoteSource};
use crate::tickers::{SnapshotConfig, TickerSpec};

/// Latest close and percent change from a series ordered oldest first.
pub fn price_and_change(series: Option<&[QuotePoint]>) -> Result<(f64, f64), RecordError> {
    let series = series.ok_or(RecordError::Unavailable)?;

    let [.., previous, latest] = series else {
        return Err(RecordError::InsufficientHistory(series.len()));
    };

    let price = latest.close;
    if !price.is_finite() || price < 0.0 {
        return Err(RecordError::Malformed(format!("latest close is {}", price)));
    }

    Ok((price, change_percentage(price, previous.close)))
}

/// Two decimals with comma-grouped thousands, as the dashboard log has always shown.
fn grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut out = String::with_capacity(fixed.len() + whole.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out.push('.');
    out.push_str(cents);
    out
}

/// Fetches and prices one ticker. Never fails; problems become a degraded record.
pub async fn build_record<S: QuoteSource>(
    source: &S,
    spec: &TickerSpec,
    config: &SnapshotConfig,
) -> QuoteResult {
    let series = fetch_with_retry(source, &spec.symbol, config.lookback_days, &config.retry).await;

    match price_and_change(series.as_deref()) {
        Ok((price, change)) => {
            info!("{}: {} ({:+.2}%)", spec.name, grouped(price), change);
            QuoteResult::success(spec, price, change)
        }
        Err(why @ (RecordError::Unavailable | RecordError::InsufficientHistory(_))) => {
            warn!("Failed to fetch valid data for {}: {}", spec.name, why);
            QuoteResult::degraded(spec, &why)
        }
        Err(why) => {
            error!("Critical error processing {}: {}", spec.name, why);
            QuoteResult::degraded(spec, &why)
        }
    }
}

/// One record per configured ticker, in configuration order.
pub async fn build_snapshot<S: QuoteSource>(
    source: &S,
    config: &SnapshotConfig,
    captured_at: DateTime<FixedOffset>,
) -> Snapshot {
    let mut data = Vec::with_capacity(config.tickers.len());
    for spec in &config.tickers {
        data.push(build_record(source, spec, config).await);
    }

    Snapshot::new(data, source.name(), captured_at)
}

/// Builds a snapshot stamped with the current time and writes it to `config.output`.
pub async fn run<S: QuoteSource>(
    source: &S,
    config: &SnapshotConfig,
) -> Result<Snapshot, SnapshotError> {
    info!("Fetching data from {}...", source.name());

    let snapshot = build_snapshot(source, config, captured_now()).await;
    snapshot.write(&config.output)?;

    info!(
        "Saved to {} (Status: {:?})",
        config.output.display(),
        snapshot.meta.status
    );
    Ok(snapshot)
}
