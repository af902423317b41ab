//! The `finance.json` document.
//!
//! The current format is `{ "meta": {...}, "data": [...] }`. Older builds wrote a bare
//! array of records without `status`; [`SnapshotFile`] still reads those so the
//! binary can tell when it is replacing one.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::offset::Utc;
use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{RecordError, SnapshotError};
use crate::tickers::{TickerSpec, REFERENCE_CURRENCY};

/// The dashboard greys out data older than this.
pub const STALE_AFTER_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Success,
    Failed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub name: String,
    pub symbol: String,
    /// Latest close, 0 when unavailable.
    pub price: f64,
    /// Percent change against the previous close, 0 when unavailable.
    pub change: f64,
    pub currency: String,
    #[serde(default)]
    pub status: QuoteStatus,
}

impl QuoteResult {
    pub fn success(spec: &TickerSpec, price: f64, change: f64) -> Self {
        QuoteResult {
            name: spec.name.clone(),
            symbol: spec.symbol.clone(),
            price,
            change,
            currency: spec.currency().to_string(),
            status: QuoteStatus::Success,
        }
    }

    /// Zeroed placeholder for a ticker that could not be priced.
    pub fn degraded(spec: &TickerSpec, reason: &RecordError) -> Self {
        let status = reason.status();
        let currency = match status {
            QuoteStatus::Error => REFERENCE_CURRENCY,
            _ => spec.currency(),
        };

        QuoteResult {
            name: spec.name.clone(),
            symbol: spec.symbol.clone(),
            price: 0.0,
            change: 0.0,
            currency: currency.to_string(),
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    Success,
    PartialSuccess,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub updated_at: DateTime<FixedOffset>,
    pub status: SnapshotStatus,
    pub source: String,
}

impl Meta {
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now.signed_duration_since(self.updated_at) > max_age
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub meta: Meta,
    pub data: Vec<QuoteResult>,
}

impl Snapshot {
    pub fn new(data: Vec<QuoteResult>, source: &str, updated_at: DateTime<FixedOffset>) -> Self {
        let status = if data.iter().all(|r| r.status == QuoteStatus::Success) {
            SnapshotStatus::Success
        } else {
            SnapshotStatus::PartialSuccess
        };

        Snapshot {
            meta: Meta {
                updated_at,
                status,
                source: source.to_string(),
            },
            data,
        }
    }

    /// Writes pretty-printed JSON to `path`, replacing whatever was there and
    /// creating the parent directory if needed. The write is not atomic.
    pub fn write(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Capture time in Korea Standard Time, as the dashboard displays it.
pub fn captured_now() -> DateTime<FixedOffset> {
    Utc::now()
        .with_timezone(&chrono_tz::Asia::Seoul)
        .fixed_offset()
}

/// A snapshot file as found on disk, in either format.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SnapshotFile {
    Current(Snapshot),
    /// Deprecated bare array of records.
    Legacy(Vec<QuoteResult>),
}

impl SnapshotFile {
    pub fn read(path: &Path) -> Result<Self, SnapshotError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Like [`SnapshotFile::read`], but a missing file is `Ok(None)`.
    pub fn read_existing(path: &Path) -> Result<Option<Self>, SnapshotError> {
        match Self::read(path) {
            Ok(file) => Ok(Some(file)),
            Err(SnapshotError::Io(why)) if why.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(why) => Err(why),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, SnapshotFile::Legacy(_))
    }

    pub fn meta(&self) -> Option<&Meta> {
        match self {
            SnapshotFile::Current(snapshot) => Some(&snapshot.meta),
            SnapshotFile::Legacy(_) => None,
        }
    }

    pub fn records(&self) -> &[QuoteResult] {
        match self {
            SnapshotFile::Current(snapshot) => &snapshot.data,
            SnapshotFile::Legacy(records) => records,
        }
    }
}
