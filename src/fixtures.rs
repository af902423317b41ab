//! In-memory quote source for tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::FetchError;
use crate::stocks::{QuotePoint, QuoteSource};

struct Script {
    failures: u32,
    closes: Option<Vec<f64>>,
}

/// Replies per symbol with canned closes, a fixed number of failures first,
/// or failures forever. Unknown symbols always fail.
#[derive(Default)]
pub(crate) struct ScriptedSource {
    scripts: HashMap<String, Script>,
    calls: RefCell<HashMap<String, u32>>,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Closes are given oldest first.
    pub(crate) fn closes(self, symbol: &str, closes: &[f64]) -> Self {
        self.flaky(symbol, 0, closes)
    }

    pub(crate) fn flaky(mut self, symbol: &str, failures: u32, closes: &[f64]) -> Self {
        self.scripts.insert(
            symbol.to_string(),
            Script {
                failures,
                closes: Some(closes.to_vec()),
            },
        );
        self
    }

    pub(crate) fn failing(mut self, symbol: &str) -> Self {
        self.scripts.insert(
            symbol.to_string(),
            Script {
                failures: u32::MAX,
                closes: None,
            },
        );
        self
    }

    pub(crate) fn calls(&self, symbol: &str) -> u32 {
        self.calls.borrow().get(symbol).copied().unwrap_or(0)
    }
}

impl QuoteSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn daily_closes(
        &self,
        symbol: &str,
        _lookback_days: i64,
    ) -> Result<Vec<QuotePoint>, FetchError> {
        let call = {
            let mut calls = self.calls.borrow_mut();
            let count = calls.entry(symbol.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        match self.scripts.get(symbol) {
            Some(Script {
                failures,
                closes: Some(closes),
            }) if call > *failures => Ok(closes.iter().copied().map(QuotePoint::new).collect()),
            _ => Err(FetchError::Empty(symbol.to_string())),
        }
    }
}
