//! Process-scoped cache of the latest fetched series per ticker.

use chrono::{DateTime, Utc};
use tracing::info;

use chartwise_core::types::PriceSeries;

/// Most recent price series per ticker.
///
/// Created empty at startup, replaced wholesale by each fetch action and
/// read-only in between. Iteration follows fetch order.
#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: Vec<PriceSeries>,
    fetched_at: Option<DateTime<Utc>>,
}

impl SeriesCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached series and store the result of a new fetch.
    ///
    /// One entry per symbol: a later series for the same symbol overwrites
    /// the earlier one in its original position.
    pub fn replace(&mut self, series: Vec<PriceSeries>, fetched_at: DateTime<Utc>) {
        let mut entries: Vec<PriceSeries> = Vec::with_capacity(series.len());
        for s in series {
            match entries.iter_mut().find(|e| e.symbol() == s.symbol()) {
                Some(slot) => *slot = s,
                None => entries.push(s),
            }
        }
        info!(
            previous = self.entries.len(),
            current = entries.len(),
            "Replacing cached price data"
        );
        self.entries = entries;
        self.fetched_at = Some(fetched_at);
    }

    /// Get the cached series for a ticker.
    pub fn get(&self, ticker: &str) -> Option<&PriceSeries> {
        self.entries.iter().find(|s| s.symbol() == ticker)
    }

    /// Cached tickers in fetch order.
    pub fn tickers(&self) -> Vec<&str> {
        self.entries.iter().map(|s| s.symbol()).collect()
    }

    /// Iterate over cached series in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = &PriceSeries> {
        self.entries.iter()
    }

    /// Number of cached tickers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// When the cache was last replaced.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}
