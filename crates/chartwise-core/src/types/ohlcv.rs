//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::Timeframe;
use crate::error::DataError;

/// A single OHLCV bar with a time-zone aware timestamp.
/// Prices and volume are f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time, carrying the offset it was normalized to
    pub timestamp: DateTime<FixedOffset>,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Same bar, timestamp expressed in another offset.
    pub fn with_offset(self, offset: FixedOffset) -> Self {
        Self {
            timestamp: self.timestamp.with_timezone(&offset),
            ..self
        }
    }
}

/// Immutable, time-ordered price history for one symbol.
///
/// Built once per fetch cycle. Timestamps are strictly increasing, so no
/// two bars share a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series, rejecting bars that are not strictly after their predecessor.
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<Self, DataError> {
        if let Some(index) = bars
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(DataError::Unordered { index: index + 1 });
        }
        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        })
    }

    /// Sort bars by time and drop later duplicates of a timestamp before building.
    ///
    /// Upstream feeds occasionally repeat the last minute of a session.
    pub fn from_unsorted(symbol: impl Into<String>, timeframe: Timeframe, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);
        Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        }
    }

    /// An empty series for a symbol.
    pub fn empty(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            bars: Vec::new(),
        }
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Bar timeframe.
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// All bars, oldest first.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Extract timestamps as a vector.
    pub fn timestamps(&self) -> Vec<DateTime<FixedOffset>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    /// Re-express every timestamp in the given offset. Ordering is unchanged.
    pub fn with_offset(self, offset: FixedOffset) -> Self {
        Self {
            bars: self.bars.into_iter().map(|b| b.with_offset(offset)).collect(),
            ..self
        }
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(minute: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2024, 3, 4, 4, minute, 0)
            .unwrap()
            .fixed_offset()
    }

    fn bar(minute: u32, close: f64) -> Bar {
        Bar::new(at(minute), close, close + 1.0, close - 1.0, close, 1000.0)
    }

    #[test]
    fn test_series_rejects_duplicate_timestamps() {
        let err = PriceSeries::new("TCS.NS", Timeframe::Minute1, vec![bar(1, 10.0), bar(1, 11.0)])
            .unwrap_err();
        assert!(matches!(err, DataError::Unordered { index: 1 }));
    }

    #[test]
    fn test_series_rejects_backwards_timestamps() {
        let bars = vec![bar(1, 10.0), bar(3, 11.0), bar(2, 12.0)];
        let err = PriceSeries::new("TCS.NS", Timeframe::Minute1, bars).unwrap_err();
        assert!(matches!(err, DataError::Unordered { index: 2 }));
    }

    #[test]
    fn test_from_unsorted_orders_and_dedups() {
        let bars = vec![bar(3, 13.0), bar(1, 11.0), bar(3, 99.0), bar(2, 12.0)];
        let series = PriceSeries::from_unsorted("INFY.NS", Timeframe::Minute1, bars);

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes()[0], 11.0);
        assert_eq!(series.closes()[1], 12.0);
    }

    #[test]
    fn test_with_offset_keeps_instant() {
        let series = PriceSeries::new("INFY.NS", Timeframe::Minute1, vec![bar(0, 10.0)]).unwrap();
        let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let moved = series.clone().with_offset(ist);

        assert_eq!(moved.bars()[0].timestamp, series.bars()[0].timestamp);
        assert_eq!(moved.bars()[0].timestamp.offset(), &ist);
    }

    #[test]
    fn test_series_extractions() {
        let series =
            PriceSeries::new("AAPL", Timeframe::Daily, vec![bar(1, 100.5), bar(2, 101.5)]).unwrap();

        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.volumes(), vec![1000.0, 1000.0]);
        assert_eq!(series.symbol(), "AAPL");
        assert!(PriceSeries::empty("AAPL", Timeframe::Daily).is_empty());
    }
}
