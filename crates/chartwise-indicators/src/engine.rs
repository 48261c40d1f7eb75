//! Indicator engine: maps a requested set of indicators onto a price series.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chartwise_core::error::IndicatorError;
use chartwise_core::traits::{Indicator, MultiOutputIndicator, VolumeIndicator};
use chartwise_core::types::PriceSeries;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::momentum::Macd;
use crate::moving_average::{Ema, Sma};
use crate::volatility::BollingerBands;
use crate::volume::Vwap;

/// The fixed set of user-selectable chart overlays.
///
/// Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndicatorKind {
    #[serde(rename = "20-Day SMA")]
    Sma20,
    #[serde(rename = "50-Day SMA")]
    Sma50,
    #[serde(rename = "20-Day EMA")]
    Ema20,
    #[serde(rename = "50-Day EMA")]
    Ema50,
    #[serde(rename = "20-Day Bollinger Bands")]
    Bollinger20,
    #[serde(rename = "MACD")]
    Macd,
    #[serde(rename = "VWAP")]
    Vwap,
}

impl IndicatorKind {
    /// Every selectable indicator, in display order.
    pub const ALL: [IndicatorKind; 7] = [
        IndicatorKind::Sma20,
        IndicatorKind::Sma50,
        IndicatorKind::Ema20,
        IndicatorKind::Ema50,
        IndicatorKind::Bollinger20,
        IndicatorKind::Macd,
        IndicatorKind::Vwap,
    ];

    /// User-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorKind::Sma20 => "20-Day SMA",
            IndicatorKind::Sma50 => "50-Day SMA",
            IndicatorKind::Ema20 => "20-Day EMA",
            IndicatorKind::Ema50 => "50-Day EMA",
            IndicatorKind::Bollinger20 => "20-Day Bollinger Bands",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::Vwap => "VWAP",
        }
    }

    /// Names of the derived series this indicator produces.
    pub fn series_names(&self) -> &'static [&'static str] {
        match self {
            IndicatorKind::Sma20 => &["SMA (20)"],
            IndicatorKind::Sma50 => &["SMA (50)"],
            IndicatorKind::Ema20 => &["EMA (20)"],
            IndicatorKind::Ema50 => &["EMA (50)"],
            IndicatorKind::Bollinger20 => &["BB Upper", "BB Lower"],
            IndicatorKind::Macd => &["MACD"],
            IndicatorKind::Vwap => &["VWAP"],
        }
    }

    /// Compute this indicator's series from close prices and volumes.
    fn compute(&self, close: &[f64], volume: &[f64]) -> Vec<Vec<Option<f64>>> {
        match self {
            IndicatorKind::Sma20 => vec![Sma::new(20).calculate(close)],
            IndicatorKind::Sma50 => vec![Sma::new(50).calculate(close)],
            IndicatorKind::Ema20 => vec![Ema::new(20).calculate(close)],
            IndicatorKind::Ema50 => vec![Ema::new(50).calculate(close)],
            IndicatorKind::Bollinger20 => {
                let bands = BollingerBands::new().calculate(close);
                vec![
                    bands.iter().map(|b| b.map(|b| b.upper)).collect(),
                    bands.iter().map(|b| b.map(|b| b.lower)).collect(),
                ]
            }
            IndicatorKind::Macd => vec![Macd::new().calculate(close)],
            IndicatorKind::Vwap => vec![Vwap::new().calculate(close, volume)],
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IndicatorKind {
    type Err = IndicatorError;

    /// Accepts the display label or a short id, ignoring case and punctuation
    /// (`"20-Day SMA"`, `"sma20"`, `"SMA-20"`, `"bb20"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "20daysma" | "sma20" => Ok(IndicatorKind::Sma20),
            "50daysma" | "sma50" => Ok(IndicatorKind::Sma50),
            "20dayema" | "ema20" => Ok(IndicatorKind::Ema20),
            "50dayema" | "ema50" => Ok(IndicatorKind::Ema50),
            "20daybollingerbands" | "bollinger20" | "bollinger" | "bb20" | "bb" => {
                Ok(IndicatorKind::Bollinger20)
            }
            "macd" => Ok(IndicatorKind::Macd),
            "vwap" => Ok(IndicatorKind::Vwap),
            _ => Err(IndicatorError::InvalidParameter(format!(
                "unknown indicator: {}",
                s
            ))),
        }
    }
}

/// A set of indicators to compute. Duplicates collapse; order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorRequest {
    kinds: BTreeSet<IndicatorKind>,
}

impl IndicatorRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request every available indicator.
    pub fn all() -> Self {
        IndicatorKind::ALL.into_iter().collect()
    }

    /// Build from user-supplied names. Unrecognized names are skipped, not rejected.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| match name.as_ref().parse::<IndicatorKind>() {
                Ok(kind) => Some(kind),
                Err(_) => {
                    debug!(name = name.as_ref(), "Ignoring unrecognized indicator");
                    None
                }
            })
            .collect()
    }

    /// Add an indicator.
    pub fn insert(&mut self, kind: IndicatorKind) -> bool {
        self.kinds.insert(kind)
    }

    /// Check if an indicator is requested.
    pub fn contains(&self, kind: IndicatorKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Number of distinct indicators requested.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Check if nothing is requested.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Requested indicators in display order.
    pub fn iter(&self) -> impl Iterator<Item = IndicatorKind> + '_ {
        self.kinds.iter().copied()
    }
}

impl FromIterator<IndicatorKind> for IndicatorRequest {
    fn from_iter<T: IntoIterator<Item = IndicatorKind>>(iter: T) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

/// A named derived series aligned one-to-one with the source bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    /// Series name, e.g. `SMA (20)` or `BB Upper`
    pub name: String,
    /// One value per bar; `None` inside the warm-up window
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// Value at the most recent bar, if defined there.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Index of the first defined value.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }
}

/// All derived series computed for one price series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    timestamps: Vec<DateTime<FixedOffset>>,
    series: Vec<IndicatorSeries>,
}

impl IndicatorSet {
    /// Bar timestamps the series are aligned to.
    pub fn timestamps(&self) -> &[DateTime<FixedOffset>] {
        &self.timestamps
    }

    /// Look up a series by name.
    pub fn get(&self, name: &str) -> Option<&IndicatorSeries> {
        self.series.iter().find(|s| s.name == name)
    }

    /// Series names in display order.
    pub fn names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if no series were computed.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Iterate over the series in display order.
    pub fn iter(&self) -> impl Iterator<Item = &IndicatorSeries> {
        self.series.iter()
    }

    /// Latest value of every series, in display order.
    pub fn latest_values(&self) -> Vec<(&str, Option<f64>)> {
        self.series
            .iter()
            .map(|s| (s.name.as_str(), s.latest()))
            .collect()
    }
}

/// Pure, deterministic indicator computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorEngine;

impl IndicatorEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Compute every requested indicator over the series. The input is not modified.
    pub fn compute(&self, series: &PriceSeries, request: &IndicatorRequest) -> IndicatorSet {
        let close = series.closes();
        let volume = series.volumes();

        let mut computed = Vec::new();
        for kind in request.iter() {
            let outputs = kind.compute(&close, &volume);
            for (name, values) in kind.series_names().iter().zip(outputs) {
                computed.push(IndicatorSeries {
                    name: (*name).to_string(),
                    values,
                });
            }
        }

        debug!(
            symbol = series.symbol(),
            bars = series.len(),
            series = computed.len(),
            "Computed indicators"
        );

        IndicatorSet {
            timestamps: series.timestamps(),
            series: computed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartwise_core::types::{Bar, Timeframe};
    use chrono::{Duration, TimeZone, Utc};

    fn series_from(closes: &[f64], volume: f64) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 3, 45, 0).unwrap().fixed_offset();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(start + Duration::days(i as i64), c, c, c, c, volume))
            .collect();
        PriceSeries::new("RELIANCE.NS", Timeframe::Daily, bars).unwrap()
    }

    #[test]
    fn test_flat_series_sma_and_bands() {
        let series = series_from(&[100.0; 25], 1000.0);
        let request: IndicatorRequest =
            [IndicatorKind::Sma20, IndicatorKind::Bollinger20].into_iter().collect();

        let set = IndicatorEngine::new().compute(&series, &request);

        let sma = set.get("SMA (20)").unwrap();
        assert_eq!(sma.values.len(), 25);
        assert_eq!(sma.first_defined(), Some(19));
        assert!(sma.values[19..].iter().all(|v| *v == Some(100.0)));

        let upper = set.get("BB Upper").unwrap();
        let lower = set.get("BB Lower").unwrap();
        for i in 19..25 {
            assert_eq!(upper.values[i], Some(100.0));
            assert_eq!(lower.values[i], Some(100.0));
        }
        assert!(upper.values[..19].iter().all(Option::is_none));
    }

    #[test]
    fn test_bands_never_cross() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + ((i * 7919) % 13) as f64).collect();
        let series = series_from(&closes, 10.0);
        let request: IndicatorRequest = [IndicatorKind::Bollinger20].into_iter().collect();

        let set = IndicatorEngine::new().compute(&series, &request);
        let upper = &set.get("BB Upper").unwrap().values;
        let lower = &set.get("BB Lower").unwrap().values;

        for (u, l) in upper.iter().zip(lower.iter()) {
            if let (Some(u), Some(l)) = (u, l) {
                assert!(u >= l);
            }
        }
    }

    #[test]
    fn test_all_series_aligned_with_bars() {
        let closes: Vec<f64> = (0..60).map(|i| 50.0 + i as f64 * 0.5).collect();
        let series = series_from(&closes, 200.0);

        let set = IndicatorEngine::new().compute(&series, &IndicatorRequest::all());

        assert_eq!(
            set.names(),
            vec![
                "SMA (20)", "SMA (50)", "EMA (20)", "EMA (50)", "BB Upper", "BB Lower", "MACD",
                "VWAP"
            ]
        );
        assert_eq!(set.timestamps().len(), 60);
        for s in set.iter() {
            assert_eq!(s.values.len(), 60, "{} misaligned", s.name);
        }
        assert_eq!(set.get("EMA (20)").unwrap().values[0], Some(50.0));
        assert_eq!(set.get("VWAP").unwrap().values[0], Some(50.0));
    }

    #[test]
    fn test_compute_is_deterministic_and_non_mutating() {
        let closes: Vec<f64> = (0..40).map(|i| (i as f64 * 1.3).sin() * 10.0 + 200.0).collect();
        let series = series_from(&closes, 300.0);
        let before = series.clone();
        let engine = IndicatorEngine::new();

        let first = engine.compute(&series, &IndicatorRequest::all());
        let second = engine.compute(&series, &IndicatorRequest::all());

        assert_eq!(series, before);
        for (a, b) in first.iter().zip(second.iter()) {
            let bits_a: Vec<_> = a.values.iter().map(|v| v.map(f64::to_bits)).collect();
            let bits_b: Vec<_> = b.values.iter().map(|v| v.map(f64::to_bits)).collect();
            assert_eq!(bits_a, bits_b);
        }
    }

    #[test]
    fn test_unrecognized_names_are_ignored() {
        let request = IndicatorRequest::from_names(["20-Day SMA", "RSI", "", "macd", "sma20"]);

        assert_eq!(request.len(), 2);
        assert!(request.contains(IndicatorKind::Sma20));
        assert!(request.contains(IndicatorKind::Macd));
    }

    #[test]
    fn test_empty_request_and_empty_series() {
        let engine = IndicatorEngine::new();
        let series = series_from(&[1.0, 2.0], 1.0);
        assert!(engine.compute(&series, &IndicatorRequest::new()).is_empty());

        let empty = PriceSeries::empty("X", Timeframe::Daily);
        let set = engine.compute(&empty, &IndicatorRequest::all());
        assert!(set.iter().all(|s| s.values.is_empty()));
    }

    #[test]
    fn test_labels_parse_back() {
        for kind in IndicatorKind::ALL {
            assert_eq!(kind.label().parse::<IndicatorKind>().unwrap(), kind);
        }
        assert_eq!("SMA-50".parse::<IndicatorKind>().unwrap(), IndicatorKind::Sma50);
        assert_eq!("Bollinger-20".parse::<IndicatorKind>().unwrap(), IndicatorKind::Bollinger20);
    }

    #[test]
    fn test_latest_values_snapshot() {
        let series = series_from(&[10.0, 11.0, 12.0], 5.0);
        let request: IndicatorRequest = [IndicatorKind::Sma20, IndicatorKind::Vwap].into_iter().collect();
        let set = IndicatorEngine::new().compute(&series, &request);

        let latest = set.latest_values();
        assert_eq!(latest[0], ("SMA (20)", None));
        assert!((latest[1].1.unwrap() - 11.0).abs() < 1e-10);
    }
}
