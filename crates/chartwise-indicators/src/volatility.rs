//! Volatility indicators.

use chartwise_core::error::IndicatorError;
use chartwise_core::traits::{Indicator, MultiOutputIndicator};
use serde::{Deserialize, Serialize};

/// Mean and sample standard deviation (n - 1 denominator) of one window.
#[derive(Debug, Clone, Copy)]
struct WindowStats {
    mean: f64,
    std_dev: f64,
}

impl WindowStats {
    fn of(window: &[f64]) -> Self {
        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;
        let squares: f64 = window.iter().map(|x| (x - mean) * (x - mean)).sum();
        Self {
            mean,
            std_dev: (squares / (n - 1.0)).sqrt(),
        }
    }
}

/// Map every full trailing window of `period` points; earlier slots stay `None`.
fn rolling<T: Clone>(data: &[f64], period: usize, f: impl Fn(WindowStats) -> T) -> Vec<Option<T>> {
    let warmup = (period - 1).min(data.len());
    std::iter::repeat(None)
        .take(warmup)
        .chain(data.windows(period).map(|w| Some(f(WindowStats::of(w)))))
        .collect()
}

fn check_period(what: &str, period: usize) -> Result<(), IndicatorError> {
    if period < 2 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} period must be at least 2, got {}",
            what, period
        )));
    }
    Ok(())
}

/// Trailing sample standard deviation. Needs at least two points per window.
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        check_period("standard deviation", period)?;
        Ok(Self { period })
    }
}

impl Indicator for StdDev {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        rolling(data, self.period, |s| s.std_dev)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// One point of the Bollinger envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    pub upper: f64,
    /// SMA of the window
    pub middle: f64,
    pub lower: f64,
}

/// Bollinger Bands: SMA(N) middle band, outer bands `k` sample standard
/// deviations away. Defaults to N = 20, k = 2.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    width: f64,
}

impl BollingerBands {
    pub fn new() -> Self {
        Self {
            period: 20,
            width: 2.0,
        }
    }

    pub fn with_params(period: usize, width: f64) -> Result<Self, IndicatorError> {
        check_period("Bollinger", period)?;
        if !(width >= 0.0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "Bollinger width must be non-negative, got {}",
                width
            )));
        }
        Ok(Self { period, width })
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<Option<BollingerOutput>> {
        rolling(data, self.period, |s| BollingerOutput {
            upper: s.mean + self.width * s.std_dev,
            middle: s.mean,
            lower: s.mean - self.width * s.std_dev,
        })
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moving_average::Sma;

    #[test]
    fn test_std_dev_is_sample_deviation() {
        let result = StdDev::new(3).unwrap().calculate(&[2.0, 4.0, 6.0, 8.0, 10.0]);

        assert_eq!(result.len(), 5);
        assert_eq!(result[..2], [None, None]);
        // [2, 4, 6]: mean 4, squares 4 + 0 + 4 over n - 1 = 2
        assert!((result[2].unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_input_is_all_none() {
        assert_eq!(StdDev::new(5).unwrap().calculate(&[1.0, 2.0]), vec![None, None]);
        assert!(BollingerBands::new().calculate(&[]).is_empty());
    }

    #[test]
    fn test_period_below_two_rejected() {
        assert!(StdDev::new(1).is_err());
        assert!(BollingerBands::with_params(1, 2.0).is_err());
        assert!(BollingerBands::with_params(20, -1.0).is_err());
        assert!(BollingerBands::with_params(20, f64::NAN).is_err());
    }

    #[test]
    fn test_bands_around_sma() {
        let closes: Vec<f64> = (0..30).map(|i| 1500.0 + (i as f64 * 0.4).sin() * 12.0).collect();
        let bands = BollingerBands::new().calculate(&closes);
        let sma = Sma::new(20).calculate(&closes);
        let std_dev = StdDev::new(20).unwrap().calculate(&closes);

        assert!(bands[..19].iter().all(Option::is_none));
        for i in 19..closes.len() {
            let b = bands[i].unwrap();
            let (m, s) = (sma[i].unwrap(), std_dev[i].unwrap());
            assert!((b.middle - m).abs() < 1e-9);
            assert!((b.upper - (m + 2.0 * s)).abs() < 1e-9);
            assert!((b.lower - (m - 2.0 * s)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bands_collapse_on_flat_prices() {
        let result = BollingerBands::with_params(5, 2.0).unwrap().calculate(&[100.0; 6]);

        assert_eq!(result.iter().flatten().count(), 2);
        for b in result.iter().flatten() {
            assert_eq!((b.upper, b.lower), (100.0, 100.0));
        }
    }
}
