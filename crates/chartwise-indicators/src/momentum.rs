//! Momentum indicators.

use chartwise_core::traits::Indicator;

use crate::moving_average::ema_values;

/// MACD line: fast EMA minus slow EMA of the input.
///
/// Both EMAs use the first-value seeding of [`ema_values`], so the line is
/// defined at every point. Signal line and histogram are not computed.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26).
    pub fn new() -> Self {
        Self::with_periods(12, 26)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize) -> Self {
        assert!(fast > 0 && slow > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Macd {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let fast = ema_values(data, self.fast_period);
        let slow = ema_values(data, self.slow_period);

        fast.iter().zip(slow.iter()).map(|(f, s)| Some(f - s)).collect()
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "MACD"
    }
}
