//! Moving average indicators.

use chartwise_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Arithmetic mean of the trailing N values, current point included.
/// The first N-1 points are undefined.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        let period_f64 = self.period as f64;

        for (i, window) in data.windows(self.period).enumerate() {
            result[i + self.period - 1] = Some(window.iter().sum::<f64>() / period_f64);
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Smoothing factor `2 / (N + 1)`, seeded with the first value rather than
/// an initial SMA, so every point is defined.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Ema {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        ema_values(data, self.period).into_iter().map(Some).collect()
    }

    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Recursive EMA: `ema[0] = data[0]`, `ema[t] = a*data[t] + (1-a)*ema[t-1]`.
pub fn ema_values(data: &[f64], period: usize) -> Vec<f64> {
    let multiplier = 2.0 / (period as f64 + 1.0);
    let one_minus_mult = 1.0 - multiplier;

    let mut result = Vec::with_capacity(data.len());
    let mut iter = data.iter();
    if let Some(&first) = iter.next() {
        let mut ema = first;
        result.push(ema);
        for &price in iter {
            ema = multiplier * price + one_minus_mult * ema;
            result.push(ema);
        }
    }
    result
}
