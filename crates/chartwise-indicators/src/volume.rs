//! Volume-weighted indicators.

use chartwise_core::traits::VolumeIndicator;

/// Cumulative VWAP from the first bar of the series.
///
/// `sum(close * volume) / sum(volume)` over every bar so far. While the
/// cumulative volume is still zero the value is undefined instead of 0/0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vwap;

impl Vwap {
    /// Create a new cumulative VWAP.
    pub fn new() -> Self {
        Self
    }
}

impl VolumeIndicator for Vwap {
    fn calculate(&self, close: &[f64], volume: &[f64]) -> Vec<Option<f64>> {
        let mut cum_pv = 0.0;
        let mut cum_volume = 0.0;

        close
            .iter()
            .zip(volume.iter())
            .map(|(&price, &vol)| {
                cum_pv += price * vol;
                cum_volume += vol;
                (cum_volume > 0.0).then(|| cum_pv / cum_volume)
            })
            .collect()
    }

    fn name(&self) -> &str {
        "VWAP"
    }
}
