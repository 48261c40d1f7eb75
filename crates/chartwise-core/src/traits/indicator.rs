//! Indicator trait definitions.
//!
//! Every indicator returns one slot per input point so the output overlays
//! the price series by index. Slots inside the warm-up window are `None`.

/// Indicator over a single input series, usually closes.
pub trait Indicator: Send + Sync {
    type Output;

    /// Output aligned with `data`: same length, `None` until warmed up.
    fn calculate(&self, data: &[f64]) -> Vec<Option<Self::Output>>;

    /// Points consumed before the first defined output.
    fn period(&self) -> usize;

    fn name(&self) -> &str;
}

/// Indicator producing several bands per point (Bollinger upper/middle/lower).
pub trait MultiOutputIndicator: Send + Sync {
    type Outputs;

    fn calculate(&self, data: &[f64]) -> Vec<Option<Self::Outputs>>;

    fn period(&self) -> usize;

    fn name(&self) -> &str;
}

/// Indicator that weighs closes by traded volume; inputs are paired by index.
pub trait VolumeIndicator: Send + Sync {
    fn calculate(&self, close: &[f64], volume: &[f64]) -> Vec<Option<f64>>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Highest close of the trailing window.
    struct RollingHigh(usize);

    impl Indicator for RollingHigh {
        type Output = f64;

        fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
            (0..data.len())
                .map(|i| {
                    (i + 1 >= self.0)
                        .then(|| data[i + 1 - self.0..=i].iter().copied().fold(f64::MIN, f64::max))
                })
                .collect()
        }

        fn period(&self) -> usize {
            self.0
        }

        fn name(&self) -> &str {
            "High"
        }
    }

    #[test]
    fn test_output_overlays_input() {
        let closes = [101.0, 99.5, 102.25, 100.0];
        let high = RollingHigh(2);
        let result = high.calculate(&closes);

        assert_eq!(result.len(), closes.len());
        assert_eq!(result.iter().take_while(|v| v.is_none()).count(), high.period() - 1);
        assert_eq!(result[2], Some(102.25));
        assert_eq!(result[3], Some(102.25));
    }

    #[test]
    fn test_usable_as_trait_object() {
        let boxed: Box<dyn Indicator<Output = f64>> = Box::new(RollingHigh(3));
        assert_eq!(boxed.name(), "High");
        assert!(boxed.calculate(&[]).is_empty());
    }
}
