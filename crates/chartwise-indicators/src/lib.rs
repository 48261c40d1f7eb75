//! Technical indicators overlaid on the price chart.
//!
//! This crate provides:
//! - Moving averages (SMA, EMA)
//! - Volatility envelopes (sample standard deviation, Bollinger Bands)
//! - Momentum (MACD line)
//! - Volume-weighted price (cumulative VWAP)
//! - [`IndicatorEngine`], which maps a set of [`IndicatorKind`]s onto a price series
//!
//! All outputs are aligned one-to-one with the input bars; points inside an
//! indicator's warm-up window are `None`.

pub mod engine;
pub mod guide;
pub mod momentum;
pub mod moving_average;
pub mod volatility;
pub mod volume;

pub use engine::{IndicatorEngine, IndicatorKind, IndicatorRequest, IndicatorSeries, IndicatorSet};
pub use momentum::Macd;
pub use moving_average::{ema_values, Ema, Sma};
pub use volatility::{BollingerBands, BollingerOutput, StdDev};
pub use volume::Vwap;
