//! Core data types for the dashboard.

mod generation;
mod ohlcv;
mod session;
mod timeframe;

pub use generation::{Attachment, GenerationRequest};
pub use ohlcv::{Bar, PriceSeries};
pub use session::{TradingWindow, IST_OFFSET_SECS};
pub use timeframe::Timeframe;
