//! Per-ticker analysis cycle.

mod engine;
mod report;

pub use engine::{AnalysisConfig, AnalysisEngine, IndicatorReading, TickerAnalysis, TickerSnapshot};
pub use report::{AnalysisReport, SummaryRow};
