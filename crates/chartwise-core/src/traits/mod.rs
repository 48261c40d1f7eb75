//! Core traits for the dashboard.

mod data_source;
mod generation;
mod indicator;

pub use data_source::DataSource;
pub use generation::GenerationService;
pub use indicator::{Indicator, MultiOutputIndicator, VolumeIndicator};
