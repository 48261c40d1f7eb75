//! Logging setup and the terminal dashboard.

mod dashboard;
mod logging;

pub use dashboard::{hex_color, Dashboard, DashboardState, SUMMARY_TAB};
pub use logging::setup_logging;
