//! CLI command implementations.

pub mod analyze;
pub mod common;
pub mod guide;
pub mod indicators;
pub mod live;
pub mod validate;
