//! Core types and traits for the chartwise dashboard.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, PriceSeries, Timeframe)
//! - The regional trading window used to gate live fetches
//! - Generation request types for the text/image model collaborator
//! - Core traits for indicators, data sources and generation services

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ChartwiseError, ChartwiseResult};
pub use traits::*;
pub use types::*;
