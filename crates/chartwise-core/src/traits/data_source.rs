//! Data source trait definitions.

use crate::error::DataError;
use crate::types::{PriceSeries, Timeframe};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for price-history providers.
///
/// An empty series is a valid answer (unknown ticker, holiday, no trades
/// yet); callers decide whether to skip it. Errors are reserved for
/// transport and decoding failures.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch historical bars.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `timeframe` - The bar timeframe
    /// * `start` - First calendar day, inclusive
    /// * `end` - Last calendar day, exclusive
    ///
    /// # Returns
    /// A series ordered from oldest to newest
    async fn historical(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError>;

    /// Fetch the latest trading day at 1-minute granularity.
    async fn intraday(&self, symbol: &str) -> Result<PriceSeries, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
