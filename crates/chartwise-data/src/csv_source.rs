//! CSV data source.
//!
//! Reads files in the layout common finance exporters produce
//! (`Date,Open,High,Low,Close,Adj Close,Volume`), one file per ticker.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use chartwise_core::error::DataError;
use chartwise_core::traits::DataSource;
use chartwise_core::types::{Bar, PriceSeries, Timeframe};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Date",
        alias = "Datetime",
        alias = "date",
        alias = "timestamp",
        alias = "Timestamp"
    )]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
}

/// Directory of per-ticker CSV files.
pub struct CsvDataSource {
    dir: PathBuf,
    offset: FixedOffset,
}

impl CsvDataSource {
    /// Create a source over `dir`; timestamps are normalized to `offset`.
    pub fn new(dir: impl Into<PathBuf>, offset: FixedOffset) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::File {
                path: dir.display().to_string(),
                message: "not a directory".into(),
            });
        }
        Ok(Self { dir, offset })
    }

    /// First existing file among the candidates for a symbol.
    fn find_file(&self, symbol: &str, suffixes: &[&str]) -> Option<PathBuf> {
        let lower = symbol.to_lowercase();
        suffixes
            .iter()
            .flat_map(|suffix| {
                [
                    self.dir.join(format!("{}{}.csv", symbol, suffix)),
                    self.dir.join(format!("{}{}.csv", lower, suffix)),
                ]
            })
            .find(|path| path.is_file())
    }

    async fn load(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        suffixes: &[&str],
    ) -> Result<PriceSeries, DataError> {
        match self.find_file(symbol, suffixes) {
            Some(path) => {
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| DataError::File {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })?;
                parse_csv(&text, symbol, timeframe, self.offset)
            }
            None => {
                debug!(symbol, dir = %self.dir.display(), "No CSV file for symbol");
                Ok(PriceSeries::empty(symbol, timeframe))
            }
        }
    }
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn historical(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let series = self.load(symbol, timeframe, &["", "_daily"]).await?;
        let bars = series
            .iter()
            .filter(|b| {
                let day = b.timestamp.date_naive();
                day >= start && day < end
            })
            .copied()
            .collect();
        PriceSeries::new(symbol, timeframe, bars)
    }

    async fn intraday(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let series = self.load(symbol, Timeframe::Minute1, &["_1m", ""]).await?;
        let Some(last_day) = series.last().map(|b| b.timestamp.date_naive()) else {
            return Ok(series);
        };
        let bars = series
            .iter()
            .filter(|b| b.timestamp.date_naive() == last_day)
            .copied()
            .collect();
        PriceSeries::new(symbol, Timeframe::Minute1, bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Load one CSV file as a price series.
pub fn load_file(
    path: &Path,
    symbol: &str,
    timeframe: Timeframe,
    offset: FixedOffset,
) -> Result<PriceSeries, DataError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| DataError::File {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })?;
    parse_csv(&text, symbol, timeframe, offset)
}

/// Parse CSV text into a series ordered by time, timestamps in `offset`.
pub fn parse_csv(
    text: &str,
    symbol: &str,
    timeframe: Timeframe,
    offset: FixedOffset,
) -> Result<PriceSeries, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut bars = Vec::new();

    for result in reader.deserialize() {
        let record: CsvRecord = result.map_err(|e| DataError::Malformed(e.to_string()))?;
        let timestamp = parse_timestamp(&record.date)?.with_timezone(&offset);

        bars.push(Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    Ok(PriceSeries::from_unsorted(symbol, timeframe, bars))
}

/// Parse various timestamp formats. Values without an offset are taken as UTC.
fn parse_timestamp(date_str: &str) -> Result<DateTime<FixedOffset>, DataError> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt);
    }
    for format in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Ok(dt);
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().fixed_offset());
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(chrono::NaiveTime::MIN).and_utc().fixed_offset());
        }
    }

    // Unix timestamp, milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        let dt = if ts > 10_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        };
        if let Some(dt) = dt {
            return Ok(dt.fixed_offset());
        }
    }

    Err(DataError::Malformed(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartwise_core::types::IST_OFFSET_SECS;
    use chrono::{TimeZone, Timelike, Utc};
    use std::io::Write;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(IST_OFFSET_SECS).unwrap()
    }

    const DAILY: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-03,102,103,101,102.5,102.5,1200
2024-01-02,100,101,99,100.5,100.5,1000
2024-01-04,103,104,102,103.5,103.5,1500
";

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2024-01-15").is_ok());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert!(parse_timestamp("2024-01-15 09:15:00+05:30").is_ok());
        assert!(parse_timestamp("1705312800000").is_ok()); // Unix ms
        assert!(parse_timestamp("1705312800").is_ok()); // Unix sec
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_naive_timestamps_are_utc() {
        let dt = parse_timestamp("2024-01-15 03:45:00").unwrap().with_timezone(&ist());
        assert_eq!((dt.hour(), dt.minute()), (9, 15));
    }

    #[test]
    fn test_parse_csv_sorts_and_ignores_adj_close() {
        let series = parse_csv(DAILY, "TCS.NS", Timeframe::Daily, ist()).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![100.5, 102.5, 103.5]);
        assert_eq!(series.bars()[0].timestamp.offset(), &ist());
        assert_eq!(
            series.bars()[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_historical_filters_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("TCS.NS.csv")).unwrap();
        file.write_all(DAILY.as_bytes()).unwrap();

        let source = CsvDataSource::new(dir.path(), ist()).unwrap();
        let series = source
            .historical(
                "TCS.NS",
                Timeframe::Daily,
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(series.closes(), vec![102.5]);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_series() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDataSource::new(dir.path(), ist()).unwrap();

        let series = source.intraday("NOPE.NS").await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_intraday_keeps_latest_day() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "\
Datetime,Open,High,Low,Close,Volume
2024-01-02 09:15:00+05:30,1,1,1,1,10
2024-01-03 09:15:00+05:30,2,2,2,2,10
2024-01-03 09:16:00+05:30,3,3,3,3,10
";
        std::fs::write(dir.path().join("infy.ns_1m.csv"), csv).unwrap();

        let source = CsvDataSource::new(dir.path(), ist()).unwrap();
        let series = source.intraday("INFY.NS").await.unwrap();

        assert_eq!(series.timeframe(), Timeframe::Minute1);
        assert_eq!(series.closes(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_missing_directory_rejected() {
        assert!(CsvDataSource::new("/definitely/not/here", ist()).is_err());
    }
}
