//! Yahoo Finance chart API source.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::debug;

use chartwise_core::error::DataError;
use chartwise_core::traits::DataSource;
use chartwise_core::types::{Bar, PriceSeries, Timeframe};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Price history from the public Yahoo Finance chart endpoint.
pub struct YahooSource {
    client: Client,
    base_url: String,
    offset: FixedOffset,
}

impl YahooSource {
    /// Create a client; bar timestamps are normalized to `offset`.
    pub fn new(offset: FixedOffset) -> Result<Self, DataError> {
        Self::with_base_url(DEFAULT_BASE_URL, offset)
    }

    /// Create a client against a different host (mirrors, tests).
    pub fn with_base_url(base_url: &str, offset: FixedOffset) -> Result<Self, DataError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("Mozilla/5.0 (chartwise)"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DataError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            offset,
        })
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        params: &[(&str, String)],
    ) -> Result<PriceSeries, DataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| DataError::Request(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DataError::Request(e.to_string()))?;

        // Unknown symbols come back as 404 with a chart error body
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(symbol, "Chart endpoint reports unknown symbol");
            return Ok(PriceSeries::empty(symbol, timeframe));
        }
        if !status.is_success() {
            return Err(DataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_chart(&body, symbol, timeframe, self.offset)
    }
}

#[async_trait]
impl DataSource for YahooSource {
    async fn historical(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let period1 = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let period2 = end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();

        self.fetch_chart(
            symbol,
            timeframe,
            &[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", timeframe.as_code().to_string()),
                ("events", "history".to_string()),
            ],
        )
        .await
    }

    async fn intraday(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        self.fetch_chart(
            symbol,
            Timeframe::Minute1,
            &[
                ("range", "1d".to_string()),
                ("interval", Timeframe::Minute1.as_code().to_string()),
            ],
        )
        .await
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

/// Decode a chart response body. Bars missing any OHLC value are dropped.
pub fn parse_chart(
    body: &str,
    symbol: &str,
    timeframe: Timeframe,
    offset: FixedOffset,
) -> Result<PriceSeries, DataError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| DataError::Malformed(format!("failed to parse chart: {}", e)))?;

    if let Some(error) = response.chart.error {
        if error.code == "Not Found" {
            return Ok(PriceSeries::empty(symbol, timeframe));
        }
        return Err(DataError::Upstream {
            code: error.code,
            description: error.description,
        });
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty(symbol, timeframe));
    };
    let (Some(timestamps), Some(quote)) = (result.timestamp, result.indicators.quote.first())
    else {
        return Ok(PriceSeries::empty(symbol, timeframe));
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(time) = DateTime::from_timestamp(ts, 0) else {
            return Err(DataError::Malformed(format!("invalid timestamp: {}", ts)));
        };

        if let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
            quote.open.get(i),
            quote.high.get(i),
            quote.low.get(i),
            quote.close.get(i),
        ) {
            let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);
            bars.push(Bar::new(
                time.with_timezone(&offset),
                *open,
                *high,
                *low,
                *close,
                volume,
            ));
        }
    }

    Ok(PriceSeries::from_unsorted(symbol, timeframe, bars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartwise_core::types::IST_OFFSET_SECS;
    use chrono::Timelike;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(IST_OFFSET_SECS).unwrap()
    }

    #[test]
    fn test_parse_chart_converts_to_ist_and_skips_gaps() {
        // 1704167100 = 2024-01-02 03:45:00 UTC = 09:15 IST
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704167100, 1704167160, 1704167220],
                    "indicators": {"quote": [{
                        "open":   [100.0, null, 101.0],
                        "high":   [101.0, 101.5, 102.0],
                        "low":    [99.5, 100.0, 100.5],
                        "close":  [100.5, 101.0, 101.5],
                        "volume": [1200, 800, null]
                    }]}
                }],
                "error": null
            }
        }"#;

        let series = parse_chart(body, "RELIANCE.NS", Timeframe::Minute1, ist()).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.volumes(), vec![1200.0, 0.0]);
        let first = series.bars()[0].timestamp;
        assert_eq!((first.hour(), first.minute()), (9, 15));
    }

    #[test]
    fn test_parse_chart_not_found_is_empty() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

        let series = parse_chart(body, "GONE.NS", Timeframe::Daily, ist()).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_chart_other_error_is_err() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid interval"}}}"#;

        assert!(parse_chart(body, "TCS.NS", Timeframe::Daily, ist()).is_err());
    }

    #[test]
    fn test_parse_chart_without_timestamps_is_empty() {
        let body = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;

        let series = parse_chart(body, "TCS.NS", Timeframe::Minute1, ist()).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_chart_garbage_is_parse_error() {
        let err = parse_chart("<html>", "TCS.NS", Timeframe::Daily, ist()).unwrap_err();
        assert!(matches!(err, DataError::Malformed(_)));
    }
}
