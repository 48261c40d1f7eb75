//! Wiring shared by the commands.

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use chartwise_advisor::{Advisor, GeminiClient, GeminiConfig};
use chartwise_config::{AppConfig, DataSourceKind};
use chartwise_core::traits::DataSource;
use chartwise_data::{parse_tickers, CsvDataSource, YahooSource};
use chartwise_indicators::{IndicatorKind, IndicatorRequest};

/// Tickers from the command line, or the configured list.
pub fn tickers(arg: Option<&str>, config: &AppConfig) -> Result<Vec<String>> {
    let tickers = match arg {
        Some(input) => parse_tickers(input),
        None => parse_tickers(&config.dashboard.tickers.join(",")),
    };
    if tickers.is_empty() {
        bail!("Please enter at least one stock ticker");
    }
    Ok(tickers)
}

/// Indicators from the command line, or the configured selection.
pub fn indicators(names: &[String], config: &AppConfig) -> Result<IndicatorRequest> {
    if names.is_empty() {
        return Ok(config.dashboard.indicator_request());
    }
    for name in names {
        if let Err(e) = name.parse::<IndicatorKind>() {
            warn!(indicator = %name, "Ignoring indicator: {}", e);
        }
    }
    Ok(IndicatorRequest::from_names(names))
}

/// Historical range; the end defaults to today and the start to `history_days` earlier.
pub fn date_range(
    start: Option<&str>,
    end: Option<&str>,
    config: &AppConfig,
) -> Result<(NaiveDate, NaiveDate)> {
    let end = match end {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    let start = match start {
        Some(s) => parse_date(s)?,
        None => end - Duration::days(i64::from(config.dashboard.history_days)),
    };
    if start >= end {
        bail!("Start date {} must be before end date {}", start, end);
    }
    Ok((start, end))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid date '{}'", s))
}

/// Price-data source selected by `data.source`.
pub fn data_source(config: &AppConfig) -> Result<Box<dyn DataSource>> {
    let offset = config.market.offset()?;
    let source: Box<dyn DataSource> = match config.data.source {
        DataSourceKind::Yahoo => Box::new(YahooSource::new(offset)?),
        DataSourceKind::Csv => {
            let dir = config
                .data
                .csv_dir
                .as_deref()
                .context("data.csv_dir is not set")?;
            Box::new(CsvDataSource::new(dir, offset)?)
        }
    };
    info!(source = source.name(), "Data source ready");
    Ok(source)
}

/// Advisor backed by Gemini; the API key comes from the configured environment variable.
pub fn advisor(config: &AppConfig) -> Result<Advisor> {
    let gemini = GeminiConfig::from_env(&config.gemini.api_key_env)?
        .with_model(&config.gemini.model)
        .with_base_url(&config.gemini.base_url);
    let client = GeminiClient::new(gemini)?;
    info!(model = client.model(), "Generation service ready");
    Ok(Advisor::new(Arc::new(client)))
}
