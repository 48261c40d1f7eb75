//! Indicator snapshot command implementation.

use anyhow::{bail, Result};
use chrono::Utc;

use chartwise_analysis::TickerSnapshot;
use chartwise_config::AppConfig;
use chartwise_data::{FetchMode, Fetcher};
use chartwise_indicators::IndicatorRequest;

use super::common;
use crate::cli::{IndicatorsArgs, OutputFormat};

pub async fn run(args: IndicatorsArgs, config: &AppConfig) -> Result<()> {
    let tickers = common::tickers(args.tickers.as_deref(), config)?;
    let (start, end) = common::date_range(args.start.as_deref(), args.end.as_deref(), config)?;
    let request = if args.indicators.is_empty() {
        IndicatorRequest::all()
    } else {
        common::indicators(&args.indicators, config)?
    };

    let source = common::data_source(config)?;
    let fetcher = Fetcher::new(source.as_ref(), config.market.trading_window()?);
    let outcome = fetcher
        .fetch_cycle(&tickers, FetchMode::Historical { start, end }, Utc::now())
        .await;

    for notice in &outcome.notices {
        eprintln!("{}", notice);
    }
    if outcome.loaded.is_empty() {
        bail!("No data loaded for any ticker");
    }

    let snapshots: Vec<TickerSnapshot> = outcome
        .loaded
        .iter()
        .map(|series| TickerSnapshot::compute(series, &request))
        .collect();

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshots)?),
        OutputFormat::Text => {
            for snap in &snapshots {
                println!("{} ({} bars)", snap.ticker, snap.bars);
                if let Some(close) = snap.last_close {
                    println!("  {:<16} {:>12.2}", "Last Close", close);
                }
                for reading in &snap.readings {
                    match reading.latest {
                        Some(v) => println!("  {:<16} {:>12.2}", reading.name, v),
                        None => println!("  {:<16} {:>12}", reading.name, "-"),
                    }
                }
                println!();
            }
        }
    }

    Ok(())
}
