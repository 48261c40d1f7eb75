//! Historical analysis command implementation.

use anyhow::{bail, Result};
use chrono::Utc;
use tracing::info;

use chartwise_analysis::{AnalysisConfig, AnalysisEngine, AnalysisReport};
use chartwise_config::AppConfig;
use chartwise_data::{FetchMode, Fetcher, SeriesCache};
use chartwise_monitor::{Dashboard, DashboardState};

use super::common;
use crate::cli::{AnalyzeArgs, OutputFormat};

pub async fn run(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let tickers = common::tickers(args.tickers.as_deref(), config)?;
    let (start, end) = common::date_range(args.start.as_deref(), args.end.as_deref(), config)?;
    let analysis = AnalysisConfig {
        indicators: common::indicators(&args.indicators, config)?,
        sentiment: config.dashboard.sentiment && !args.no_sentiment,
    };
    info!("Analyzing {} from {} to {}", tickers.join(", "), start, end);

    let source = common::data_source(config)?;
    let fetcher = Fetcher::new(source.as_ref(), config.market.trading_window()?);
    let now = Utc::now();
    let outcome = fetcher
        .fetch_cycle(&tickers, FetchMode::Historical { start, end }, now)
        .await;

    if outcome.loaded.is_empty() {
        for notice in &outcome.notices {
            eprintln!("{}", notice);
        }
        bail!("No data loaded for any ticker");
    }

    let mut cache = SeriesCache::new();
    cache.replace(outcome.loaded, now);

    let engine = AnalysisEngine::new(analysis, common::advisor(config)?);
    let report = engine.run("Historical", &cache, outcome.notices).await;

    // Save if requested
    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)?;
        info!("Report saved to {:?}", save_path);
    }

    if args.dashboard {
        return show(report).await;
    }

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    Ok(())
}

/// Show a finished report until the user quits.
async fn show(report: AnalysisReport) -> Result<()> {
    let state = DashboardState {
        title: format!("Historical | {} tickers", report.tickers.len()),
        messages: report.notices.iter().map(|n| n.to_string()).collect(),
        report: Some(report),
    };

    tokio::task::spawn_blocking(move || Dashboard::new(250).run(|| state.clone())).await??;
    Ok(())
}
