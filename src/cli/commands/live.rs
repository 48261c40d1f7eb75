//! Live intraday command implementation.

use anyhow::Result;
use chrono::Utc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

use chartwise_analysis::{AnalysisConfig, AnalysisEngine, AnalysisReport};
use chartwise_config::AppConfig;
use chartwise_core::traits::DataSource;
use chartwise_core::types::TradingWindow;
use chartwise_data::{FetchMode, Fetcher, SeriesCache};
use chartwise_monitor::{Dashboard, DashboardState};

use super::common;
use crate::cli::LiveArgs;

/// Messages kept for the dashboard log panel.
const MAX_MESSAGES: usize = 20;

pub async fn run(args: LiveArgs, config: &AppConfig) -> Result<()> {
    let tickers = common::tickers(args.tickers.as_deref(), config)?;
    let analysis = AnalysisConfig {
        indicators: common::indicators(&args.indicators, config)?,
        sentiment: config.dashboard.sentiment && !args.no_sentiment,
    };
    let window = config.market.trading_window()?;
    let source = common::data_source(config)?;
    let engine = AnalysisEngine::new(analysis, common::advisor(config)?);
    let refresh = Duration::from_secs(config.dashboard.refresh_secs);

    info!(
        "Live mode for {} every {}s",
        tickers.join(", "),
        refresh.as_secs()
    );

    let (tx, rx) = watch::channel(DashboardState {
        title: "Live Intraday".to_string(),
        ..Default::default()
    });

    let worker = tokio::spawn(live_loop(
        source, window, engine, tickers, refresh, args.cycles, tx,
    ));

    if args.dashboard {
        tokio::task::spawn_blocking(move || Dashboard::new(250).run(|| rx.borrow().clone()))
            .await??;
        worker.abort();
    } else {
        let mut rx = rx;
        let mut last_printed = None;
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update();
            match &state.report {
                Some(report) if last_printed != Some(report.generated_at) => {
                    println!("{}", report.summary());
                    last_printed = Some(report.generated_at);
                }
                _ => {
                    if let Some(message) = state.messages.last() {
                        println!("{}", message);
                    }
                }
            }
        }
        worker.await?;
    }

    Ok(())
}

/// Fetch, analyze and publish on every tick. The cache is replaced wholesale each cycle.
async fn live_loop(
    source: Box<dyn DataSource>,
    window: TradingWindow,
    engine: AnalysisEngine,
    tickers: Vec<String>,
    refresh: Duration,
    cycles: Option<u32>,
    tx: watch::Sender<DashboardState>,
) {
    let fetcher = Fetcher::new(source.as_ref(), window);
    let mut cache = SeriesCache::new();
    let mut messages: Vec<String> = Vec::new();
    let mut interval = tokio::time::interval(refresh);
    let mut cycle = 0u32;

    loop {
        interval.tick().await;
        cycle += 1;

        let now = Utc::now();
        let outcome = fetcher
            .fetch_cycle(&tickers, FetchMode::LiveIntraday, now)
            .await;

        for notice in &outcome.notices {
            messages.push(format!("{} {}", now.format("%H:%M:%S"), notice));
        }

        // A closed market leaves the previous cycle's data on screen
        let report: Option<AnalysisReport> = if outcome.loaded.is_empty() {
            if cache.is_empty() {
                warn!("No live data available yet");
            }
            None
        } else {
            cache.replace(outcome.loaded, now);
            Some(engine.run("Live Intraday", &cache, outcome.notices).await)
        };

        if messages.len() > MAX_MESSAGES {
            messages.drain(..messages.len() - MAX_MESSAGES);
        }

        tx.send_modify(|state| {
            state.title = format!("Live Intraday | cycle {}", cycle);
            state.messages = messages.clone();
            if let Some(report) = report {
                state.report = Some(report);
            }
        });

        if cycles.is_some_and(|max| cycle >= max) {
            info!("Completed {} live cycles", cycle);
            return;
        }
    }
}
