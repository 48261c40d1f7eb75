//! One fetch cycle over a list of tickers.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use chartwise_core::traits::DataSource;
use chartwise_core::types::{PriceSeries, Timeframe, TradingWindow};

/// What to fetch for each ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Daily bars in `[start, end)`.
    Historical { start: NaiveDate, end: NaiveDate },
    /// Latest trading day at 1-minute granularity, only inside the trading window.
    LiveIntraday,
}

/// Why a ticker (or the whole cycle) produced no data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum NoticeKind {
    /// The source answered with no bars.
    NoData,
    /// Live mode requested outside the trading window.
    MarketClosed { open: String, close: String },
    /// The source failed; the message is shown inline.
    Failed(String),
}

/// A non-fatal, user-facing message produced while fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchNotice {
    /// Ticker the notice is about; `None` when it concerns the whole cycle
    pub ticker: Option<String>,
    pub kind: NoticeKind,
}

impl fmt::Display for FetchNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ticker = self.ticker.as_deref().unwrap_or("all tickers");
        match &self.kind {
            NoticeKind::NoData => write!(f, "No data found for {}.", ticker),
            NoticeKind::MarketClosed { open, close } => write!(
                f,
                "Market closed. Live mode only works between {} and {}.",
                open, close
            ),
            NoticeKind::Failed(reason) => write!(f, "Failed to fetch {}: {}", ticker, reason),
        }
    }
}

/// Result of a fetch cycle: the series that loaded plus every skip notice.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub loaded: Vec<PriceSeries>,
    pub notices: Vec<FetchNotice>,
}

impl FetchOutcome {
    /// Tickers that loaded, in request order.
    pub fn loaded_tickers(&self) -> Vec<&str> {
        self.loaded.iter().map(|s| s.symbol()).collect()
    }
}

/// Runs fetch cycles against one data source.
pub struct Fetcher<'a> {
    source: &'a dyn DataSource,
    window: TradingWindow,
}

impl<'a> Fetcher<'a> {
    /// Create a fetcher; `window` gates live intraday requests.
    pub fn new(source: &'a dyn DataSource, window: TradingWindow) -> Self {
        Self { source, window }
    }

    /// Fetch every ticker in order. Empty results and failures become notices;
    /// the cycle never aborts part-way.
    pub async fn fetch_cycle(
        &self,
        tickers: &[String],
        mode: FetchMode,
        now: DateTime<Utc>,
    ) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();

        if mode == FetchMode::LiveIntraday && !self.window.contains(&now) {
            let notice = FetchNotice {
                ticker: None,
                kind: NoticeKind::MarketClosed {
                    open: format!("{} {}", self.window.open().format("%H:%M"), self.window.offset()),
                    close: format!("{} {}", self.window.close().format("%H:%M"), self.window.offset()),
                },
            };
            info!("{}", notice);
            outcome.notices.push(notice);
            return outcome;
        }

        for ticker in tickers {
            let result = match mode {
                FetchMode::Historical { start, end } => {
                    self.source
                        .historical(ticker, Timeframe::Daily, start, end)
                        .await
                }
                FetchMode::LiveIntraday => self.source.intraday(ticker).await,
            };

            let kind = match result {
                Ok(series) if !series.is_empty() => {
                    outcome.loaded.push(series);
                    continue;
                }
                Ok(_) => NoticeKind::NoData,
                Err(e) => NoticeKind::Failed(e.to_string()),
            };

            let notice = FetchNotice {
                ticker: Some(ticker.clone()),
                kind,
            };
            warn!(source = self.source.name(), "{}", notice);
            outcome.notices.push(notice);
        }

        if !outcome.loaded.is_empty() {
            info!(
                "Stock data loaded successfully for: {}",
                outcome.loaded_tickers().join(", ")
            );
        }

        outcome
    }
}
