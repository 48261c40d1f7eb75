//! Analysis engine.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::info;

use chartwise_advisor::{Advisor, ChartContext, RecommendationResult, SentimentResult};
use chartwise_core::types::{PriceSeries, Timeframe};
use chartwise_data::{FetchNotice, SeriesCache};
use chartwise_indicators::{IndicatorEngine, IndicatorRequest, IndicatorSet};

use crate::report::AnalysisReport;

/// Analysis configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisConfig {
    /// Indicators overlaid on every chart
    pub indicators: IndicatorRequest,
    /// Also run the sentiment call per ticker
    pub sentiment: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorRequest::from_names(["20-Day SMA", "50-Day SMA"]),
            sentiment: true,
        }
    }
}

/// Latest value of one derived series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorReading {
    pub name: String,
    pub latest: Option<f64>,
}

/// Indicators and latest readings for one series, without any generation call.
#[derive(Debug, Clone, Serialize)]
pub struct TickerSnapshot {
    pub ticker: String,
    pub timeframe: Timeframe,
    pub bars: usize,
    pub first: Option<DateTime<FixedOffset>>,
    pub last: Option<DateTime<FixedOffset>>,
    pub last_close: Option<f64>,
    pub readings: Vec<IndicatorReading>,
    /// Closing prices, oldest first
    #[serde(skip)]
    pub closes: Vec<f64>,
    #[serde(skip)]
    pub indicators: IndicatorSet,
}

impl TickerSnapshot {
    /// Compute the requested indicators over `series`.
    pub fn compute(series: &PriceSeries, request: &IndicatorRequest) -> Self {
        let indicators = IndicatorEngine::new().compute(series, request);
        let readings = indicators
            .latest_values()
            .into_iter()
            .map(|(name, latest)| IndicatorReading {
                name: name.to_string(),
                latest,
            })
            .collect();

        Self {
            ticker: series.symbol().to_string(),
            timeframe: series.timeframe(),
            bars: series.len(),
            first: series.bars().first().map(|b| b.timestamp),
            last: series.last().map(|b| b.timestamp),
            last_close: series.last().map(|b| b.close),
            readings,
            closes: series.closes(),
            indicators,
        }
    }

    /// Prompt context built from the latest readings.
    pub fn chart_context(&self) -> ChartContext {
        ChartContext {
            last_close: self.last_close,
            bars: self.bars,
            indicators: self
                .readings
                .iter()
                .map(|r| (r.name.clone(), r.latest))
                .collect(),
        }
    }
}

/// Full analysis of one ticker.
#[derive(Debug, Clone, Serialize)]
pub struct TickerAnalysis {
    #[serde(flatten)]
    pub snapshot: TickerSnapshot,
    pub technical: RecommendationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentResult>,
}

impl TickerAnalysis {
    pub fn ticker(&self) -> &str {
        &self.snapshot.ticker
    }
}

/// Runs the per-ticker cycle over every cached series.
pub struct AnalysisEngine {
    config: AnalysisConfig,
    advisor: Advisor,
}

impl AnalysisEngine {
    /// Create a new analysis engine.
    pub fn new(config: AnalysisConfig, advisor: Advisor) -> Self {
        Self { config, advisor }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one series: indicators, then the technical and sentiment calls.
    pub async fn analyze(&self, series: &PriceSeries) -> TickerAnalysis {
        let snapshot = TickerSnapshot::compute(series, &self.config.indicators);

        let technical = self
            .advisor
            .recommend(&snapshot.ticker, &snapshot.chart_context(), None)
            .await;

        let sentiment = if self.config.sentiment {
            Some(self.advisor.sentiment(&snapshot.ticker).await)
        } else {
            None
        };

        info!(
            ticker = %snapshot.ticker,
            recommendation = %technical.recommendation,
            "Ticker analyzed"
        );

        TickerAnalysis {
            snapshot,
            technical,
            sentiment,
        }
    }

    /// Analyze every cached series, one at a time in cache order.
    pub async fn run(
        &self,
        mode: impl Into<String>,
        cache: &SeriesCache,
        notices: Vec<FetchNotice>,
    ) -> AnalysisReport {
        let mut tickers = Vec::with_capacity(cache.len());
        for series in cache.iter() {
            tickers.push(self.analyze(series).await);
        }

        AnalysisReport {
            generated_at: Utc::now(),
            mode: mode.into(),
            fetched_at: cache.fetched_at(),
            tickers,
            notices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chartwise_advisor::Recommendation;
    use chartwise_core::error::GenerationError;
    use chartwise_core::traits::GenerationService;
    use chartwise_core::types::{Bar, GenerationRequest};
    use chrono::{Duration, TimeZone};
    use std::sync::{Arc, Mutex};

    /// Answers the technical prompt per ticker; sentiment always neutral.
    struct PerTickerService {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GenerationService for PerTickerService {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            if request.prompt.contains("market sentiment") {
                return Ok(r#"{"sentiment": "Neutral", "explanation": "Quiet week"}"#.into());
            }
            if request.prompt.contains("BROKEN.NS") {
                return Err(GenerationError::Connection("timed out".into()));
            }
            if request.prompt.contains("TCS.NS") {
                return Ok("```json\n{\"recommendation\": \"Strong Buy\", \"justification\": {}}\n```".into());
            }
            Ok("No opinion today.".into())
        }

        fn name(&self) -> &str {
            "per-ticker"
        }
    }

    fn series(symbol: &str, n: usize) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 3, 45, 0).unwrap().fixed_offset();
        let bars = (0..n)
            .map(|i| {
                let c = 100.0 + i as f64;
                Bar::new(start + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 1000.0)
            })
            .collect();
        PriceSeries::new(symbol, Timeframe::Daily, bars).unwrap()
    }

    fn engine() -> (AnalysisEngine, Arc<PerTickerService>) {
        let service = Arc::new(PerTickerService {
            prompts: Mutex::new(Vec::new()),
        });
        let engine = AnalysisEngine::new(AnalysisConfig::default(), Advisor::new(service.clone()));
        (engine, service)
    }

    #[test]
    fn test_snapshot_readings() {
        let snapshot = TickerSnapshot::compute(&series("TCS.NS", 30), &AnalysisConfig::default().indicators);

        assert_eq!(snapshot.bars, 30);
        assert_eq!(snapshot.last_close, Some(129.0));
        let names: Vec<_> = snapshot.readings.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["SMA (20)", "SMA (50)"]);
        // mean of 110..=129
        assert!((snapshot.readings[0].latest.unwrap() - 119.5).abs() < 1e-9);
        assert_eq!(snapshot.readings[1].latest, None);
    }

    #[tokio::test]
    async fn test_run_keeps_cache_order_and_survives_failures() {
        let (engine, service) = engine();
        let mut cache = SeriesCache::new();
        cache.replace(
            vec![series("TCS.NS", 30), series("BROKEN.NS", 30), series("INFY.NS", 30)],
            Utc::now(),
        );

        let report = engine.run("Historical", &cache, Vec::new()).await;

        let tickers: Vec<_> = report.tickers.iter().map(|t| t.ticker()).collect();
        assert_eq!(tickers, vec!["TCS.NS", "BROKEN.NS", "INFY.NS"]);

        assert_eq!(
            report.tickers[0].technical.recommendation.known(),
            Some(Recommendation::StrongBuy)
        );
        assert_eq!(report.tickers[1].technical.recommendation.label(), "N/A");
        assert!(report.tickers[1].technical.is_fallback());
        assert_eq!(report.tickers[2].technical.recommendation.label(), "N/A");

        // two calls per ticker
        assert_eq!(service.prompts.lock().unwrap().len(), 6);
        assert!(service.prompts.lock().unwrap()[0].contains("SMA (20): 119.50"));
    }

    #[tokio::test]
    async fn test_repeated_ticker_analyzed_once() {
        let (engine, service) = engine();
        let tickers = chartwise_data::parse_tickers("TCS.NS, tcs.ns");
        let mut cache = SeriesCache::new();
        cache.replace(tickers.iter().map(|t| series(t, 30)).collect(), Utc::now());

        let report = engine.run("Historical", &cache, Vec::new()).await;

        assert_eq!(report.tickers.len(), 1);
        assert_eq!(report.tickers[0].ticker(), "TCS.NS");
        assert_eq!(service.prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_sentiment_can_be_disabled() {
        let service = Arc::new(PerTickerService {
            prompts: Mutex::new(Vec::new()),
        });
        let config = AnalysisConfig {
            sentiment: false,
            ..AnalysisConfig::default()
        };
        let engine = AnalysisEngine::new(config, Advisor::new(service.clone()));

        let analysis = engine.analyze(&series("TCS.NS", 5)).await;

        assert!(analysis.sentiment.is_none());
        assert_eq!(service.prompts.lock().unwrap().len(), 1);
    }
}
