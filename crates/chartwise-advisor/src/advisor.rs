//! Per-ticker generation calls that always yield a typed result.

use std::sync::Arc;

use tracing::{debug, warn};

use chartwise_core::traits::GenerationService;
use chartwise_core::types::{Attachment, GenerationRequest};

use crate::extract::{extract_json, Extraction};
use crate::prompts::{sentiment_prompt, technical_prompt, ChartContext};
use crate::recommendation::RecommendationResult;
use crate::sentiment::SentimentResult;

/// Runs the technical and sentiment prompts against a generation service.
///
/// Service errors and malformed output both end up as fallback results, so
/// callers can keep iterating over tickers.
#[derive(Clone)]
pub struct Advisor {
    service: Arc<dyn GenerationService>,
}

impl Advisor {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    /// Technical recommendation from the chart context and optional chart image.
    pub async fn recommend(
        &self,
        ticker: &str,
        context: &ChartContext,
        chart: Option<Attachment>,
    ) -> RecommendationResult {
        let mut request = GenerationRequest::text(technical_prompt(ticker, context));
        if let Some(chart) = chart {
            request = request.with_attachment(chart);
        }

        let extraction = self.run(ticker, "technical", &request).await;
        RecommendationResult::from_extraction(&extraction)
    }

    /// Market sentiment for a ticker.
    pub async fn sentiment(&self, ticker: &str) -> SentimentResult {
        let request = GenerationRequest::text(sentiment_prompt(ticker));
        let extraction = self.run(ticker, "sentiment", &request).await;
        SentimentResult::from_extraction(&extraction)
    }

    async fn run(&self, ticker: &str, kind: &str, request: &GenerationRequest) -> Extraction {
        match self.service.generate(request).await {
            Ok(raw) => {
                let extraction = extract_json(&raw);
                if extraction.is_fallback() {
                    warn!(ticker, kind, "Model output had no usable JSON, using fallback");
                } else {
                    debug!(ticker, kind, "Parsed model output");
                }
                extraction
            }
            Err(e) => {
                warn!(ticker, kind, service = self.service.name(), error = %e, "Generation call failed");
                Extraction::fallback(&e.to_string())
            }
        }
    }
}
