//! Analysis report generation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use chartwise_data::FetchNotice;

use crate::engine::TickerAnalysis;

/// One row of the overall summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Stock")]
    pub stock: String,
    #[serde(rename = "Recommendation")]
    pub recommendation: String,
    /// Hex display color for the recommendation
    #[serde(skip)]
    pub color: &'static str,
}

/// Result of one analysis cycle.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    /// Human-readable description of the fetch mode
    pub mode: String,
    pub fetched_at: Option<DateTime<Utc>>,
    /// Per-ticker results, in ticker order
    pub tickers: Vec<TickerAnalysis>,
    /// Skipped tickers and other fetch notices
    pub notices: Vec<FetchNotice>,
}

impl AnalysisReport {
    /// Summary table rows, in ticker order.
    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        self.tickers
            .iter()
            .map(|t| SummaryRow {
                stock: t.ticker().to_string(),
                recommendation: t.technical.recommendation.label().to_string(),
                color: t.technical.recommendation.color(),
            })
            .collect()
    }

    pub fn get(&self, ticker: &str) -> Option<&TickerAnalysis> {
        self.tickers.iter().find(|t| t.ticker() == ticker)
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("               OVERALL STRUCTURED RECOMMENDATIONS           \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Mode:                {}\n", self.mode));
        if let Some(at) = self.fetched_at {
            s.push_str(&format!("  Data fetched:        {}\n", at.format("%Y-%m-%d %H:%M:%S UTC")));
        }
        s.push('\n');

        if !self.notices.is_empty() {
            s.push_str("NOTICES\n");
            s.push_str("───────────────────────────────────────────────────────────\n");
            for notice in &self.notices {
                s.push_str(&format!("  ! {}\n", notice));
            }
            s.push('\n');
        }

        s.push_str("SUMMARY\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  {:<20} {}\n", "Stock", "Recommendation"));
        for row in self.summary_rows() {
            s.push_str(&format!("  {:<20} {}\n", row.stock, row.recommendation));
        }
        s.push('\n');

        for analysis in &self.tickers {
            let snap = &analysis.snapshot;
            s.push_str(&format!("ANALYSIS FOR {}\n", snap.ticker));
            s.push_str("───────────────────────────────────────────────────────────\n");
            s.push_str(&format!("  Bars:                {} ({})\n", snap.bars, snap.timeframe));
            if let Some(close) = snap.last_close {
                s.push_str(&format!("  Last Close:          {:.2}\n", close));
            }
            for reading in &snap.readings {
                let value = reading
                    .latest
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| "-".to_string());
                s.push_str(&format!("  {:<20} {}\n", format!("{}:", reading.name), value));
            }
            s.push_str(&format!(
                "  Final Call:          {}\n",
                analysis.technical.recommendation
            ));

            let justification = analysis.technical.justification.format_markdown();
            if !justification.is_empty() {
                s.push_str("\n  Technical Justification\n");
                for line in justification.lines() {
                    s.push_str(&format!("    {}\n", line));
                }
            }
            if let Some(error) = &analysis.technical.error {
                s.push_str(&format!("    {}\n", error));
            }

            if let Some(sentiment) = &analysis.sentiment {
                s.push_str(&format!("\n  Sentiment:           {}\n", sentiment.sentiment));
                if !sentiment.explanation.is_empty() {
                    s.push_str(&format!("    {}\n", sentiment.explanation));
                }
                if let Some(error) = &sentiment.error {
                    s.push_str(&format!("    {}\n", error));
                }
            }
            s.push('\n');
        }

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
