//! Prompt templates for the two per-ticker generation calls.

use crate::recommendation::Recommendation;
use crate::sentiment::Sentiment;

/// Justification categories the technical prompt asks for, in display order.
pub const JUSTIFICATION_CATEGORIES: [&str; 6] = [
    "1. Dominant Trend",
    "2. EMA/SMA Alignment",
    "3. Price vs Indicators",
    "4. Momentum & Volume",
    "5. Reversal / Risk Signals",
    "6. Mindset",
];

/// Latest readings handed to the technical prompt alongside (or instead of) a chart image.
#[derive(Debug, Clone, Default)]
pub struct ChartContext {
    pub last_close: Option<f64>,
    pub bars: usize,
    /// Indicator series name and latest value.
    pub indicators: Vec<(String, Option<f64>)>,
}

impl ChartContext {
    fn render(&self) -> String {
        let mut out = match self.last_close {
            Some(close) => format!("Last close: {:.2} ({} bars)\n", close, self.bars),
            None => "Last close: unavailable\n".to_string(),
        };
        for (name, value) in &self.indicators {
            match value {
                Some(v) => out.push_str(&format!("{}: {:.2}\n", name, v)),
                None => out.push_str(&format!("{}: not enough data\n", name)),
            }
        }
        out
    }
}

fn quoted_list(labels: impl IntoIterator<Item = &'static str>) -> String {
    labels
        .into_iter()
        .map(|l| format!("'{}'", l))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Technical-analysis prompt: six-category justification plus one recommendation.
pub fn technical_prompt(ticker: &str, context: &ChartContext) -> String {
    let options = quoted_list(Recommendation::ALL.iter().rev().map(|r| r.label()));
    let slash_options = Recommendation::ALL
        .iter()
        .rev()
        .map(|r| r.label())
        .collect::<Vec<_>>()
        .join(" / ");
    let numbered = JUSTIFICATION_CATEGORIES.join("\n");
    let keys = JUSTIFICATION_CATEGORIES
        .iter()
        .map(|c| format!("    \"{}\": \"...\"", c))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"You are a stock trader specializing in technical analysis at a top financial institution, explaining to a student who is new to markets.
Analyze the chart for {ticker} based on its candlesticks and the displayed technical indicators.

Latest readings:
{readings}
Provide a structured explanation, one point after the other, covering:
{numbered}

At the end, give a recommendation from one of these options ONLY:
[{options}].

Return JSON with:
{{
  "recommendation": "<{slash_options}>",
  "justification": {{
{keys}
  }}
}}
"#,
        ticker = ticker,
        readings = context.render(),
        numbered = numbered,
        options = options,
        slash_options = slash_options,
        keys = keys,
    )
}

/// Sentiment prompt: one classification plus a headline-style explanation.
pub fn sentiment_prompt(ticker: &str) -> String {
    let options = quoted_list(Sentiment::ALL.iter().map(|s| s.label()));

    format!(
        r#"You are analyzing the market sentiment for {ticker} (NSE/BSE).
Classify sentiment strictly as one of [{options}].
Justify with 2-3 news-style reasons (like headlines).

Return JSON:
{{
  "sentiment": "<Positive / Negative / Neutral>",
  "explanation": "<Why, explained like citing news headlines>"
}}
"#,
        ticker = ticker,
        options = options,
    )
}
