//! Technical recommendation contract.

use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::extract::Extraction;

/// Display color for a missing or unrecognized recommendation.
pub const NEUTRAL_GRAY: &str = "#cccccc";

/// Six-point recommendation scale, ordered from most bearish to most bullish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Recommendation {
    StrongSell,
    Sell,
    WeakSell,
    WeakBuy,
    Buy,
    StrongBuy,
}

impl Recommendation {
    /// Every value, bearish to bullish.
    pub const ALL: [Recommendation; 6] = [
        Recommendation::StrongSell,
        Recommendation::Sell,
        Recommendation::WeakSell,
        Recommendation::WeakBuy,
        Recommendation::Buy,
        Recommendation::StrongBuy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongSell => "Strong Sell",
            Recommendation::Sell => "Sell",
            Recommendation::WeakSell => "Weak Sell",
            Recommendation::WeakBuy => "Weak Buy",
            Recommendation::Buy => "Buy",
            Recommendation::StrongBuy => "Strong Buy",
        }
    }

    /// Hex display color; intensity follows distance from the middle of the scale.
    pub fn color(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "#00b050",
            Recommendation::Buy => "#92d050",
            Recommendation::WeakBuy => "#c6e0b4",
            Recommendation::WeakSell => "#f4b084",
            Recommendation::Sell => "#ff6666",
            Recommendation::StrongSell => "#c00000",
        }
    }

    pub fn is_buy(&self) -> bool {
        *self >= Recommendation::WeakBuy
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Recommendation {
    type Err = String;

    /// Exact, case-sensitive label match; `"strong buy"` is not a label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Recommendation::ALL
            .into_iter()
            .find(|r| r.label() == s)
            .ok_or_else(|| format!("Unknown recommendation: {}", s))
    }
}

/// The recommendation value as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationCall {
    Known(Recommendation),
    /// A value outside the scale; kept for display, never rejected.
    Unrecognized(String),
    /// No value was returned (or extraction failed).
    Missing,
}

impl RecommendationCall {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => RecommendationCall::Missing,
            Some(Value::String(s)) => s
                .parse()
                .map(RecommendationCall::Known)
                .unwrap_or_else(|_| RecommendationCall::Unrecognized(s.clone())),
            Some(other) => RecommendationCall::Unrecognized(other.to_string()),
        }
    }

    /// Display text; `N/A` when missing.
    pub fn label(&self) -> &str {
        match self {
            RecommendationCall::Known(r) => r.label(),
            RecommendationCall::Unrecognized(raw) => raw,
            RecommendationCall::Missing => "N/A",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RecommendationCall::Known(r) => r.color(),
            _ => NEUTRAL_GRAY,
        }
    }

    pub fn known(&self) -> Option<Recommendation> {
        match self {
            RecommendationCall::Known(r) => Some(*r),
            _ => None,
        }
    }
}

impl fmt::Display for RecommendationCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RecommendationCall {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Per-category explanation for a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Justification {
    /// Category label to explanation, in the order the model returned them.
    Structured(Vec<(String, String)>),
    /// The model returned something other than an object.
    Text(String),
    #[default]
    Empty,
}

impl Justification {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Justification::Empty,
            Some(Value::Object(map)) if map.is_empty() => Justification::Empty,
            Some(Value::Object(map)) => Justification::Structured(
                map.iter()
                    .map(|(k, v)| (k.clone(), value_text(v)))
                    .collect(),
            ),
            Some(other) => Justification::Text(value_text(other)),
        }
    }

    /// Explanation for one category label.
    pub fn get(&self, category: &str) -> Option<&str> {
        match self {
            Justification::Structured(entries) => entries
                .iter()
                .find(|(k, _)| k == category)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// One `**label:** text` line per category; plain text otherwise.
    pub fn format_markdown(&self) -> String {
        match self {
            Justification::Structured(entries) => entries
                .iter()
                .map(|(k, v)| format!("**{}:** {}", k, v))
                .collect::<Vec<_>>()
                .join("\n"),
            Justification::Text(text) => text.clone(),
            Justification::Empty => String::new(),
        }
    }
}

impl Serialize for Justification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Justification::Structured(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Justification::Text(text) => serializer.serialize_str(text),
            Justification::Empty => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

/// Strings render bare, everything else as compact JSON.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Typed technical-analysis result for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub recommendation: RecommendationCall,
    pub justification: Justification,
    /// Fallback snippet when the model output could not be parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecommendationResult {
    pub fn from_extraction(extraction: &Extraction) -> Self {
        Self {
            recommendation: RecommendationCall::from_value(extraction.get("recommendation")),
            justification: Justification::from_value(extraction.get("justification")),
            error: extraction.snippet().map(str::to_string),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}
