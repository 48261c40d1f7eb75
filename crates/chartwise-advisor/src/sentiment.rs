//! Market sentiment contract.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::extract::Extraction;
use crate::recommendation::value_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    /// Hex border color for the sentiment panel.
    pub fn border_color(&self) -> &'static str {
        match self {
            Sentiment::Positive => "#28a745",
            Sentiment::Negative => "#dc3545",
            Sentiment::Neutral => "#6c757d",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    /// Exact, case-sensitive label match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sentiment::ALL
            .into_iter()
            .find(|v| v.label() == s)
            .ok_or_else(|| format!("Unknown sentiment: {}", s))
    }
}

/// The sentiment value as returned by the model. Missing reads as neutral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentimentCall {
    Known(Sentiment),
    Unrecognized(String),
    Missing,
}

impl SentimentCall {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => SentimentCall::Missing,
            Some(Value::String(s)) => s
                .parse()
                .map(SentimentCall::Known)
                .unwrap_or_else(|_| SentimentCall::Unrecognized(s.clone())),
            Some(other) => SentimentCall::Unrecognized(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SentimentCall::Known(s) => s.label(),
            SentimentCall::Unrecognized(raw) => raw,
            SentimentCall::Missing => Sentiment::Neutral.label(),
        }
    }

    pub fn border_color(&self) -> &'static str {
        match self {
            SentimentCall::Known(s) => s.border_color(),
            _ => Sentiment::Neutral.border_color(),
        }
    }
}

impl fmt::Display for SentimentCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SentimentCall {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Typed sentiment result for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub sentiment: SentimentCall,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SentimentResult {
    pub fn from_extraction(extraction: &Extraction) -> Self {
        Self {
            sentiment: SentimentCall::from_value(extraction.get("sentiment")),
            explanation: extraction
                .get("explanation")
                .map(value_text)
                .unwrap_or_default(),
            error: extraction.snippet().map(str::to_string),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}
