//! Lenient JSON extraction from free-text model output.
//!
//! Model output is untrusted: it may be wrapped in a fenced code block,
//! surrounded by prose, or not contain JSON at all. [`extract_json`] never
//! fails; it returns either the parsed object or a fallback carrying a
//! snippet of the raw text.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

/// Characters of raw text kept in a fallback snippet.
pub const SNIPPET_CHARS: usize = 500;

const FALLBACK_PREFIX: &str = "(Fallback) Raw: ";

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?is)\A\s*```\s*json\s*|\s*```\s*\z").expect("fence pattern is valid")
    })
}

/// Outcome of extracting a JSON object from raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The brace-delimited slice parsed as a JSON object.
    Parsed(Map<String, Value>),
    /// Nothing usable was found; `snippet` quotes the raw text.
    Fallback { snippet: String },
}

impl Extraction {
    /// Build a fallback quoting the first [`SNIPPET_CHARS`] characters of `raw`.
    pub fn fallback(raw: &str) -> Self {
        let head: String = raw.chars().take(SNIPPET_CHARS).collect();
        Extraction::Fallback {
            snippet: format!("{}{}...", FALLBACK_PREFIX, head),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Extraction::Fallback { .. })
    }

    /// Look up a top-level key; always `None` for a fallback.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Extraction::Parsed(map) => map.get(key),
            Extraction::Fallback { .. } => None,
        }
    }

    /// Look up a top-level key holding a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The fallback snippet, if extraction failed.
    pub fn snippet(&self) -> Option<&str> {
        match self {
            Extraction::Fallback { snippet } => Some(snippet),
            Extraction::Parsed(_) => None,
        }
    }

    /// JSON view: the parsed object, or `{"error": snippet}` for a fallback.
    pub fn to_value(&self) -> Value {
        match self {
            Extraction::Parsed(map) => Value::Object(map.clone()),
            Extraction::Fallback { snippet } => {
                let mut map = Map::new();
                map.insert("error".to_string(), Value::String(snippet.clone()));
                Value::Object(map)
            }
        }
    }
}

/// Extract the JSON object embedded in `raw`.
///
/// Trims the text, strips a leading "```json" and trailing "```" fence,
/// then parses the slice from the first `{` to the last `}`.
pub fn extract_json(raw: &str) -> Extraction {
    let trimmed = raw.trim();
    let unfenced = fence_pattern().replace_all(trimmed, "");
    let text = unfenced.trim();

    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        debug!("No JSON object found in model output");
        return Extraction::fallback(raw);
    };
    if end <= start {
        debug!("Closing brace precedes opening brace in model output");
        return Extraction::fallback(raw);
    }

    match serde_json::from_str::<Map<String, Value>>(&text[start..=end]) {
        Ok(map) => Extraction::Parsed(map),
        Err(e) => {
            debug!(error = %e, "Model output is not valid JSON");
            Extraction::fallback(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prose_wrapped_object() {
        let raw = r#"Sure! Here's the analysis: {"recommendation": "Buy", "justification": {"1. Dominant Trend": "up"}} Hope that helps!"#;

        let extraction = extract_json(raw);

        assert!(!extraction.is_fallback());
        assert_eq!(extraction.get_str("recommendation"), Some("Buy"));
        assert_eq!(
            extraction.get("justification"),
            Some(&json!({"1. Dominant Trend": "up"}))
        );
    }

    #[test]
    fn test_fenced_block_matches_direct_parse() {
        let object = r#"{"sentiment": "Positive", "explanation": "Strong quarterly results", "n": [1, 2.5, null]}"#;
        let direct: Map<String, Value> = serde_json::from_str(object).unwrap();

        for raw in [
            format!("```json\n{}\n```", object),
            format!("  ```JSON {}```  ", object),
            format!("Here you go:\n```json\n{}\n```\nCheers", object),
            object.to_string(),
        ] {
            assert_eq!(extract_json(&raw), Extraction::Parsed(direct.clone()), "{}", raw);
        }
    }

    #[test]
    fn test_plain_prose_falls_back() {
        let raw = "The stock looks fine to me, no strong opinion.";

        let extraction = extract_json(raw);

        assert_eq!(
            extraction.snippet(),
            Some("(Fallback) Raw: The stock looks fine to me, no strong opinion....")
        );
        assert!(extraction.get("recommendation").is_none());
    }

    #[test]
    fn test_closing_brace_before_opening_falls_back() {
        let extraction = extract_json("} oops {");
        assert!(extraction.is_fallback());
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let extraction = extract_json("{recommendation: Buy}");
        assert!(extraction.is_fallback());
    }

    #[test]
    fn test_top_level_array_slice_falls_back() {
        let extraction = extract_json(r#"[{"a": 1}, {"b": 2}]"#);
        assert!(extraction.is_fallback());
    }

    #[test]
    fn test_snippet_truncated_to_500_chars_of_original() {
        let raw = format!("   {}", "é".repeat(800));

        let snippet = extract_json(&raw).snippet().unwrap().to_string();

        let body = snippet
            .strip_prefix("(Fallback) Raw: ")
            .and_then(|s| s.strip_suffix("..."))
            .unwrap();
        assert_eq!(body.chars().count(), SNIPPET_CHARS);
        assert!(body.starts_with("   é"));
    }

    #[test]
    fn test_fallback_value_shape() {
        let value = Extraction::fallback("nope").to_value();
        assert_eq!(value, json!({"error": "(Fallback) Raw: nope..."}));
    }
}
