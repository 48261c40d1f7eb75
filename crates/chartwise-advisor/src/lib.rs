//! Structured trading advice from a text-generation service.
//!
//! This crate provides:
//! - Lenient JSON extraction from model output
//! - Typed recommendation and sentiment results
//! - Prompt templates
//! - A Gemini client and the [`Advisor`] that ties them together

pub mod advisor;
pub mod extract;
pub mod gemini;
pub mod prompts;
pub mod recommendation;
pub mod sentiment;

pub use advisor::Advisor;
pub use extract::{extract_json, Extraction};
pub use gemini::{GeminiClient, GeminiConfig};
pub use prompts::{ChartContext, JUSTIFICATION_CATEGORIES};
pub use recommendation::{Justification, Recommendation, RecommendationCall, RecommendationResult};
pub use sentiment::{Sentiment, SentimentCall, SentimentResult};
