//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use chartwise_core::error::GenerationError;
use chartwise_core::traits::GenerationService;
use chartwise_core::types::GenerationRequest;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini API configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read the API key from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, GenerationError> {
        let api_key = std::env::var(var)
            .map_err(|_| GenerationError::Configuration(format!("{} not set", var)))?;
        if api_key.trim().is_empty() {
            return Err(GenerationError::Configuration(format!("{} is empty", var)));
        }
        Ok(Self::new(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Gemini wire types
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
    Other(serde_json::Value),
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Gemini generation client.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| GenerationError::Configuration(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| GenerationError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = build_body(request);
        debug!(
            model = %self.config.model,
            attachment = request.attachment.is_some(),
            "Sending generateContent request"
        );

        let resp = self
            .client
            .post(self.config.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Connection(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| GenerationError::Connection(e.to_string()))?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }

        parse_response(&text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Request body: the prompt as a text part, then the attachment inline.
fn build_body(request: &GenerationRequest) -> GenerateContentRequest {
    let mut parts = vec![Part::Text {
        text: request.prompt.clone(),
    }];
    if let Some(attachment) = &request.attachment {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: attachment.mime_type.clone(),
                data: STANDARD.encode(&attachment.data),
            },
        });
    }

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
    }
}

/// Concatenated text parts of the first candidate.
fn parse_response(body: &str) -> Result<String, GenerationError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::Api(format!("invalid response: {}", e)))?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GenerationError::EmptyResponse);
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| match p {
            Part::Text { text } => Some(text),
            _ => None,
        })
        .collect();

    if text.is_empty() {
        debug!(finish_reason = ?candidate.finish_reason, "Candidate carried no text");
        return Err(GenerationError::EmptyResponse);
    }
    Ok(text)
}

fn api_error(status: u16, body: &str) -> GenerationError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => GenerationError::Api(format!(
            "{} ({}): {}",
            status, envelope.error.code, envelope.error.message
        )),
        Err(_) => GenerationError::Api(format!("{}: {}", status, body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartwise_core::types::Attachment;
    use serde_json::json;

    #[test]
    fn test_endpoint() {
        let config = GeminiConfig::new("k").with_base_url("http://localhost:8080/");
        assert_eq!(
            config.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_body_with_attachment() {
        let request = GenerationRequest::text("Analyze TCS.NS")
            .with_attachment(Attachment::png(vec![0x89, b'P', b'N', b'G']));

        let body = serde_json::to_value(build_body(&request)).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"text": "Analyze TCS.NS"},
                        {"inline_data": {"mime_type": "image/png", "data": "iVBORw=="}}
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_body_text_only() {
        let body = serde_json::to_value(build_body(&GenerationRequest::text("hi"))).unwrap();
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "```json\n{\"a\":"}, {"text": " 1}\n```"}]},
                "finishReason": "STOP"
            }]
        }"#;

        assert_eq!(parse_response(body).unwrap(), "```json\n{\"a\": 1}\n```");
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert!(matches!(parse_response(body), Err(GenerationError::EmptyResponse)));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let err = api_error(400, body);
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn test_from_env_missing() {
        assert!(GeminiConfig::from_env("CHARTWISE_TEST_UNSET_KEY_VAR").is_err());
    }
}
