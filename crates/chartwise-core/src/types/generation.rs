//! Request types for the text/image generation collaborator.

use serde::{Deserialize, Serialize};

/// Binary payload sent alongside a prompt, e.g. a rasterized chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// MIME type such as `image/png`
    pub mime_type: String,
    /// Raw bytes
    pub data: Vec<u8>,
}

impl Attachment {
    /// PNG image attachment.
    pub fn png(data: Vec<u8>) -> Self {
        Self {
            mime_type: "image/png".to_string(),
            data,
        }
    }
}

/// One prompt, optionally with an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub attachment: Option<Attachment>,
}

impl GenerationRequest {
    /// Text-only request.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            attachment: None,
        }
    }

    /// Attach a payload to the request.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}
