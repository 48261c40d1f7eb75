//! Text/image generation service trait.

use crate::error::GenerationError;
use crate::types::GenerationRequest;
use async_trait::async_trait;

/// An external model that turns a prompt (plus optional attachment) into free text.
///
/// The returned text is untrusted; nothing guarantees it follows the shape
/// the prompt asked for.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Run one generation call and return the raw text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Get the service name.
    fn name(&self) -> &str;
}
