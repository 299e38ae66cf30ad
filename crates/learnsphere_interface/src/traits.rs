//! The backend seam.

use crate::ChunkStream;
use async_trait::async_trait;
use learnsphere_core::{GenerateRequest, GenerateResponse, GeneratedImage, ImageRequest};
use learnsphere_error::GeminiError;

/// A single-credential connection to a generative backend.
///
/// Every method takes the API key explicitly so the caller decides which
/// credential each attempt uses. Errors are returned as [`GeminiError`],
/// which exposes whatever status information the backend reported.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Generate a complete response.
    async fn generate(
        &self,
        api_key: &str,
        req: &GenerateRequest,
    ) -> Result<GenerateResponse, GeminiError>;

    /// Open a streaming response.
    ///
    /// An `Err` here means the stream never opened. Failures after opening
    /// arrive as `Err` items on the stream.
    async fn generate_stream(
        &self,
        api_key: &str,
        req: &GenerateRequest,
    ) -> Result<ChunkStream, GeminiError>;

    /// Generate one or more images.
    async fn generate_images(
        &self,
        api_key: &str,
        req: &ImageRequest,
    ) -> Result<Vec<GeneratedImage>, GeminiError>;

    /// Provider name (e.g. "gemini").
    fn provider_name(&self) -> &'static str;
}
