//! Backend-agnostic request/response types and the generator trait.

use async_trait::async_trait;
use refshoot_core::dispatch::Quality;
use serde::Serialize;

use crate::error::ImageGenError;

/// One generated image as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedImage {
    /// Base64-encoded PNG bytes.
    pub b64: String,
}

/// Prompt-only generation.
#[derive(Debug, Clone)]
pub struct TextToImageRequest {
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub quality: Quality,
}

/// A normalized reference image attached to an edit request.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    /// Upload filename, always ending in `.png`.
    pub filename: String,
    pub png: Vec<u8>,
}

/// Generation conditioned on reference images (face, pose, outfit and an
/// optional object, in that order).
#[derive(Debug, Clone)]
pub struct ReferenceEditRequest {
    pub images: Vec<ReferenceImage>,
    pub prompt: String,
    pub size: String,
    pub quality: Quality,
}

/// Something that can turn prompts and references into images.
///
/// The HTTP server holds an `Arc<dyn ImageGenerator>` so tests can swap in
/// a fake backend.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        request: TextToImageRequest,
    ) -> Result<Vec<GeneratedImage>, ImageGenError>;

    /// Produce exactly one image from the given references.
    async fn edit(&self, request: ReferenceEditRequest) -> Result<GeneratedImage, ImageGenError>;
}
