//! Image generation backend.
//!
//! [`generator::ImageGenerator`] is the seam the HTTP server talks to;
//! [`api::OpenAiImagesApi`] is the production implementation. Reference
//! uploads are converted to PNG with [`normalize::to_png`] before they
//! are attached to an edit request.

pub mod api;
pub mod error;
pub mod generator;
pub mod normalize;

pub use api::OpenAiImagesApi;
pub use error::ImageGenError;
pub use generator::{
    GeneratedImage, ImageGenerator, ReferenceEditRequest, ReferenceImage, TextToImageRequest,
};
