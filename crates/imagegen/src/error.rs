/// Errors from the image-generation layer.
#[derive(Debug, thiserror::Error)]
pub enum ImageGenError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Image API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response that carried no image payload.
    #[error("Image API returned no image data")]
    EmptyResponse,

    /// The request did not finish within the caller's deadline.
    #[error("Image request timed out after {}s", .0.as_secs())]
    Timeout(std::time::Duration),

    /// An input image could not be decoded or re-encoded.
    #[error("Image conversion failed: {0}")]
    Decode(#[from] image::ImageError),
}
