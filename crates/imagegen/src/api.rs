//! REST client for an OpenAI-compatible images API.
//!
//! Wraps the `/images/generations` and `/images/edits` endpoints using
//! [`reqwest`]. Both always return base64 payloads.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::ImageGenError;
use crate::generator::{
    GeneratedImage, ImageGenerator, ReferenceEditRequest, TextToImageRequest,
};

/// Default provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default image model.
pub const DEFAULT_MODEL: &str = "gpt-image-1";

/// HTTP client for the images API.
pub struct OpenAiImagesApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// Response body shared by both endpoints.
#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}

impl OpenAiImagesApi {
    /// Create a new client.
    ///
    /// * `base_url` - API root, e.g. `https://api.openai.com/v1`.
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key, model)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: String,
        api_key: String,
        model: String,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, otherwise surface
    /// the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ImageGenError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ImageGenError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_images(
        response: reqwest::Response,
    ) -> Result<Vec<GeneratedImage>, ImageGenError> {
        let response = Self::ensure_success(response).await?;
        let body = response.json::<ImagesResponse>().await?;
        Ok(collect_images(body))
    }
}

fn collect_images(body: ImagesResponse) -> Vec<GeneratedImage> {
    body.data
        .into_iter()
        .filter_map(|d| d.b64_json)
        .map(|b64| GeneratedImage { b64 })
        .collect()
}

/// JSON body for `POST /images/generations`.
fn generation_body(model: &str, request: &TextToImageRequest) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "prompt": request.prompt,
        "n": request.n,
        "size": request.size,
        "quality": request.quality.as_str(),
    })
}

/// Text fields for `POST /images/edits`, in submission order.
fn edit_fields(model: &str, request: &ReferenceEditRequest) -> Vec<(&'static str, String)> {
    vec![
        ("model", model.to_string()),
        ("prompt", request.prompt.clone()),
        ("size", request.size.clone()),
        ("quality", request.quality.as_str().to_string()),
        ("input_fidelity", "high".to_string()),
        ("output_format", "png".to_string()),
        ("n", "1".to_string()),
    ]
}

#[async_trait]
impl ImageGenerator for OpenAiImagesApi {
    async fn generate(
        &self,
        request: TextToImageRequest,
    ) -> Result<Vec<GeneratedImage>, ImageGenError> {
        tracing::debug!(n = request.n, size = %request.size, "Submitting text-to-image request");

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&generation_body(&self.model, &request))
            .send()
            .await?;

        let images = Self::parse_images(response).await?;
        if images.is_empty() {
            return Err(ImageGenError::EmptyResponse);
        }
        Ok(images)
    }

    async fn edit(&self, request: ReferenceEditRequest) -> Result<GeneratedImage, ImageGenError> {
        tracing::debug!(
            references = request.images.len(),
            size = %request.size,
            quality = %request.quality,
            "Submitting reference edit request",
        );

        let mut form = Form::new();
        for (name, value) in edit_fields(&self.model, &request) {
            form = form.text(name, value);
        }
        for image in request.images {
            let part = Part::bytes(image.png)
                .file_name(image.filename)
                .mime_str("image/png")?;
            form = form.part("image[]", part);
        }

        let response = self
            .client
            .post(format!("{}/images/edits", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        Self::parse_images(response)
            .await?
            .into_iter()
            .next()
            .ok_or(ImageGenError::EmptyResponse)
    }
}
