#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use refshoot_api::config::{ImageApiConfig, ServerConfig};
use refshoot_api::router::build_app_router;
use refshoot_api::state::AppState;
use refshoot_imagegen::{
    GeneratedImage, ImageGenError, ImageGenerator, ReferenceEditRequest, TextToImageRequest,
};

/// Base64 payload returned by [`FakeGenerator`] for every image.
pub const FAKE_B64: &str = "ZmFrZS1wbmc=";

pub const BOUNDARY: &str = "refshoot-test-boundary";

/// Build a test `ServerConfig` with safe defaults and no real provider.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 10 * 1024 * 1024,
        generation_concurrency: 1,
        generation_slot_timeout_secs: 1,
        image_api: ImageApiConfig {
            api_key: "test-key".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            model: "gpt-image-1".to_string(),
        },
    }
}

/// In-memory [`ImageGenerator`] that records what it was asked to do.
#[derive(Default)]
pub struct FakeGenerator {
    /// Fail any edit whose references include a filename containing this.
    pub fail_on_reference: Option<String>,
    /// Delay edits whose references include a filename containing this.
    pub slow_on_reference: Option<String>,
    /// Stall edits whose references include a filename containing this,
    /// well past the test slot timeout.
    pub hang_on_reference: Option<String>,
    pub generations: Mutex<Vec<TextToImageRequest>>,
    pub edits: Mutex<Vec<ReferenceEditRequest>>,
}

impl FakeGenerator {
    fn references_contain(request: &ReferenceEditRequest, needle: &Option<String>) -> bool {
        needle
            .as_deref()
            .is_some_and(|n| request.images.iter().any(|i| i.filename.contains(n)))
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate(
        &self,
        request: TextToImageRequest,
    ) -> Result<Vec<GeneratedImage>, ImageGenError> {
        let n = request.n as usize;
        self.generations.lock().unwrap().push(request);
        Ok(vec![
            GeneratedImage {
                b64: FAKE_B64.to_string()
            };
            n
        ])
    }

    async fn edit(&self, request: ReferenceEditRequest) -> Result<GeneratedImage, ImageGenError> {
        if Self::references_contain(&request, &self.slow_on_reference) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if Self::references_contain(&request, &self.hang_on_reference) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        let fail = Self::references_contain(&request, &self.fail_on_reference);
        self.edits.lock().unwrap().push(request);
        if fail {
            return Err(ImageGenError::ApiError {
                status: 500,
                body: "upstream exploded".to_string(),
            });
        }
        Ok(GeneratedImage {
            b64: FAKE_B64.to_string(),
        })
    }
}

/// Build the full application router around the given fake generator.
///
/// Uses the same middleware stack as `main.rs`.
pub fn build_test_app_with(generator: Arc<FakeGenerator>, config: ServerConfig) -> Router {
    let state = AppState {
        config: Arc::new(config.clone()),
        generator,
    };
    build_app_router(state, &config)
}

pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(FakeGenerator::default()), test_config())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_multipart(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

/// Hand-rolled `multipart/form-data` body using [`BOUNDARY`].
#[derive(Default)]
pub struct MultipartBody {
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, filename: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.buf
    }
}

/// A tiny JPEG, so uploads exercise PNG normalization.
pub fn tiny_jpeg() -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        2,
        2,
        image::Rgb([10, 120, 200]),
    ));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}
