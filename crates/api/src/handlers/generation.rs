//! Handlers that call the image provider.

use std::collections::HashSet;
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::Json;
use refshoot_core::dispatch::{
    clamp_image_count, ensure_uploaded, output_filename, plan_dispatch, size_for_aspect_ratio,
    Quality, OUTPUT_MIME,
};
use refshoot_core::job::{AspectRatio, ModelId};
use refshoot_core::prompt::{render_prompt, strict_reference_prompt};
use refshoot_core::validation::validate_files;
use refshoot_imagegen::TextToImageRequest;
use serde::{Deserialize, Serialize};

use crate::engine::dispatcher::{
    normalize_references, BatchParams, BatchReport, GenerationDispatcher,
};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::read_reference_form;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject any model other than the one backend we can dispatch to.
fn ensure_dispatchable(model: &str) -> AppResult<()> {
    if model == ModelId::OpenaiImage.as_str() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Model not supported yet: {model}")))
    }
}

// ---------------------------------------------------------------------------
// Text-to-image
// ---------------------------------------------------------------------------

/// Request body for `POST /api/v1/generate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub model: Option<String>,
    pub prompt: String,
    #[serde(default)]
    pub n: Option<i64>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
}

/// One returned image.
#[derive(Debug, Serialize)]
pub struct ImageOutput {
    pub name: String,
    pub b64: String,
    pub mime: &'static str,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub images: Vec<ImageOutput>,
}

/// POST /api/v1/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<GenerateRequest>,
) -> AppResult<Json<DataResponse<GenerateResponse>>> {
    if let Some(model) = input.model.as_deref() {
        ensure_dispatchable(model)?;
    }
    if input.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("Prompt is required".into()));
    }

    let quality = match input.quality.as_deref() {
        Some(q) => Quality::parse(q)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown quality: {q}")))?,
        None => Quality::Auto,
    };
    let aspect_ratio = input
        .aspect_ratio
        .unwrap_or_else(|| AspectRatio::default().as_str().to_string());

    let request = TextToImageRequest {
        prompt: input.prompt,
        n: clamp_image_count(input.n.unwrap_or(1)),
        size: size_for_aspect_ratio(&aspect_ratio).to_string(),
        quality,
    };
    tracing::info!(
        n = request.n,
        size = %request.size,
        quality = %quality,
        "Text-to-image requested",
    );

    let images = state.generator.generate(request).await?;

    let images = images
        .into_iter()
        .zip(1u32..)
        .map(|(image, index)| ImageOutput {
            name: output_filename(index),
            b64: image.b64,
            mime: OUTPUT_MIME,
        })
        .collect();

    Ok(Json(DataResponse {
        data: GenerateResponse { images },
    }))
}

// ---------------------------------------------------------------------------
// Reference batch
// ---------------------------------------------------------------------------

/// POST /api/v1/generate-ref
///
/// Multipart form: `job` (JSON), `prompt?`, `quality?`, `face`, `object?`,
/// plus one file part per uploaded reference. Without a prompt the job's
/// rendered prompt is used.
pub async fn generate_ref(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<BatchReport>>> {
    let form = read_reference_form(multipart).await?;
    ensure_dispatchable(form.job.settings.model.as_str())?;

    let outcome = validate_files(form.files);
    if !outcome.is_clean() {
        tracing::info!(rejected = outcome.errors.len(), "Reference upload rejected");
        return Err(AppError::InvalidFiles(outcome.errors));
    }

    let plan = plan_dispatch(&form.job, form.face.as_deref(), form.object.as_deref())?;
    let uploaded: HashSet<&str> = outcome.accepted.iter().map(|f| f.filename.as_str()).collect();
    ensure_uploaded(&plan, &uploaded)?;

    let references = normalize_references(&plan, outcome.accepted).await?;

    let base_prompt = form.prompt.unwrap_or_else(|| render_prompt(&form.job));
    let params = BatchParams {
        prompt: strict_reference_prompt(&base_prompt, form.object.is_some()),
        size: size_for_aspect_ratio(form.job.settings.aspect_ratio.as_str()).to_string(),
        quality: form.quality,
    };

    let dispatcher = GenerationDispatcher::new(
        state.generator.clone(),
        state.config.generation_concurrency,
        Duration::from_secs(state.config.generation_slot_timeout_secs),
    );
    let results = dispatcher.run(&plan, &references, &params).await;
    let report = BatchReport::from_results(&plan, results)?;

    tracing::info!(
        generated = report.images.len(),
        failed = report.failures.len(),
        "Reference batch finished",
    );

    Ok(Json(DataResponse { data: report }))
}
