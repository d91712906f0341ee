//! Multipart parsing for reference-image batches.

use axum::body::Bytes;
use axum::extract::Multipart;
use refshoot_core::dispatch::Quality;
use refshoot_core::job::ImageJob;
use refshoot_core::validation::NamedFile;

use crate::error::{AppError, AppResult};

/// One uploaded file part, held in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl NamedFile for UploadedFile {
    fn file_name(&self) -> &str {
        &self.filename
    }
}

/// Parsed `POST /generate-ref` form.
#[derive(Debug)]
pub struct ReferenceForm {
    pub job: ImageJob,
    /// Caller-supplied prompt; `None` when absent or blank.
    pub prompt: Option<String>,
    pub quality: Quality,
    pub face: Option<String>,
    pub object: Option<String>,
    /// File parts in arrival order, unvalidated.
    pub files: Vec<UploadedFile>,
}

/// Read every part of a reference-generation form.
///
/// Parts with a filename are uploads; everything else is a text field.
/// Unknown text fields are ignored.
pub async fn read_reference_form(mut multipart: Multipart) -> AppResult<ReferenceForm> {
    let mut job_json: Option<String> = None;
    let mut prompt = None;
    let mut quality = None;
    let mut face = None;
    let mut object = None;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if let Some(filename) = field.file_name().map(str::to_string) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            files.push(UploadedFile { filename, bytes });
            continue;
        }

        let name = field.name().unwrap_or_default().to_string();
        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        match name.as_str() {
            "job" => job_json = Some(value),
            "prompt" => prompt = non_blank(value),
            "quality" => quality = non_blank(value),
            "face" => face = non_blank(value),
            "object" => object = non_blank(value),
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    let job_json = job_json.ok_or_else(|| AppError::BadRequest("Missing 'job' field".into()))?;
    let job: ImageJob = serde_json::from_str(&job_json)
        .map_err(|e| AppError::BadRequest(format!("Invalid 'job' field: {e}")))?;

    let quality = match quality {
        Some(q) => Quality::parse(&q)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown quality: {q}")))?,
        None => Quality::Low,
    };

    Ok(ReferenceForm {
        job,
        prompt,
        quality,
        face,
        object,
        files,
    })
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
