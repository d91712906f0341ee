//! Handlers for the `/jobs` resource.
//!
//! A preview runs the whole pure pipeline (validate, group, map, render)
//! for a list of filenames without touching the image provider.

use axum::Json;
use refshoot_core::grouping::{group_by_role, GroupedFiles};
use refshoot_core::job::{build_job, Action, BuildJobParams, ImageJob, JobSettings};
use refshoot_core::mapping::{MappingItem, PoseMode};
use refshoot_core::prompt::render_prompt;
use refshoot_core::selection::ReferenceSelections;
use refshoot_core::validation::{validate_files, FileValidationError};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;

/// Request body for `POST /api/v1/jobs/preview`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewJobRequest {
    pub filenames: Vec<String>,
    pub action: Action,
    pub settings: JobSettings,
    #[serde(default)]
    pub pose_mode: PoseMode,
    #[serde(default)]
    pub explicit_mapping: Option<Vec<MappingItem>>,
}

/// Preview result. When any file is rejected, everything after validation
/// is `null` and nothing is built.
#[derive(Debug, Serialize)]
pub struct JobPreview {
    pub accepted: Vec<String>,
    pub errors: Vec<FileValidationError>,
    pub grouped: Option<GroupedFiles>,
    pub selections: Option<ReferenceSelections>,
    pub job: Option<ImageJob>,
    pub prompt: Option<String>,
}

/// POST /api/v1/jobs/preview
pub async fn preview_job(
    Json(input): Json<PreviewJobRequest>,
) -> AppResult<Json<DataResponse<JobPreview>>> {
    let outcome = validate_files(input.filenames);

    if !outcome.is_clean() {
        tracing::info!(
            accepted = outcome.accepted.len(),
            rejected = outcome.errors.len(),
            "Job preview rejected files",
        );
        return Ok(Json(DataResponse {
            data: JobPreview {
                accepted: outcome.accepted,
                errors: outcome.errors,
                grouped: None,
                selections: None,
                job: None,
                prompt: None,
            },
        }));
    }

    let grouped = group_by_role(&outcome.accepted);
    let selections = ReferenceSelections::defaults(&grouped);
    let job = build_job(BuildJobParams {
        action: input.action,
        grouped: &grouped,
        settings: input.settings.with_default_style().normalized(),
        explicit_mapping: input.explicit_mapping.as_deref(),
        pose_mode: input.pose_mode,
    });
    let prompt = render_prompt(&job);

    tracing::debug!(
        action = %job.action,
        files = grouped.len(),
        outputs = job.mapping.len(),
        "Built job preview",
    );

    Ok(Json(DataResponse {
        data: JobPreview {
            accepted: outcome.accepted,
            errors: Vec::new(),
            grouped: Some(grouped),
            selections: Some(selections),
            job: Some(job),
            prompt: Some(prompt),
        },
    }))
}
