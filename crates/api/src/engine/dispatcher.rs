//! Reference-batch dispatcher.
//!
//! Takes a dispatch plan (one item per output slot), normalizes the
//! referenced uploads to PNG once, then submits one edit request per slot.
//! At most `concurrency` requests are in flight and results come back in
//! plan order. A failed slot does not cancel the others.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use refshoot_core::dispatch::{output_filename, DispatchItem, Quality, OUTPUT_MIME};
use refshoot_imagegen::normalize::{png_filename, to_png};
use refshoot_imagegen::{
    GeneratedImage, ImageGenError, ImageGenerator, ReferenceEditRequest, ReferenceImage,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::uploads::UploadedFile;

/// Per-batch request parameters shared by every slot.
#[derive(Debug, Clone)]
pub struct BatchParams {
    pub prompt: String,
    pub size: String,
    pub quality: Quality,
}

/// One generated output, tagged with the references that produced it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedOutput {
    pub name: String,
    pub b64: String,
    pub mime: &'static str,
    pub image_index: u32,
    pub pose: String,
    pub outfit: String,
}

/// A slot whose request failed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotFailure {
    pub image_index: u32,
    pub error: String,
}

/// Outcome of a batch with at least one successful slot.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub images: Vec<GeneratedOutput>,
    pub failures: Vec<SlotFailure>,
}

impl BatchReport {
    /// Pair per-slot results with their plan items and split them into
    /// outputs and failures, preserving plan order.
    ///
    /// Returns the first error when no slot succeeded.
    pub fn from_results(
        plan: &[DispatchItem],
        results: Vec<Result<GeneratedImage, ImageGenError>>,
    ) -> Result<Self, ImageGenError> {
        let mut images = Vec::new();
        let mut failures = Vec::new();
        let mut first_error = None;

        for (item, result) in plan.iter().zip(results) {
            match result {
                Ok(image) => images.push(GeneratedOutput {
                    name: output_filename(item.image_index),
                    b64: image.b64,
                    mime: OUTPUT_MIME,
                    image_index: item.image_index,
                    pose: item.pose.clone(),
                    outfit: item.outfit.clone(),
                }),
                Err(e) => {
                    failures.push(SlotFailure {
                        image_index: item.image_index,
                        error: e.to_string(),
                    });
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if images.is_empty() => Err(e),
            _ => Ok(Self { images, failures }),
        }
    }
}

/// Convert every upload referenced by `plan` to PNG, keyed by original
/// filename. Unreferenced uploads are dropped without decoding.
pub async fn normalize_references(
    plan: &[DispatchItem],
    uploads: Vec<UploadedFile>,
) -> AppResult<HashMap<String, ReferenceImage>> {
    let referenced: BTreeSet<&str> = plan.iter().flat_map(|item| item.references()).collect();
    let wanted: Vec<UploadedFile> = uploads
        .into_iter()
        .filter(|f| referenced.contains(f.filename.as_str()))
        .collect();

    let converted = tokio::task::spawn_blocking(move || {
        wanted
            .into_iter()
            .map(|file| -> Result<(String, ReferenceImage), ImageGenError> {
                let png = to_png(&file.bytes)?;
                let image = ReferenceImage {
                    filename: png_filename(&file.filename),
                    png,
                };
                Ok((file.filename, image))
            })
            .collect::<Result<HashMap<_, _>, ImageGenError>>()
    })
    .await
    .map_err(|e| AppError::InternalError(format!("PNG conversion task failed: {e}")))??;

    tracing::debug!(count = converted.len(), "Normalized reference uploads to PNG");
    Ok(converted)
}

/// Runs planned slots against an [`ImageGenerator`].
pub struct GenerationDispatcher {
    generator: Arc<dyn ImageGenerator>,
    concurrency: usize,
    slot_timeout: Duration,
}

impl GenerationDispatcher {
    pub fn new(
        generator: Arc<dyn ImageGenerator>,
        concurrency: usize,
        slot_timeout: Duration,
    ) -> Self {
        Self {
            generator,
            concurrency: concurrency.max(1),
            slot_timeout,
        }
    }

    /// Submit every slot and return one result per plan item, in plan order.
    ///
    /// A slot that exceeds the slot timeout is reported as
    /// [`ImageGenError::Timeout`]; the other slots keep running.
    pub async fn run(
        &self,
        plan: &[DispatchItem],
        references: &HashMap<String, ReferenceImage>,
        params: &BatchParams,
    ) -> Vec<Result<GeneratedImage, ImageGenError>> {
        tracing::info!(
            slots = plan.len(),
            concurrency = self.concurrency,
            quality = %params.quality,
            size = %params.size,
            "Dispatching reference batch",
        );

        let slots: Vec<_> = plan
            .iter()
            .map(|item| self.slot(item, references, params))
            .collect();

        stream::iter(slots)
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Build the owned future for one slot.
    fn slot(
        &self,
        item: &DispatchItem,
        references: &HashMap<String, ReferenceImage>,
        params: &BatchParams,
    ) -> impl Future<Output = Result<GeneratedImage, ImageGenError>> + Send + 'static {
        let generator = Arc::clone(&self.generator);
        let slot_timeout = self.slot_timeout;
        let image_index = item.image_index;
        let pose = item.pose.clone();
        let outfit = item.outfit.clone();
        let request = ReferenceEditRequest {
            images: item
                .references()
                .filter_map(|name| references.get(name).cloned())
                .collect(),
            prompt: params.prompt.clone(),
            size: params.size.clone(),
            quality: params.quality,
        };

        async move {
            tracing::debug!(image_index, %pose, %outfit, "Slot started");

            match tokio::time::timeout(slot_timeout, generator.edit(request)).await {
                Ok(Ok(image)) => {
                    tracing::info!(image_index, "Slot completed");
                    Ok(image)
                }
                Ok(Err(e)) => {
                    tracing::warn!(image_index, error = %e, "Slot failed");
                    Err(e)
                }
                Err(_) => {
                    tracing::warn!(
                        image_index,
                        timeout_secs = slot_timeout.as_secs(),
                        "Slot timed out",
                    );
                    Err(ImageGenError::Timeout(slot_timeout))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(index: u32) -> DispatchItem {
        DispatchItem {
            image_index: index,
            face: "face.png".into(),
            pose: format!("pose_{index}.png"),
            outfit: format!("outfit_{index}.png"),
            object: None,
        }
    }

    #[test]
    fn report_keeps_successes_next_to_failures() {
        let plan = [item(1), item(2), item(3)];
        let results = vec![
            Ok(GeneratedImage { b64: "a".into() }),
            Err(ImageGenError::EmptyResponse),
            Ok(GeneratedImage { b64: "c".into() }),
        ];

        let report = BatchReport::from_results(&plan, results).unwrap();
        let indices: Vec<u32> = report.images.iter().map(|i| i.image_index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(report.images[1].name, "image_03.png");
        assert_eq!(report.images[1].outfit, "outfit_3.png");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].image_index, 2);
    }

    #[test]
    fn report_fails_when_every_slot_failed() {
        let plan = [item(1)];
        let results = vec![Err(ImageGenError::ApiError {
            status: 500,
            body: "boom".into(),
        })];

        let err = BatchReport::from_results(&plan, results).unwrap_err();
        assert!(matches!(err, ImageGenError::ApiError { status: 500, .. }));
    }

    #[test]
    fn timed_out_slot_is_reported_as_failure() {
        let plan = [item(1), item(2)];
        let results = vec![
            Ok(GeneratedImage { b64: "a".into() }),
            Err(ImageGenError::Timeout(Duration::from_secs(90))),
        ];

        let report = BatchReport::from_results(&plan, results).unwrap();
        assert_eq!(report.images.len(), 1);
        assert_eq!(report.failures[0].image_index, 2);
        assert!(report.failures[0].error.contains("timed out"));
    }
}
