//! Planning the generation requests for a built job.
//!
//! Pure logic shared by the HTTP layer: role-sufficiency checks, output
//! naming, size and quality parameters. Fetching bytes and calling the
//! backend happen elsewhere.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::job::ImageJob;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Upper bound on images produced by one request.
pub const MAX_IMAGES_PER_REQUEST: u32 = 10;

/// Size sent for aspect ratios the backend has no fixed resolution for.
pub const AUTO_SIZE: &str = "auto";

/// MIME type of every generated image.
pub const OUTPUT_MIME: &str = "image/png";

const MISSING_REFERENCES: &str = "Please select FACE, POSE, and at least 1 OUTFIT";

// ---------------------------------------------------------------------------
// Request parameters
// ---------------------------------------------------------------------------

/// Backend quality tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    High,
    #[default]
    Auto,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Auto => "auto",
        }
    }

    /// Parse a tier name; `None` for unknown names.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an aspect ratio string to a backend output size.
///
/// 4:5 has no native size and uses the portrait resolution.
pub fn size_for_aspect_ratio(aspect_ratio: &str) -> &'static str {
    match aspect_ratio {
        "9:16" => "1024x1536",
        "16:9" => "1536x1024",
        "1:1" => "1024x1024",
        "4:5" => "1024x1536",
        _ => AUTO_SIZE,
    }
}

/// Clamp a requested image count to `1..=MAX_IMAGES_PER_REQUEST`.
pub fn clamp_image_count(requested: i64) -> u32 {
    requested.clamp(1, MAX_IMAGES_PER_REQUEST as i64) as u32
}

/// Filename for the `image_index`-th output, e.g. `image_03.png`.
pub fn output_filename(image_index: u32) -> String {
    format!("image_{image_index:02}.png")
}

// ---------------------------------------------------------------------------
// Dispatch plan
// ---------------------------------------------------------------------------

/// References for one generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchItem {
    pub image_index: u32,
    pub face: String,
    pub pose: String,
    pub outfit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
}

impl DispatchItem {
    /// Referenced filenames in upload order: face, pose, outfit, object.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.face.as_str()),
            Some(self.pose.as_str()),
            Some(self.outfit.as_str()),
            self.object.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Turn a job's mapping into one request per output slot.
///
/// Every slot needs a face, a pose and an outfit. Mappings longer than
/// [`MAX_IMAGES_PER_REQUEST`] are truncated.
pub fn plan_dispatch(
    job: &ImageJob,
    face: Option<&str>,
    object: Option<&str>,
) -> Result<Vec<DispatchItem>, CoreError> {
    let face = face
        .filter(|f| !f.is_empty())
        .ok_or_else(|| CoreError::Validation(MISSING_REFERENCES.to_string()))?;
    let object = object.filter(|o| !o.is_empty());

    if job.mapping.is_empty() {
        return Err(CoreError::Validation(MISSING_REFERENCES.to_string()));
    }

    job.mapping
        .iter()
        .take(MAX_IMAGES_PER_REQUEST as usize)
        .map(|item| {
            let (Some(pose), Some(outfit)) = (item.pose.as_deref(), item.outfit.as_deref()) else {
                return Err(CoreError::Validation(format!(
                    "{MISSING_REFERENCES} (image {} is missing a reference)",
                    item.image_index
                )));
            };
            Ok(DispatchItem {
                image_index: item.image_index,
                face: face.to_string(),
                pose: pose.to_string(),
                outfit: outfit.to_string(),
                object: object.map(str::to_string),
            })
        })
        .collect()
}

/// Fail with the first referenced filename that was not uploaded.
pub fn ensure_uploaded(plan: &[DispatchItem], uploaded: &HashSet<&str>) -> Result<(), CoreError> {
    let missing = plan
        .iter()
        .flat_map(|item| item.references())
        .find(|name| !uploaded.contains(name));

    match missing {
        Some(filename) => Err(CoreError::MissingUpload {
            filename: filename.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::job::{Action, AspectRatio, JobFiles, JobSettings, ModelId};
    use crate::mapping::MappingItem;

    fn job_with(mapping: Vec<MappingItem>) -> ImageJob {
        ImageJob {
            action: Action::OutfitSwap,
            files: JobFiles::default(),
            settings: JobSettings {
                model: ModelId::OpenaiImage,
                gender: None,
                location: None,
                aspect_ratio: AspectRatio::Portrait,
                output_count: mapping.len() as u32,
                style: None,
            },
            mapping,
        }
    }

    fn item(index: u32, pose: Option<&str>, outfit: Option<&str>) -> MappingItem {
        MappingItem {
            image_index: index,
            pose: pose.map(str::to_string),
            outfit: outfit.map(str::to_string),
        }
    }

    // -- size / naming tests --

    #[test]
    fn sizes_for_known_ratios() {
        assert_eq!(size_for_aspect_ratio("9:16"), "1024x1536");
        assert_eq!(size_for_aspect_ratio("16:9"), "1536x1024");
        assert_eq!(size_for_aspect_ratio("1:1"), "1024x1024");
        assert_eq!(size_for_aspect_ratio("4:5"), "1024x1536");
    }

    #[test]
    fn unknown_ratio_falls_back_to_auto() {
        assert_eq!(size_for_aspect_ratio("3:2"), AUTO_SIZE);
        assert_eq!(size_for_aspect_ratio(""), AUTO_SIZE);
    }

    #[test]
    fn output_filenames_are_zero_padded() {
        assert_eq!(output_filename(1), "image_01.png");
        assert_eq!(output_filename(10), "image_10.png");
    }

    #[test]
    fn image_count_is_clamped() {
        assert_eq!(clamp_image_count(0), 1);
        assert_eq!(clamp_image_count(-3), 1);
        assert_eq!(clamp_image_count(4), 4);
        assert_eq!(clamp_image_count(50), MAX_IMAGES_PER_REQUEST);
    }

    #[test]
    fn quality_parses_known_tiers() {
        assert_eq!(Quality::parse("low"), Some(Quality::Low));
        assert_eq!(Quality::parse("ultra"), None);
        assert_eq!(Quality::default().as_str(), "auto");
    }

    // -- plan_dispatch tests --

    #[test]
    fn plans_one_item_per_mapping_entry() {
        let job = job_with(vec![
            item(1, Some("pose.png"), Some("outfit_a.png")),
            item(2, Some("pose.png"), Some("outfit_b.png")),
        ]);
        let plan = plan_dispatch(&job, Some("face.png"), Some("prop.png")).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].image_index, 2);
        assert_eq!(plan[1].outfit, "outfit_b.png");
        assert_eq!(plan[1].object.as_deref(), Some("prop.png"));
        assert_eq!(
            plan[0].references().collect::<Vec<_>>(),
            vec!["face.png", "pose.png", "outfit_a.png", "prop.png"]
        );
    }

    #[test]
    fn missing_face_is_rejected() {
        let job = job_with(vec![item(1, Some("pose.png"), Some("outfit.png"))]);
        assert_matches!(plan_dispatch(&job, None, None), Err(CoreError::Validation(_)));
        assert_matches!(plan_dispatch(&job, Some(""), None), Err(CoreError::Validation(_)));
    }

    #[test]
    fn slot_without_outfit_is_rejected() {
        let job = job_with(vec![
            item(1, Some("pose.png"), Some("outfit.png")),
            item(2, Some("pose.png"), None),
        ]);
        let err = plan_dispatch(&job, Some("face.png"), None).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("image 2"));
    }

    #[test]
    fn empty_mapping_is_rejected() {
        let job = job_with(vec![]);
        assert_matches!(
            plan_dispatch(&job, Some("face.png"), None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn plan_is_capped() {
        let mapping = (1..=12).map(|i| item(i, Some("p"), Some("o"))).collect();
        let plan = plan_dispatch(&job_with(mapping), Some("f"), None).unwrap();
        assert_eq!(plan.len(), MAX_IMAGES_PER_REQUEST as usize);
    }

    #[test]
    fn blank_object_is_treated_as_absent() {
        let job = job_with(vec![item(1, Some("p"), Some("o"))]);
        let plan = plan_dispatch(&job, Some("f"), Some("")).unwrap();
        assert_eq!(plan[0].object, None);
    }

    // -- ensure_uploaded tests --

    #[test]
    fn reports_first_missing_upload() {
        let job = job_with(vec![item(1, Some("pose.png"), Some("outfit.png"))]);
        let plan = plan_dispatch(&job, Some("face.png"), None).unwrap();

        let uploaded: HashSet<&str> = ["face.png", "pose.png"].into_iter().collect();
        assert_matches!(
            ensure_uploaded(&plan, &uploaded),
            Err(CoreError::MissingUpload { filename }) if filename == "outfit.png"
        );

        let uploaded: HashSet<&str> = ["face.png", "pose.png", "outfit.png"].into_iter().collect();
        assert!(ensure_uploaded(&plan, &uploaded).is_ok());
    }
}
