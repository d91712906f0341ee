//! Image job description and the assembler that builds it.
//!
//! A job is rebuilt from scratch whenever its inputs change; nothing here
//! mutates an existing job.

use serde::{Deserialize, Serialize};

use crate::dispatch::MAX_IMAGES_PER_REQUEST;
use crate::grouping::GroupedFiles;
use crate::mapping::{resolve_mapping, MappingItem, PoseMode};

/// Style applied by the studio flow when the user leaves it unchanged.
pub const DEFAULT_STYLE: &str = "Photorealistic, Ultra High Fidelity, Cinema Quality";

/// What kind of shoot the job describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    OutfitSwap,
    PoseVariation,
    Lookbook,
    ProductShoot,
    CustomMapping,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutfitSwap => "OUTFIT_SWAP",
            Self::PoseVariation => "POSE_VARIATION",
            Self::Lookbook => "LOOKBOOK",
            Self::ProductShoot => "PRODUCT_SHOOT",
            Self::CustomMapping => "CUSTOM_MAPPING",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:5")]
    Feed,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "9:16",
            Self::Landscape => "16:9",
            Self::Square => "1:1",
            Self::Feed => "4:5",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image-generation backend the job targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelId {
    GoogleImagen,
    #[default]
    OpenaiImage,
}

impl ModelId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleImagen => "google-imagen",
            Self::OpenaiImage => "openai-image",
        }
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-chosen generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSettings {
    pub model: ModelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    pub output_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl JobSettings {
    /// Clamp `output_count` to `1..=MAX_IMAGES_PER_REQUEST` and drop blank
    /// free-text fields.
    pub fn normalized(mut self) -> Self {
        self.output_count = self.output_count.clamp(1, MAX_IMAGES_PER_REQUEST);
        self.gender = non_blank(self.gender);
        self.location = non_blank(self.location);
        self.style = non_blank(self.style);
        self
    }

    /// Fill in [`DEFAULT_STYLE`] when no style was given. An explicit blank
    /// style is kept, so [`normalized`](Self::normalized) can still drop it.
    pub fn with_default_style(mut self) -> Self {
        self.style.get_or_insert_with(|| DEFAULT_STYLE.to_string());
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Filenames per role as carried by a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFiles {
    pub face: Vec<String>,
    pub pose: Vec<String>,
    pub outfit: Vec<String>,
    pub object: Vec<String>,
}

impl From<&GroupedFiles> for JobFiles {
    fn from(grouped: &GroupedFiles) -> Self {
        Self {
            face: grouped.face.clone(),
            pose: grouped.pose.clone(),
            outfit: grouped.outfit.clone(),
            object: grouped.object.clone(),
        }
    }
}

/// One generation batch: files, settings and per-output mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageJob {
    pub action: Action,
    pub files: JobFiles,
    pub settings: JobSettings,
    pub mapping: Vec<MappingItem>,
}

/// Inputs to [`build_job`].
#[derive(Debug, Clone)]
pub struct BuildJobParams<'a> {
    pub action: Action,
    pub grouped: &'a GroupedFiles,
    pub settings: JobSettings,
    pub explicit_mapping: Option<&'a [MappingItem]>,
    pub pose_mode: PoseMode,
}

/// Assemble a job. No cross-field checks happen here: whether the
/// populated roles suit the action is decided at dispatch time.
pub fn build_job(params: BuildJobParams<'_>) -> ImageJob {
    let mapping = resolve_mapping(
        params.grouped,
        params.settings.output_count,
        params.pose_mode,
        params.explicit_mapping,
    );

    ImageJob {
        action: params.action,
        files: JobFiles::from(params.grouped),
        settings: params.settings,
        mapping,
    }
}
