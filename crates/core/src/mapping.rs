//! Per-output pose/outfit assignment.
//!
//! Auto mode assigns outfits round-robin across output slots and picks
//! poses according to [`PoseMode`]. Custom mode takes a caller-supplied
//! mapping verbatim.

use serde::{Deserialize, Serialize};

use crate::grouping::GroupedFiles;

/// Which pose reference each output slot uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoseMode {
    /// Every slot uses the first pose.
    #[default]
    First,
    /// Slots cycle through all poses.
    Rotate,
}

/// Assignment for one generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingItem {
    /// 1-based output index.
    pub image_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfit: Option<String>,
}

/// Pick `items[(index - 1) % len]`, or `None` for an empty list.
fn round_robin(items: &[String], image_index: u32) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let slot = (image_index as usize - 1) % items.len();
    Some(items[slot].clone())
}

fn pose_first(poses: &[String], _image_index: u32) -> Option<String> {
    poses.first().cloned()
}

fn pose_rotate(poses: &[String], image_index: u32) -> Option<String> {
    round_robin(poses, image_index)
}

/// Build the automatic mapping for `output_count` slots.
///
/// `output_count` must be positive; settings normalization clamps it
/// before this is called.
pub fn auto_mapping(
    grouped: &GroupedFiles,
    output_count: u32,
    pose_mode: PoseMode,
) -> Vec<MappingItem> {
    let pick_pose: fn(&[String], u32) -> Option<String> = match pose_mode {
        PoseMode::First => pose_first,
        PoseMode::Rotate => pose_rotate,
    };

    (1..=output_count)
        .map(|image_index| MappingItem {
            image_index,
            pose: pick_pose(&grouped.pose, image_index),
            outfit: round_robin(&grouped.outfit, image_index),
        })
        .collect()
}

/// Use `explicit` when it is present and non-empty, else the auto mapping.
///
/// An explicit mapping is not re-validated.
pub fn resolve_mapping(
    grouped: &GroupedFiles,
    output_count: u32,
    pose_mode: PoseMode,
    explicit: Option<&[MappingItem]>,
) -> Vec<MappingItem> {
    match explicit {
        Some(items) if !items.is_empty() => items.to_vec(),
        _ => auto_mapping(grouped, output_count, pose_mode),
    }
}

/// Pair outfits with a fixed pose by index: slot `i` gets `outfits[i - 1]`.
///
/// Produces one item per outfit; used when the user picks several outfits
/// and wants exactly one image per outfit.
pub fn pair_by_index(outfits: &[String], pose: Option<&str>) -> Vec<MappingItem> {
    outfits
        .iter()
        .zip(1u32..)
        .map(|(outfit, image_index)| MappingItem {
            image_index,
            pose: pose.map(str::to_string),
            outfit: Some(outfit.clone()),
        })
        .collect()
}

/// Check that image indexes run 1..=len with no gaps.
pub fn is_contiguous(mapping: &[MappingItem]) -> bool {
    mapping
        .iter()
        .zip(1u32..)
        .all(|(item, expected)| item.image_index == expected)
}
