//! Plain-text prompt rendering for an [`ImageJob`].
//!
//! Output is byte-for-byte stable for equal jobs: the UI preview and the
//! text sent to the generation backend are the same string.

use crate::job::ImageJob;
use crate::mapping::MappingItem;

/// Shown for a role with no files.
const EMPTY_ROLE_PLACEHOLDER: &str = "-";

/// Shown when the job leaves gender unset.
pub const DEFAULT_GENDER_TEXT: &str = "Female (default)";

/// Shown when the job leaves location unset.
pub const DEFAULT_LOCATION_TEXT: &str = "Neutral studio (default)";

/// Shown for an unset pose or outfit in a mapping line.
const AUTO_TOKEN: &str = "auto";

const INSTRUCTIONS: &str = "INSTRUCTIONS:\n\
Follow the System Context strictly. Reject execution immediately if any filename validation fails. \
Do not infer or guess missing roles.";

fn file_list(files: &[String]) -> String {
    if files.is_empty() {
        EMPTY_ROLE_PLACEHOLDER.to_string()
    } else {
        files.join(", ")
    }
}

fn mapping_line(item: &MappingItem) -> String {
    format!(
        "- image_{}: pose={} outfit={}",
        item.image_index,
        item.pose.as_deref().unwrap_or(AUTO_TOKEN),
        item.outfit.as_deref().unwrap_or(AUTO_TOKEN),
    )
}

/// Render a job into its instruction text.
pub fn render_prompt(job: &ImageJob) -> String {
    let settings = &job.settings;
    let mut lines: Vec<String> = vec![
        format!("ACTION: {}", job.action),
        String::new(),
        "INPUT_FILES:".to_string(),
        format!("- FACE: {}", file_list(&job.files.face)),
        format!("- POSE: {}", file_list(&job.files.pose)),
        format!("- OUTFIT: {}", file_list(&job.files.outfit)),
        format!("- OBJECT: {}", file_list(&job.files.object)),
        String::new(),
        "SETTINGS:".to_string(),
        format!("- Model: {}", settings.model),
        format!(
            "- Gender: {}",
            settings.gender.as_deref().unwrap_or(DEFAULT_GENDER_TEXT)
        ),
        format!(
            "- Location: {}",
            settings.location.as_deref().unwrap_or(DEFAULT_LOCATION_TEXT)
        ),
        format!("- Aspect Ratio: {}", settings.aspect_ratio),
        format!("- Output Count: {}", settings.output_count),
    ];
    if let Some(style) = settings.style.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("- Image Style: {style}"));
    }

    lines.push(String::new());
    lines.push("MAPPING:".to_string());
    lines.extend(job.mapping.iter().map(mapping_line));

    lines.push(String::new());
    lines.push(INSTRUCTIONS.to_string());

    lines.join("\n")
}

/// Append the rules sent with every reference-image edit request.
pub fn strict_reference_prompt(prompt: &str, has_object: bool) -> String {
    let mut out = String::with_capacity(prompt.len() + 320);
    out.push_str(prompt);
    out.push_str("\n\nSTRICT RULES:\n");
    out.push_str("- Keep the exact camera angle and pose from the POSE reference.\n");
    out.push_str("- Keep the same facial identity from the FACE reference.\n");
    out.push_str("- Apply the OUTFIT reference exactly.\n");
    if has_object {
        out.push_str("- Include the OBJECT reference and match how it is held.\n");
    }
    out.push_str("- No extra fingers/limbs, no distorted labels.\n");
    out
}
