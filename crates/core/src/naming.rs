//! Display helpers for reference filenames.

use crate::validation::IMAGE_EXTENSIONS;

/// Collapse a repeated trailing image extension for display, so
/// `face.jpg.jpg.jpg` shows as `face.jpg`.
///
/// Display only: classification and validation always see the raw name.
pub fn display_name(filename: &str) -> String {
    let lower = filename.to_lowercase();
    // Lowercasing can change byte lengths for non-ASCII names; only trim
    // when the byte positions still line up.
    if lower.len() != filename.len() {
        return filename.to_string();
    }

    for ext in IMAGE_EXTENSIONS {
        let suffix = format!(".{ext}");
        let mut end = lower.len();
        while lower[..end].ends_with(&suffix)
            && lower[..end - suffix.len()].ends_with(&suffix)
        {
            end -= suffix.len();
        }
        if end != lower.len() {
            return filename[..end].to_string();
        }
    }
    filename.to_string()
}
