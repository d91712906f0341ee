//! Strict filename validation for a picked folder of reference images.
//!
//! Files are checked in order, and the first matching rule decides:
//!
//! 1. hidden or OS metadata files are dropped silently;
//! 2. files without an accepted image extension are dropped silently;
//! 3. names carrying more than one image extension token are rejected;
//! 4. names must classify to exactly one [`Role`].
//!
//! The caller decides what to do with the error list. The studio flow runs
//! in reject mode: any error blocks grouping and job building.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::roles::{classify, Role};

// ── Constants ────────────────────────────────────────────────────────

/// OS metadata files that are never treated as references (compared
/// case-insensitively).
pub const IGNORED_SYSTEM_FILES: &[&str] = &[".ds_store", "thumbs.db", "desktop.ini"];

/// Accepted image extensions, without the dot.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Extension tokens counted by the duplicate-extension rule.
const EXTENSION_TOKENS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

static IMAGE_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(png|jpg|jpeg|webp)$").expect("valid regex"));

// ── Types ────────────────────────────────────────────────────────────

/// Anything that carries a filename: upload handles, plain strings.
pub trait NamedFile {
    fn file_name(&self) -> &str;
}

impl NamedFile for String {
    fn file_name(&self) -> &str {
        self
    }
}

impl NamedFile for &str {
    fn file_name(&self) -> &str {
        self
    }
}

/// Why a file was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    NoRoleKeyword,
    MultipleRoleKeywords,
    DuplicateExtension,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoRoleKeyword => "NO_ROLE_KEYWORD",
            Self::MultipleRoleKeywords => "MULTIPLE_ROLE_KEYWORDS",
            Self::DuplicateExtension => "DUPLICATE_EXTENSION",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rejected file. A file produces at most one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileValidationError {
    pub filename: String,
    pub reason: RejectionReason,
    /// Roles that matched; only populated for `MULTIPLE_ROLE_KEYWORDS`.
    pub detected_roles: BTreeSet<Role>,
}

/// Accepted files and rejections, both in input order.
#[derive(Debug, Clone)]
pub struct ValidationOutcome<F> {
    pub accepted: Vec<F>,
    pub errors: Vec<FileValidationError>,
}

impl<F> ValidationOutcome<F> {
    /// `true` when nothing was rejected.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

// ── Pure Functions ───────────────────────────────────────────────────

/// Returns `true` for hidden files and known OS metadata files.
pub fn is_ignored(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    IGNORED_SYSTEM_FILES.contains(&lower.as_str()) || lower.starts_with('.')
}

/// Returns `true` if the name ends with an accepted image extension.
pub fn is_image_file(filename: &str) -> bool {
    IMAGE_FILE_RE.is_match(filename)
}

/// Count image extension tokens anywhere in the name, summed across all
/// accepted extensions.
pub fn extension_token_count(filename: &str) -> usize {
    let lower = filename.to_lowercase();
    EXTENSION_TOKENS
        .iter()
        .map(|ext| lower.matches(ext).count())
        .sum()
}

/// Returns `true` when the name holds more than one extension token in
/// total, e.g. `face.jpg.jpg` or `outfit.jpg.png`.
pub fn has_duplicate_image_extension(filename: &str) -> bool {
    extension_token_count(filename) > 1
}

/// Validate candidate files, splitting them into accepted files and
/// rejections.
pub fn validate_files<F: NamedFile>(files: impl IntoIterator<Item = F>) -> ValidationOutcome<F> {
    let mut accepted = Vec::new();
    let mut errors = Vec::new();

    for file in files {
        let filename = file.file_name();

        if is_ignored(filename) || !is_image_file(filename) {
            continue;
        }

        if has_duplicate_image_extension(filename) {
            errors.push(FileValidationError {
                filename: filename.to_string(),
                reason: RejectionReason::DuplicateExtension,
                detected_roles: BTreeSet::new(),
            });
            continue;
        }

        let roles = classify(filename);
        match roles.len() {
            0 => errors.push(FileValidationError {
                filename: filename.to_string(),
                reason: RejectionReason::NoRoleKeyword,
                detected_roles: BTreeSet::new(),
            }),
            1 => accepted.push(file),
            _ => errors.push(FileValidationError {
                filename: filename.to_string(),
                reason: RejectionReason::MultipleRoleKeywords,
                detected_roles: roles,
            }),
        }
    }

    ValidationOutcome { accepted, errors }
}

// ── Tests ────────────────────────────────────────────────────────────
