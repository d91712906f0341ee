/// Domain errors raised by job planning.
///
/// Per-file naming problems are not errors: they are reported as
/// [`crate::validation::FileValidationError`] data so the caller can list
/// every rejected file at once.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Missing uploaded file: {filename}")]
    MissingUpload { filename: String },
}
