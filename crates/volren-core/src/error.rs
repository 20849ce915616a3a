//! Error types for volren-rs.

use thiserror::Error;

/// The main error type for volren-rs operations.
#[derive(Error, Debug)]
pub enum VolrenError {
    /// A named archive, image slice or preset document could not be found.
    #[error("resource '{0}' not found")]
    ResourceNotFound(String),

    /// Archive or image data is undecodable or does not match the dataset shape.
    #[error("corrupt archive '{name}': {reason}")]
    CorruptArchive { name: String, reason: String },

    /// A transfer-function or configuration document is malformed.
    #[error("format error: {0}")]
    Format(String),

    /// A matrix has no inverse.
    #[error("singular matrix (determinant {determinant})")]
    SingularMatrix { determinant: f32 },

    /// Projection parameters describe an empty or inverted frustum.
    #[error("invalid projection: {0}")]
    InvalidProjection(String),

    /// The texture sink rejected an upload.
    #[error("texture upload failed: {0}")]
    Upload(String),

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VolrenError {
    /// Builds a [`VolrenError::CorruptArchive`] for a length mismatch.
    pub fn archive_length(name: impl Into<String>, expected: usize, actual: usize) -> Self {
        VolrenError::CorruptArchive {
            name: name.into(),
            reason: format!("expected {expected} bytes, got {actual}"),
        }
    }

    /// Returns true for errors raised while reading datasets or documents.
    ///
    /// These abort a configuration change; the caller keeps its previous
    /// buffers and may retry with a different selection.
    #[must_use]
    pub fn is_ingestion_failure(&self) -> bool {
        matches!(
            self,
            VolrenError::ResourceNotFound(_)
                | VolrenError::CorruptArchive { .. }
                | VolrenError::Format(_)
                | VolrenError::Io(_)
        )
    }
}

/// A specialized Result type for volren-rs operations.
pub type Result<T> = std::result::Result<T, VolrenError>;
