//! Error types for export jobs.

use thiserror::Error;

/// Errors that can occur while writing an export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Preview image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Archive writing error
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The snapshot lacks data the export needs
    #[error("Invalid map: {0}")]
    InvalidMap(String),

    /// The export was cancelled from its progress surface
    #[error("Export cancelled")]
    Cancelled,

    /// The worker thread could not be started or died
    #[error("Export worker error: {0}")]
    Worker(String),
}
