//! Error types for the measurement core

use std::path::PathBuf;

/// Errors surfaced by the measurement core to the shell
#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    #[error("Invalid zoom factor: {0} (must be positive and finite)")]
    InvalidZoom(f32),

    #[error("Page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange { page: u16, page_count: u16 },

    #[error("No document is loaded")]
    NoDocument,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to access settings file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type MeasureResult<T> = Result<T, MeasureError>;
