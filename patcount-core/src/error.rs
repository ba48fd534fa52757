use std::path::PathBuf;
use thiserror::Error;

/// Input-stage failures. Fatal to the single analysis, never to the
/// process: the caller reports one message and moves on.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported file type '{extension}': expected .txt or .docx")]
    UnsupportedFormat { extension: String },

    #[error("document contains no text: {0}")]
    EmptyDocument(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid docx archive: {0}")]
    InvalidDocx(String),
}
