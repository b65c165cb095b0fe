use thiserror::Error;

use crate::format::DocumentFormat;

/// Boxed cause carried by [`DocError::ProcessingError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum DocError {
    #[error("Unsupported file format: {}", display_extension(.0))]
    UnsupportedFormat(String),

    #[error("Could not decode text file with any of the attempted encodings")]
    DecodeError,

    #[error("Failed to process {format}: {source}")]
    ProcessingError {
        format: DocumentFormat,
        #[source]
        source: BoxError,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DocError {
    /// Wrap an extraction failure, keeping the original error as the source.
    pub fn processing(format: DocumentFormat, source: impl Into<BoxError>) -> Self {
        Self::ProcessingError {
            format,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocError>;

fn display_extension(ext: &str) -> &str {
    if ext.is_empty() { "(no extension)" } else { ext }
}
