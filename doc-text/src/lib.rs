//! Document text extraction and chunking for text-to-speech.
//!
//! Converts PDF, DOCX, PPTX and plain text documents into one plain-text
//! stream, then splits that stream into sentence-respecting chunks small
//! enough to synthesize one at a time:
//!
//! ```no_run
//! use doc_text::{DEFAULT_MAX_LENGTH, DocumentProcessor};
//!
//! let bytes = std::fs::read("notes.txt").unwrap();
//! let text = DocumentProcessor::process_document(&bytes, "notes.txt").unwrap();
//! let chunks = DocumentProcessor::format_text_for_tts(&text, DEFAULT_MAX_LENGTH).unwrap();
//! ```

pub mod chunker;
pub mod error;
pub mod extract;
pub mod format;

pub use chunker::DEFAULT_MAX_LENGTH;
pub use error::{DocError, Result};
pub use format::DocumentFormat;

/// Entry point for document processing. Stateless; every call is independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentProcessor;

impl DocumentProcessor {
    /// Extract plain text from a document, choosing the handler from the
    /// filename's extension.
    ///
    /// # Errors
    /// [`DocError::UnsupportedFormat`] for extensions other than pdf, docx,
    /// pptx and txt; [`DocError::DecodeError`] when a text file cannot be
    /// decoded; [`DocError::ProcessingError`] when extraction fails.
    pub fn process_document(content: &[u8], filename: &str) -> Result<String> {
        let format = DocumentFormat::from_filename(filename)?;
        extract::extract(format, content)
    }

    /// Split text into chunks of at most `max_length` characters on sentence
    /// boundaries. See [`chunker::chunk_text`].
    pub fn format_text_for_tts(text: &str, max_length: usize) -> Result<Vec<String>> {
        chunker::chunk_text(text, max_length)
    }
}
