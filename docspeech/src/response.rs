//! Result of processing one uploaded document.

use serde::{Deserialize, Serialize};

/// What the caller gets back for a processed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResponse {
    /// Preview of the extracted text
    pub text: String,
    /// TTS-ready chunks of the full text
    #[serde(default)]
    pub chunks: Vec<String>,
    pub filename: String,
    /// Lowercase extension without the dot
    pub file_type: String,
}

impl DocumentResponse {
    pub fn new(filename: &str, text: &str, chunks: Vec<String>, preview_length: usize) -> Self {
        Self {
            text: preview(text, preview_length),
            chunks,
            filename: filename.to_string(),
            file_type: doc_text::format::file_extension(filename),
        }
    }
}

/// First `max_chars` characters of `text`, with "..." appended when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
