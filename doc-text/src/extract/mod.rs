//! Format-specific text extractors.

mod docx;
mod ooxml;
mod pdf;
mod pptx;
mod txt;

pub use docx::heading_level;
pub use txt::{TextEncoding, normalize_line_breaks};

use crate::error::Result;
use crate::format::DocumentFormat;

/// Extract plain text from `content` using the handler for `format`.
pub fn extract(format: DocumentFormat, content: &[u8]) -> Result<String> {
    log::debug!("Extracting {} document ({} bytes)", format, content.len());

    match format {
        DocumentFormat::Pdf => pdf::extract(content),
        DocumentFormat::Docx => docx::extract(content),
        DocumentFormat::Pptx => pptx::extract(content),
        DocumentFormat::Txt => txt::extract(content),
    }
}
