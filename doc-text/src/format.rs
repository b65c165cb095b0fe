//! Supported document formats and extension-based selection.

use std::fmt;
use std::path::Path;

use crate::error::{DocError, Result};

/// Document formats the processor can extract text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Pptx,
    Txt,
}

impl DocumentFormat {
    /// Select the format from a filename's lowercase extension.
    ///
    /// Only the last extension counts, so `report.final.PDF` is a PDF and
    /// `archive.pdf.zip` is unsupported. Names without an extension (including
    /// dotfiles such as `.bashrc`) are unsupported.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = file_extension(filename);

        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "pptx" => Ok(Self::Pptx),
            "txt" => Ok(Self::Txt),
            "" => Err(DocError::UnsupportedFormat(String::new())),
            other => Err(DocError::UnsupportedFormat(format!(".{}", other))),
        }
    }

    /// Canonical lowercase extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Pptx => "PPTX",
            Self::Txt => "TXT",
        };
        f.write_str(name)
    }
}

/// Lowercase extension of `filename` without the dot, or an empty string.
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
