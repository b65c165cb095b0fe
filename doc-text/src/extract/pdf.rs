//! PDF extraction: one labelled block per page with text.

use lopdf::Document;

use crate::error::{DocError, Result};
use crate::format::DocumentFormat;

const FORMAT: DocumentFormat = DocumentFormat::Pdf;

pub fn extract(content: &[u8]) -> Result<String> {
    let doc = Document::load_mem(content).map_err(|e| DocError::processing(FORMAT, e))?;

    // BTreeMap keyed by 1-based page number, so iteration is document order
    let pages = doc.get_pages();
    log::debug!("PDF has {} pages", pages.len());

    let mut page_texts = Vec::with_capacity(pages.len());
    for &page_number in pages.keys() {
        let text = doc
            .extract_text(&[page_number])
            .map_err(|e| DocError::processing(FORMAT, e))?;
        page_texts.push((page_number, text));
    }

    Ok(render_pages(page_texts))
}

/// Join page texts into labelled blocks, skipping pages without text.
fn render_pages(pages: impl IntoIterator<Item = (u32, String)>) -> String {
    pages
        .into_iter()
        .filter_map(|(number, text)| {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(format!("Page {}.\n{}", number, text))
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
