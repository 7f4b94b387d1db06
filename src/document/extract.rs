//! Text extraction
//!
//! Produces the text of every page in page order. No normalization, no
//! deduplication.

use crate::mupdf::{extract_plain_text, SafeDocument};

use super::{DocumentError, ExtractedText, PageText, Result};

/// Whether the bytes look like a PDF (`%PDF` within the first KiB)
pub fn is_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(4).any(|w| w == b"%PDF")
}

/// Extract the text of every page of `doc`
///
/// Fails with [`DocumentError::NoText`] when every page is blank, since
/// there is nothing the oracle could select from.
pub fn extract_text(doc: &SafeDocument) -> Result<ExtractedText> {
    let pages = doc.with_doc(|mupdf_doc| {
        (0..doc.page_count())
            .map(|index| {
                let page = mupdf_doc
                    .load_page(index as i32)
                    .map_err(|_| DocumentError::PageNotFound(index))?;
                let text = extract_plain_text(&page)
                    .map_err(|e| DocumentError::TextExtractionError(e.to_string()))?;
                Ok(PageText { index, text })
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let extracted = ExtractedText::from_pages(pages);
    if extracted.is_blank() {
        return Err(DocumentError::NoText);
    }

    Ok(extracted)
}
