//! Request-scoped document wrapper for MuPDF
//!
//! Stores the uploaded bytes and opens a fresh MuPDF document for every
//! operation, so the wrapper itself is `Send` and can be moved into a
//! blocking task.

use std::sync::Arc;

use mupdf::Document;

use crate::document::{is_pdf, DocumentError, DocumentResult};

const PDF_MIME: &str = "application/pdf";

/// Owned PDF bytes plus the page count validated at construction
#[derive(Clone)]
pub struct SafeDocument {
    data: Arc<Vec<u8>>,
    page_count: usize,
}

impl SafeDocument {
    /// Validate that `data` is a PDF MuPDF can open and count its pages
    pub fn from_bytes(data: Vec<u8>) -> DocumentResult<Self> {
        if !is_pdf(&data) {
            return Err(DocumentError::Open("missing %PDF header".into()));
        }

        let doc = Document::from_bytes(&data, PDF_MIME)
            .map_err(|e| DocumentError::Open(e.to_string()))?;
        let page_count = doc
            .page_count()
            .map_err(|e| DocumentError::Open(e.to_string()))?;

        Ok(Self {
            data: Arc::new(data),
            page_count: page_count.max(0) as usize,
        })
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// The original uploaded bytes
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Execute a closure with a freshly opened MuPDF document
    ///
    /// The document is dropped as soon as the closure returns.
    pub fn with_doc<F, R>(&self, f: F) -> DocumentResult<R>
    where
        F: FnOnce(&Document) -> DocumentResult<R>,
    {
        let doc = Document::from_bytes(&self.data, PDF_MIME)?;
        f(&doc)
    }
}
