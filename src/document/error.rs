//! Document error types

use thiserror::Error;

/// Errors raised while opening, reading or searching an uploaded document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The upload is not a PDF MuPDF can open
    #[error("Could not open PDF: {0}")]
    Open(String),

    /// The document opened but no page carries extractable text
    #[error("Document has no extractable text")]
    NoText,

    /// Page index outside the document
    #[error("Page not found: index {0}")]
    PageNotFound(usize),

    /// MuPDF context error
    #[error("MuPDF context error: {0}")]
    ContextError(String),

    /// Text extraction error
    #[error("Text extraction error: {0}")]
    TextExtractionError(String),

    /// Search error
    #[error("Search error: {0}")]
    SearchError(String),

    /// Blocking task failed to complete
    #[error("Task join error: {0}")]
    TaskError(String),
}

impl DocumentError {
    /// Whether the error is caused by the uploaded content rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Open(_) | Self::NoText)
    }
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Alias for Result
pub type DocumentResult<T> = Result<T>;

impl From<mupdf::Error> for DocumentError {
    fn from(err: mupdf::Error) -> Self {
        DocumentError::ContextError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for DocumentError {
    fn from(err: tokio::task::JoinError) -> Self {
        DocumentError::TaskError(err.to_string())
    }
}
