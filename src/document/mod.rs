//! Document text model
//!
//! Request-scoped views of an uploaded PDF: the text of every page, the
//! concatenated text handed to the selection oracle, and the regions on a
//! page where a candidate sentence was found.

mod error;
mod extract;
mod types;

pub use error::{DocumentError, DocumentResult, Result};
pub use extract::{extract_text, is_pdf};
pub use types::{ExtractedText, MatchRegion, PageText, Rect};
