//! Low-level MuPDF Wrapper
//!
//! MuPDF's `fz_context` is **NOT thread-safe**, and its document handles are
//! not `Send`. [`SafeDocument`] therefore keeps only the raw bytes and opens
//! a fresh MuPDF document for each operation, inside the closure passed to
//! [`SafeDocument::with_doc`]. Callers run those closures on
//! `tokio::task::spawn_blocking`, so no MuPDF handle ever crosses an await
//! point and every handle is dropped when the closure returns.
//!
//! # Usage
//!
//! ```rust,ignore
//! use highlighter_server::mupdf::{page_layout, SafeDocument};
//!
//! let doc = SafeDocument::from_bytes(pdf_bytes)?;
//! let boxes = doc.with_doc(|d| {
//!     let layout = page_layout(&d.load_page(0)?)?;
//!     let start = layout.text.find("The quick brown fox.").unwrap_or_default();
//!     Ok(layout.line_boxes(start, start + 20))
//! })?;
//! ```

mod safe;
mod stext;

pub use safe::SafeDocument;
pub use stext::{extract_plain_text, page_layout, PageLayout};
