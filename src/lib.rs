//! Highlighter Server Library
//!
//! Highlights the sentences of a PDF worth reading in a given number of
//! minutes. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `document`: Page text and match region types
//! - `mupdf`: MuPDF text extraction and search
//! - `oracle`: Prompting the selection oracle and parsing its replies
//! - `highlight`: Locating sentences and writing highlight annotations
//! - `delivery`: Persisting annotated documents under public URLs
//! - `routes`: HTTP surface

pub mod config;
pub mod delivery;
pub mod document;
pub mod error;
pub mod highlight;
pub mod mupdf;
pub mod oracle;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;
