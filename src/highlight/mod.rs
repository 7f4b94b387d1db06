//! Highlighting
//!
//! Locates candidate sentences on every page and writes a highlight
//! annotation over each occurrence, then drives the whole upload → extract →
//! select → annotate → persist flow.
//!
//! ```text
//! upload bytes ──► extract_text ──► build_prompt ──► SelectionOracle
//!                                                         │
//!        Delivery ◄── apply_highlights ◄── locate_regions ◄── parse_response
//! ```

mod annotator;
mod locate;
mod pipeline;

pub use annotator::{apply_highlights, AnnotateError};
pub use locate::{locate_regions, MAX_HITS_PER_SEARCH};
pub use pipeline::{HighlightError, HighlightOutcome, HighlightPipeline, Upload};
