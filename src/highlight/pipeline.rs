//! End-to-end highlight flow for one upload

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{apply_highlights, locate_regions, AnnotateError};
use crate::delivery::{Delivery, DeliveryError};
use crate::document::{extract_text, DocumentError, ExtractedText};
use crate::mupdf::SafeDocument;
use crate::oracle::{
    build_prompt, parse_response, CandidateSentence, DurationBudget, OracleError, SelectionOracle,
};

/// An uploaded document
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Vec<u8>,
    /// Client-supplied filename, unsanitized
    pub filename: String,
}

/// Result of a completed highlight run
#[derive(Debug, Clone)]
pub struct HighlightOutcome {
    pub file_url: String,
    pub output_name: String,
    /// Which parse tier produced the candidates: strict, fallback or empty
    pub parse_path: &'static str,
    pub pages: usize,
    pub candidates: Vec<CandidateSentence>,
    /// Number of highlight annotations written
    pub regions: usize,
}

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Annotate(#[from] AnnotateError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl From<tokio::task::JoinError> for HighlightError {
    fn from(err: tokio::task::JoinError) -> Self {
        HighlightError::Document(DocumentError::from(err))
    }
}

/// Upload → extract → select → locate → annotate → persist
#[derive(Clone)]
pub struct HighlightPipeline {
    oracle: Arc<dyn SelectionOracle>,
    delivery: Delivery,
}

impl HighlightPipeline {
    pub fn new(oracle: Arc<dyn SelectionOracle>, delivery: Delivery) -> Self {
        Self { oracle, delivery }
    }

    pub async fn run(
        &self,
        upload: Upload,
        budget: DurationBudget,
    ) -> Result<HighlightOutcome, HighlightError> {
        let Upload { bytes, filename } = upload;
        debug!(file = %filename, bytes = bytes.len(), minutes = budget.minutes(), "Highlight run started");

        // MuPDF work is CPU-bound and must stay off the async workers
        let (doc, extracted) = tokio::task::spawn_blocking(move || {
            let doc = SafeDocument::from_bytes(bytes)?;
            let extracted = extract_text(&doc)?;
            Ok::<_, DocumentError>((doc, extracted))
        })
        .await??;

        let ExtractedText { pages, full_text } = extracted;
        debug!(pages = pages.len(), chars = full_text.chars().count(), "Text extracted");

        let prompt = build_prompt(&full_text, budget);
        let reply = self.oracle.select(&prompt).await?;

        let parsed = parse_response(&reply);
        let parse_path = parsed.path();
        let candidates = parsed.into_candidates();
        if candidates.is_empty() {
            warn!(oracle = self.oracle.name(), parse_path, "Oracle reply yielded no sentences");
        } else {
            debug!(count = candidates.len(), parse_path, "Candidates selected");
        }

        let page_count = pages.len();
        let search_candidates = candidates.clone();
        let (annotated, regions) = tokio::task::spawn_blocking(move || {
            let regions = locate_regions(&doc, &pages, &search_candidates)?;
            let annotated = apply_highlights(doc.bytes(), &regions)?;
            Ok::<_, HighlightError>((annotated, regions.len()))
        })
        .await??;

        let stored = self.delivery.persist(&filename, &annotated).await?;

        info!(
            file = %stored.name,
            pages = page_count,
            candidates = candidates.len(),
            regions,
            parse_path,
            "Highlight run complete"
        );

        Ok(HighlightOutcome {
            file_url: stored.url,
            output_name: stored.name,
            parse_path,
            pages: page_count,
            candidates,
            regions,
        })
    }
}
