//! Sentence location
//!
//! O(pages × candidates) exact search. A hit is a byte-for-byte occurrence of
//! the candidate in the page's structured text, so matching is case and
//! whitespace sensitive. Each hit yields one region per text line it spans.

use crate::document::{DocumentError, DocumentResult, MatchRegion, PageText};
use crate::mupdf::{page_layout, SafeDocument};
use crate::oracle::CandidateSentence;

/// Upper bound on occurrences of one candidate located on one page
pub const MAX_HITS_PER_SEARCH: usize = 512;

/// Find every occurrence of every candidate on every page
pub fn locate_regions(
    doc: &SafeDocument,
    pages: &[PageText],
    candidates: &[CandidateSentence],
) -> DocumentResult<Vec<MatchRegion>> {
    let candidates: Vec<&CandidateSentence> =
        candidates.iter().filter(|c| !c.trim().is_empty()).collect();
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    doc.with_doc(|mupdf_doc| {
        let mut regions = Vec::new();

        for page_text in pages {
            // Skip the layout walk on pages no candidate occurs on
            if !candidates
                .iter()
                .any(|c| page_text.text.contains(c.as_str()))
            {
                continue;
            }

            let page = mupdf_doc
                .load_page(page_text.index as i32)
                .map_err(|_| DocumentError::PageNotFound(page_text.index))?;
            let layout = page_layout(&page)
                .map_err(|e| DocumentError::SearchError(e.to_string()))?;

            for sentence in &candidates {
                let hits = layout
                    .text
                    .match_indices(sentence.as_str())
                    .take(MAX_HITS_PER_SEARCH);

                for (start, matched) in hits {
                    regions.extend(
                        layout
                            .line_boxes(start, start + matched.len())
                            .into_iter()
                            .map(|rect| MatchRegion {
                                page: page_text.index,
                                rect,
                                sentence: (*sentence).clone(),
                            }),
                    );
                }
            }
        }

        Ok(regions)
    })
}
