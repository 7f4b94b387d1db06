//! Oracle reply parsing
//!
//! The oracle is asked for a JSON list of `{"sentence": ...}` records, but
//! its output format is not guaranteed. Parsing is done in two tiers:
//!
//! 1. **Strict**: the whole reply decodes as the list.
//! 2. **Fallback**: the span from the first `[` to the last `]` decodes as
//!    the list (prose, code fences and other noise around it are ignored).
//!
//! If neither works the outcome is [`ParseOutcome::Empty`], which the
//! pipeline treats as "highlight nothing" rather than an error.

use serde::Deserialize;

use super::CandidateSentence;

/// Which tier produced the candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Strict(Vec<CandidateSentence>),
    Fallback(Vec<CandidateSentence>),
    Empty,
}

impl ParseOutcome {
    /// Candidates in the order the oracle returned them
    pub fn candidates(&self) -> &[CandidateSentence] {
        match self {
            Self::Strict(c) | Self::Fallback(c) => c,
            Self::Empty => &[],
        }
    }

    pub fn into_candidates(self) -> Vec<CandidateSentence> {
        match self {
            Self::Strict(c) | Self::Fallback(c) => c,
            Self::Empty => Vec::new(),
        }
    }

    /// Short label for logs and responses
    pub fn path(&self) -> &'static str {
        match self {
            Self::Strict(_) => "strict",
            Self::Fallback(_) => "fallback",
            Self::Empty => "empty",
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Record {
    Object { sentence: String },
    Bare(String),
}

impl From<Record> for CandidateSentence {
    fn from(record: Record) -> Self {
        match record {
            Record::Object { sentence } => sentence,
            Record::Bare(sentence) => sentence,
        }
    }
}

fn decode(payload: &str) -> Option<Vec<CandidateSentence>> {
    serde_json::from_str::<Vec<Record>>(payload)
        .ok()
        .map(|records| records.into_iter().map(Into::into).collect())
}

/// Greedy `[ ... ]` span: first opening bracket to last closing bracket
fn bracketed_span(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    (end > start).then(|| &raw[start..=end])
}

/// Parse a raw oracle reply into candidate sentences
pub fn parse_response(raw: &str) -> ParseOutcome {
    let raw = raw.trim();

    if let Some(candidates) = decode(raw) {
        return ParseOutcome::Strict(candidates);
    }

    match bracketed_span(raw).and_then(decode) {
        Some(candidates) => ParseOutcome::Fallback(candidates),
        None => ParseOutcome::Empty,
    }
}
