//! Selection Oracle
//!
//! Asks a language model which sentences of a document are worth reading in
//! a given time, and turns its free-form answer back into candidate
//! sentences.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use highlighter_server::oracle::{build_prompt, parse_response, DurationBudget, OpenAiOracle};
//!
//! let oracle = OpenAiOracle::new(config.oracle.clone())?;
//! let prompt = build_prompt(&extracted.full_text, DurationBudget::new(5)?);
//! let raw = oracle.select(&prompt).await?;
//! let outcome = parse_response(&raw);
//! tracing::info!(path = outcome.path(), "parsed {} candidates", outcome.candidates().len());
//! ```

mod parser;
mod prompt;
mod provider;
mod types;

pub use parser::{parse_response, ParseOutcome};
pub use prompt::{build_prompt, truncate_chars, MAX_INPUT_CHARS};
pub use provider::{backoff_delay, OpenAiOracle, SelectionOracle};
pub use types::{CandidateSentence, DurationBudget, OracleError, WORDS_PER_MINUTE};

#[cfg(test)]
pub use provider::MockOracle;
