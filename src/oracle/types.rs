//! Oracle Types

use serde::Serialize;

/// Reading speed used to turn minutes into a token allowance
pub const WORDS_PER_MINUTE: u32 = 350;

/// Caller-specified reading time, in whole minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationBudget {
    minutes: u32,
}

impl DurationBudget {
    /// Create a budget; zero minutes is rejected
    pub fn new(minutes: u32) -> Result<Self, OracleError> {
        if minutes == 0 {
            return Err(OracleError::InvalidBudget(
                "reading_time must be a positive number of minutes".to_string(),
            ));
        }
        Ok(Self { minutes })
    }

    /// Parse a form value such as `"5"`; negatives, fractions and junk are rejected
    pub fn parse(raw: &str) -> Result<Self, OracleError> {
        let minutes = raw.trim().parse::<u32>().map_err(|_| {
            OracleError::InvalidBudget(format!(
                "reading_time must be a positive integer, got {:?}",
                raw
            ))
        })?;
        Self::new(minutes)
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Approximate token allowance (`minutes * 350`)
    pub fn token_budget(&self) -> u64 {
        u64::from(self.minutes) * u64::from(WORDS_PER_MINUTE)
    }
}

/// A sentence the oracle judged worth highlighting
pub type CandidateSentence = String;

/// Oracle error types
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("Invalid reading time: {0}")]
    InvalidBudget(String),

    #[error("No oracle API key configured (set OPENAI_API_KEY or LLM_API_KEY)")]
    MissingCredential,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed oracle reply: {0}")]
    Reply(String),
}

impl OracleError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
