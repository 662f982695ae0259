//! Error kinds for the underwriting engines (`spec.md` §7).
//!
//! The deterministic engines (medical analysis, risk assessment, medical
//! loading, response parsing, premium calculation) never fail — they
//! tolerate missing data with defaults. This type exists for completeness
//! and for the boundary validation that does apply (malformed applicant
//! input reaching the HTTP layer).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnderwritingError {
    #[error("invalid applicant input: {0}")]
    InvalidInput(String),
}

impl UnderwritingError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
