//! Deterministic underwriting engines: medical analysis, risk assessment,
//! medical loading, response parsing, and premium calculation
//! (`spec.md` §4.A-C, §4.E-F).

pub mod assembly;
pub mod error;
pub mod loading;
pub mod medical;
pub mod parser;
pub mod premium;
pub mod risk;
pub mod types;

pub use error::UnderwritingError;
pub use risk::bmi;
pub use types::*;
