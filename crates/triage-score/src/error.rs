//! Error types for scoring.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    /// Selection needs at least one candidate variant.
    #[error("no scoring variants configured")]
    NoVariants,
}

pub type Result<T> = std::result::Result<T, ScoreError>;
