use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScatterError>;

/// Errors from scattering placement points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScatterError {
    /// The constraints describe an empty or malformed accept region.
    #[error("invalid scatter constraint: {0}")]
    InvalidConstraint(String),

    /// A single point used up its whole rejection budget.
    #[error("point {index} not placed after {attempts} attempts")]
    AttemptsExhausted { index: usize, attempts: u32 },
}
