// src/error.rs
//
// Errors raised while decoding shares and reconstructing a secret

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Base {0} is outside the supported range 2..=36")]
    InvalidBase(u32),

    #[error("Invalid digit {ch:?} at position {position} for base {base}")]
    InvalidDigit { ch: char, position: usize, base: u32 },

    #[error("Empty digit string")]
    EmptyValue,

    #[error("Singular matrix at pivot column {0}, points do not determine a unique polynomial")]
    SingularMatrix(usize),

    #[error("Result {numerator}/{denominator} is not an integer")]
    NonIntegerResult { numerator: String, denominator: String },

    #[error("Expected {expected} points for the requested degree, got {got}")]
    PointCountMismatch { expected: usize, got: usize },

    #[error("Threshold k must be at least 1, got {0}")]
    InvalidThreshold(usize),

    #[error("Need {k} shares but only {available} present")]
    InsufficientShares { k: usize, available: usize },

    #[error("Share index {0:?} is not a decimal integer")]
    InvalidShareIndex(String),

    #[error("Share index {0} appears more than once")]
    DuplicateShareIndex(u64),

    #[error("Base field {0:?} is not a decimal integer")]
    InvalidBaseField(String),

    #[error("Value of share {0} does not survive re-encoding")]
    RoundTripMismatch(u64),

    #[error("{0} record(s) failed to reconstruct")]
    BatchFailed(usize),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SetLogger(#[from] log::SetLoggerError),
}
