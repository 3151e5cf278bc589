//! Error types for the dump client.

use thiserror::Error;

/// Semantic rejection of a decoded frame or an outgoing request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Symbol field was not 4 non-blank ASCII characters.
    #[error("invalid symbol {0:?}: expected 4 non-blank ASCII characters")]
    InvalidSymbol(String),

    /// Side byte was neither `B` nor `S`.
    #[error("invalid side {0:?}: expected 'B' or 'S'")]
    InvalidSide(String),

    /// Quantity must be strictly positive.
    #[error("invalid quantity {0}: must be positive")]
    InvalidQuantity(i32),

    /// Price must be strictly positive.
    #[error("invalid price {0}: must be positive")]
    InvalidPrice(i32),

    /// Sequence must be non-negative.
    #[error("invalid sequence {0}: must be non-negative")]
    InvalidSequence(i32),

    /// A resolve request carries the sequence in a single byte, so only
    /// 0-255 can be requested.
    #[error("sequence {0} does not fit the single-byte resolve payload (0-255)")]
    SequenceOutOfRange(i32),
}

/// Failure of a client run.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: refused, reset, or broken mid-stream.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// A bulk-stream frame failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type alias using ClientError.
pub type Result<T> = std::result::Result<T, ClientError>;
